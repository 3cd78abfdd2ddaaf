#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    use std::net::SocketAddr;

    use anyhow::Context;
    use construction_schedule::{
        ProjectMetadata, Schedule, VendorDirectory, data_center_requirements,
        http_api::{self, AppState, ProjectState},
    };
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("CONSTRUCTION_SCHEDULE_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()
        .context("invalid CONSTRUCTION_SCHEDULE_HTTP_ADDR")?;

    let vendors = match std::env::var("CONSTRUCTION_SCHEDULE_VENDORS") {
        Ok(path) => VendorDirectory::from_json_path(&path)
            .with_context(|| format!("failed to load vendor directory from {path}"))?,
        Err(_) => VendorDirectory::sample(),
    };

    let schedule = Schedule::data_center(ProjectMetadata::default())
        .context("failed to resolve the data center template")?;
    let state = AppState::new(ProjectState::new(
        schedule,
        data_center_requirements(),
        vendors,
    ));
    http_api::serve(addr, state).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
