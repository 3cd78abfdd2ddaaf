use anyhow::Context;
use chrono::NaiveDate;
use construction_schedule::{
    MaterialRequirement, ProjectMetadata, Schedule, ScheduleExport, VendorDirectory,
    data_center_requirements, procurement_records, save_procurement_to_csv,
    save_procurement_to_json, save_schedule_to_csv, save_schedule_to_json, save_timeline_to_csv,
    save_timeline_to_json,
};
use polars::prelude::{AnyValue, DataFrame};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn cell_text(av: &AnyValue) -> String {
    match av {
        AnyValue::Null => String::new(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::String(s) => s.to_string(),
        _ => av.to_string(),
    }
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let col_names: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();

    let mut cells: Vec<Vec<String>> = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| col.get(row_idx).map(|av| cell_text(&av)).unwrap_or_default())
            .collect::<Vec<_>>();
        cells.push(row);
    }

    let mut widths: Vec<usize> = col_names.iter().map(|n| n.len()).collect();
    for row in &cells {
        for (ci, cell) in row.iter().enumerate() {
            widths[ci] = widths[ci].max(cell.len());
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |values: &[String]| {
        let mut line = String::from("|");
        for (i, value) in values.iter().enumerate() {
            line.push(' ');
            line.push_str(value);
            line.push_str(&" ".repeat(widths[i].saturating_sub(value.len())));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&col_names));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in &cells {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                                       Show this help\n  show                                       Show the resolved task calendar\n  milestones                                 List milestones\n  summary                                    Show per-phase summary\n  procurement                                Show procurement windows and budget\n  start <YYYY-MM-DD>                         Move the project start date and recompute\n  vendors <material...>                      List vendors for a material by rating\n  export <schedule|procurement|timeline> <json|csv> <path>\n                                             Write an export to disk\n  quit|exit                                  Exit"
    );
}

fn print_schedule(schedule: &Schedule) {
    match schedule.dataframe() {
        Ok(df) => println!("{}", render_df_as_text_table(&df)),
        Err(e) => println!("Error: {}", e),
    }
}

fn print_milestones(schedule: &Schedule) {
    for milestone in schedule.milestones() {
        println!(
            "  {:<24} {}  ({})",
            milestone.name, milestone.date, milestone.kind
        );
    }
}

fn print_summary(schedule: &Schedule) {
    match schedule.summary() {
        Ok(summary) => {
            println!("Project   : {}", summary.project_name);
            println!("Summary   : {}", summary.to_cli_summary());
            for phase in &summary.phases {
                println!(
                    "  {:<28} {} .. {}  tasks={} work_days={}",
                    phase.phase, phase.start, phase.end, phase.task_count, phase.work_days
                );
            }
        }
        Err(e) => println!("Error: {}", e),
    }
}

fn print_procurement(
    schedule: &Schedule,
    requirements: &[MaterialRequirement],
    vendors: &VendorDirectory,
) {
    let plan = schedule.procurement_plan(requirements, vendors);
    for strategy in &plan.strategies {
        let window = &strategy.window;
        let dates = match (window.delivery_start, window.delivery_end) {
            (Some(start), Some(end)) => format!("{start} .. {end}"),
            _ => "unschedulable".to_string(),
        };
        let primary = strategy
            .primary_vendor
            .as_ref()
            .map(|v| v.name.as_str())
            .unwrap_or("-");
        println!(
            "  {:<26} {:<24} lead={}d {:<7} vendor={} ({}, {})",
            strategy.material_name,
            dates,
            window.lead_time_days,
            window.delivery_method.as_str(),
            primary,
            strategy.procurement_method.as_str(),
            strategy.inventory_strategy.as_str()
        );
    }
    if !plan.timeline.is_empty() {
        println!("Order timeline:");
    }
    for entry in &plan.timeline {
        let order_by = entry
            .procurement_start_date
            .map(|date| date.to_string())
            .unwrap_or_else(|| "out of range".to_string());
        println!(
            "  {:<26} {} (id {}) starts {}, order by {}",
            entry.material_name,
            entry.required_for_task,
            entry.task_id,
            entry.task_start_date,
            order_by
        );
    }
    println!(
        "Total procurement cost: {:.2} {}",
        plan.budget.total_procurement_cost, plan.budget.currency
    );
}

fn print_vendors(vendors: &VendorDirectory, material: &str) {
    let listed = vendors.vendors_for(material);
    if listed.is_empty() {
        println!("No vendors on record for '{}'.", material);
        return;
    }
    for vendor in listed {
        println!(
            "  {:<32} rating={:.1} lead={}d {}",
            vendor.name,
            vendor.rating,
            vendor.quote().lead_time_days,
            vendor.location
        );
    }
}

fn export(
    schedule: &Schedule,
    requirements: &[MaterialRequirement],
    vendors: &VendorDirectory,
    what: &str,
    format: &str,
    path: &str,
) -> anyhow::Result<()> {
    match what {
        "schedule" => {
            let export = ScheduleExport::from_schedule(schedule)?;
            match format {
                "json" => save_schedule_to_json(&export, path)?,
                "csv" => save_schedule_to_csv(&export, path)?,
                other => anyhow::bail!("unknown format '{other}'"),
            }
            println!("Schedule exported to {}", path);
        }
        "procurement" => {
            let plan = schedule.procurement_plan(requirements, vendors);
            let records = procurement_records(plan.windows());
            match format {
                "json" => save_procurement_to_json(&records, path)?,
                "csv" => save_procurement_to_csv(&records, path)?,
                other => anyhow::bail!("unknown format '{other}'"),
            }
            println!("Procurement exported to {}", path);
        }
        "timeline" => {
            let plan = schedule.procurement_plan(requirements, vendors);
            match format {
                "json" => save_timeline_to_json(&plan.timeline, path)?,
                "csv" => save_timeline_to_csv(&plan.timeline, path)?,
                other => anyhow::bail!("unknown format '{other}'"),
            }
            println!("Timeline exported to {}", path);
        }
        other => anyhow::bail!("unknown export '{other}'"),
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let vendors = match std::env::var("CONSTRUCTION_SCHEDULE_VENDORS") {
        Ok(path) => VendorDirectory::from_json_path(&path)
            .with_context(|| format!("failed to load vendor directory from {path}"))?,
        Err(_) => VendorDirectory::sample(),
    };
    let requirements = data_center_requirements();
    let mut schedule = Schedule::data_center(ProjectMetadata::default())
        .context("failed to resolve the data center template")?;

    println!("Construction Schedule (CLI) - type 'help' for commands\n");
    println!("{}", schedule.project_name());

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => print_schedule(&schedule),
            "milestones" => print_milestones(&schedule),
            "summary" => print_summary(&schedule),
            "procurement" => print_procurement(&schedule, &requirements, &vendors),
            "start" => match parts.next() {
                Some(date_s) => {
                    let date = match NaiveDate::parse_from_str(date_s, "%Y-%m-%d") {
                        Ok(d) => d,
                        Err(_) => {
                            println!("Invalid date (YYYY-MM-DD)");
                            continue;
                        }
                    };
                    match schedule.set_project_start_date(date) {
                        Ok(()) => {
                            println!("Project start set to {}.", date);
                            print_milestones(&schedule);
                        }
                        Err(e) => println!("Error: {}", e),
                    }
                }
                None => println!("Usage: start <YYYY-MM-DD>"),
            },
            "vendors" => {
                let material = parts.collect::<Vec<_>>().join(" ");
                if material.is_empty() {
                    println!("Usage: vendors <material...>");
                } else {
                    print_vendors(&vendors, &material);
                }
            }
            "export" => match (parts.next(), parts.next(), parts.next()) {
                (Some(what), Some(format), Some(path)) => {
                    if let Err(e) = export(&schedule, &requirements, &vendors, what, format, path)
                    {
                        println!("Export error: {}", e);
                    }
                }
                _ => println!("Usage: export <schedule|procurement|timeline> <json|csv> <path>"),
            },
            other => println!("Unknown command '{}'. Type 'help'.", other),
        }
    }
    Ok(())
}
