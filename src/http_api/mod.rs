use std::{collections::BTreeMap, net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::{
    ExportError, MaterialForecaster, MaterialRequirement, MilestoneRecord, ProcurementPlan,
    ProjectFeatures, ProjectMetadata, Schedule, ScheduleError, ScheduleExport, ScheduleSummary,
    TimelineEntry, Vendor, VendorDirectory, forecast,
};

/// Everything the handlers read: the resolved schedule plus the inputs of the
/// procurement plan.
#[derive(Debug, Clone)]
pub struct ProjectState {
    pub schedule: Schedule,
    pub requirements: Vec<MaterialRequirement>,
    pub vendors: VendorDirectory,
}

impl ProjectState {
    pub fn new(
        schedule: Schedule,
        requirements: Vec<MaterialRequirement>,
        vendors: VendorDirectory,
    ) -> Self {
        Self {
            schedule,
            requirements,
            vendors,
        }
    }

    fn procurement_plan(&self) -> ProcurementPlan {
        self.schedule
            .procurement_plan(&self.requirements, &self.vendors)
    }
}

#[derive(Clone)]
pub struct AppState {
    project: Arc<RwLock<ProjectState>>,
    forecaster: Option<Arc<dyn MaterialForecaster>>,
}

impl AppState {
    pub fn new(project: ProjectState) -> Self {
        Self {
            project: Arc::new(RwLock::new(project)),
            forecaster: None,
        }
    }

    pub fn with_forecaster(mut self, forecaster: Arc<dyn MaterialForecaster>) -> Self {
        self.forecaster = Some(forecaster);
        self
    }

    fn project(&self) -> Arc<RwLock<ProjectState>> {
        self.project.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
    Unavailable(String),
    Internal(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    fn internal(message: impl Into<String>) -> Self {
        ApiError::Internal(message.into())
    }
}

impl From<ScheduleError> for ApiError {
    fn from(value: ScheduleError) -> Self {
        match value {
            ScheduleError::InvalidCatalog(_) | ScheduleError::DateOutOfRange(_) => {
                ApiError::Invalid(value.to_string())
            }
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<ExportError> for ApiError {
    fn from(value: ExportError) -> Self {
        ApiError::internal(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Unavailable(message) => {
                (StatusCode::SERVICE_UNAVAILABLE, "unavailable", message)
            }
            ApiError::Internal(message) => {
                tracing::error!("request failed: {message}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metadata", get(get_metadata).put(update_metadata))
        .route("/schedule", get(get_schedule))
        .route("/milestones", get(list_milestones))
        .route("/summary", get(get_summary))
        .route("/procurement", get(get_procurement))
        .route("/procurement/timeline", get(get_timeline))
        .route("/vendors", get(list_all_vendors))
        .route("/vendors/:material", get(list_vendors))
        .route("/predict", post(predict))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_metadata(State(state): State<AppState>) -> Json<ProjectMetadata> {
    let project = state.project();
    let metadata = project.read().schedule.metadata().clone();
    Json(metadata)
}

async fn update_metadata(
    State(state): State<AppState>,
    Json(metadata): Json<ProjectMetadata>,
) -> Result<Json<ProjectMetadata>, ApiError> {
    let project = state.project();
    let current = {
        let mut guard = project.write();
        guard.schedule.set_metadata(metadata)?;
        guard.schedule.metadata().clone()
    };
    tracing::info!(start = %current.project_start_date, "project metadata updated");
    Ok(Json(current))
}

async fn get_schedule(State(state): State<AppState>) -> Result<Json<ScheduleExport>, ApiError> {
    let project = state.project();
    let export = {
        let guard = project.read();
        ScheduleExport::from_schedule(&guard.schedule)?
    };
    Ok(Json(export))
}

async fn list_milestones(State(state): State<AppState>) -> Json<Vec<MilestoneRecord>> {
    let project = state.project();
    let milestones = {
        let guard = project.read();
        guard
            .schedule
            .milestones()
            .iter()
            .map(MilestoneRecord::from)
            .collect()
    };
    Json(milestones)
}

async fn get_summary(State(state): State<AppState>) -> Result<Json<ScheduleSummary>, ApiError> {
    let project = state.project();
    let summary = {
        let guard = project.read();
        guard.schedule.summary()?
    };
    Ok(Json(summary))
}

async fn get_procurement(State(state): State<AppState>) -> Json<ProcurementPlan> {
    let project = state.project();
    let plan = project.read().procurement_plan();
    Json(plan)
}

async fn get_timeline(State(state): State<AppState>) -> Json<Vec<TimelineEntry>> {
    let project = state.project();
    let timeline = project.read().procurement_plan().timeline;
    Json(timeline)
}

/// Every material on record, each with its vendors best-rated first.
async fn list_all_vendors(State(state): State<AppState>) -> Json<BTreeMap<String, Vec<Vendor>>> {
    let project = state.project();
    let directory = {
        let guard = project.read();
        guard
            .vendors
            .materials()
            .into_iter()
            .map(|material| {
                let vendors = guard
                    .vendors
                    .vendors_for(material)
                    .into_iter()
                    .cloned()
                    .collect();
                (material.to_string(), vendors)
            })
            .collect()
    };
    Json(directory)
}

async fn list_vendors(
    State(state): State<AppState>,
    Path(material): Path<String>,
) -> Result<Json<Vec<Vendor>>, ApiError> {
    let project = state.project();
    let vendors: Vec<Vendor> = {
        let guard = project.read();
        guard
            .vendors
            .vendors_for(&material)
            .into_iter()
            .cloned()
            .collect()
    };
    if vendors.is_empty() {
        return Err(ApiError::not_found(format!(
            "no vendors on record for '{material}'"
        )));
    }
    Ok(Json(vendors))
}

#[derive(Debug, Serialize)]
struct PredictionBody {
    material_id: u32,
    material_name: Option<&'static str>,
    quantity: f64,
}

async fn predict(
    State(state): State<AppState>,
    Json(features): Json<ProjectFeatures>,
) -> Result<Json<PredictionBody>, ApiError> {
    let forecaster = state
        .forecaster
        .as_ref()
        .ok_or_else(|| ApiError::Unavailable("no forecaster configured".to_string()))?;
    let forecast = forecaster.predict(&features);
    Ok(Json(PredictionBody {
        material_id: forecast.material_id,
        material_name: forecast::material_name(forecast.material_id),
        quantity: forecast.quantity,
    }))
}
