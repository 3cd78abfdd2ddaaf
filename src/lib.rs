pub mod calculations;
pub mod catalog;
pub mod error;
pub mod export;
pub mod forecast;
pub mod graph;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod metadata;
pub mod milestone;
pub mod procurement;
pub mod schedule;
pub mod task;
pub mod vendor;

pub use calculations::resolve;
pub use catalog::{PhaseDecl, TaskCatalog, TaskDecl, data_center_phases};
pub use error::{CatalogViolation, ScheduleError, ScheduleResult};
pub use export::{
    ExportError, ExportResult, MilestoneRecord, ProcurementRecord, ScheduleExport, ScheduleStore,
    TaskRecord, load_procurement_from_csv, load_procurement_from_json, load_schedule_from_csv,
    load_schedule_from_json, load_timeline_from_csv, load_timeline_from_json, procurement_records,
    save_procurement_to_csv, save_procurement_to_json, save_schedule_to_csv, save_schedule_to_json,
    save_timeline_to_csv, save_timeline_to_json,
};
#[cfg(feature = "sqlite")]
pub use export::sqlite::SqliteScheduleStore;
pub use forecast::{Forecast, MaterialForecaster, ProjectFeatures};
pub use graph::CatalogDag;
pub use metadata::ProjectMetadata;
pub use milestone::{
    DateAnchor, Milestone, MilestoneBinding, MilestoneKind, TaskRef, data_center_bindings,
    resolve_milestones,
};
pub use procurement::{
    DeliveryMethod, MaterialRequirement, ProcurementPlan, ProcurementWindow, TimelineEntry,
    UnschedulableMaterial, UnschedulableReason, compute_windows, data_center_requirements,
};
pub use schedule::{PhaseSummary, Schedule, ScheduleSummary};
pub use task::{Task, TaskId};
pub use vendor::{DEFAULT_LEAD_TIME_DAYS, Vendor, VendorDirectory, VendorLookup, VendorQuote};
