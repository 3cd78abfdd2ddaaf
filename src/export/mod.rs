//! Serialized views of the resolved calendar and the procurement timeline.
//!
//! Records here are what the dashboard, HTTP layer and CLI consume. Building
//! them never recomputes dates; they only copy what the core produced.

use crate::milestone::{Milestone, MilestoneKind};
use crate::procurement::{DeliveryMethod, ProcurementWindow};
use crate::schedule::Schedule;
use crate::task::{Task, TaskId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("invalid data: {0}")]
    InvalidData(String),
    #[error("no schedule stored")]
    NotFound,
}

pub type ExportResult<T> = Result<T, ExportError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: TaskId,
    pub name: String,
    pub phase: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration_days: i64,
    pub dependency_ids: Vec<TaskId>,
}

impl TaskRecord {
    pub fn from_task(task: &Task) -> ExportResult<Self> {
        let (start_date, end_date) = task.dates().ok_or_else(|| {
            ExportError::InvalidData(format!("task {} has no resolved dates", task.id))
        })?;
        Ok(Self {
            id: task.id,
            name: task.name.clone(),
            phase: task.phase.clone(),
            start_date,
            end_date,
            duration_days: task.duration_days,
            dependency_ids: task.dependencies.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneRecord {
    pub name: String,
    pub date: NaiveDate,
    pub kind: MilestoneKind,
}

impl From<&Milestone> for MilestoneRecord {
    fn from(milestone: &Milestone) -> Self {
        Self {
            name: milestone.name.clone(),
            date: milestone.date,
            kind: milestone.kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleExport {
    pub project_name: String,
    pub tasks: Vec<TaskRecord>,
    pub milestones: Vec<MilestoneRecord>,
    pub total_duration_days: i64,
}

impl ScheduleExport {
    pub fn from_schedule(schedule: &Schedule) -> ExportResult<Self> {
        let tasks = schedule
            .tasks()
            .iter()
            .map(TaskRecord::from_task)
            .collect::<ExportResult<Vec<_>>>()?;
        Ok(Self {
            project_name: schedule.project_name().to_string(),
            tasks,
            milestones: schedule.milestones().iter().map(MilestoneRecord::from).collect(),
            total_duration_days: schedule.total_duration_days(),
        })
    }
}

/// One row of the procurement timeline; unschedulable materials carry no dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementRecord {
    pub material_name: String,
    pub delivery_start: Option<NaiveDate>,
    pub delivery_end: Option<NaiveDate>,
    pub lead_time_days: u32,
    pub delivery_method: DeliveryMethod,
}

impl From<&ProcurementWindow> for ProcurementRecord {
    fn from(window: &ProcurementWindow) -> Self {
        Self {
            material_name: window.material_name.clone(),
            delivery_start: window.delivery_start,
            delivery_end: window.delivery_end,
            lead_time_days: window.lead_time_days,
            delivery_method: window.delivery_method,
        }
    }
}

pub fn procurement_records<'a, I>(windows: I) -> Vec<ProcurementRecord>
where
    I: IntoIterator<Item = &'a ProcurementWindow>,
{
    windows.into_iter().map(ProcurementRecord::from).collect()
}

pub trait ScheduleStore {
    fn save_schedule(&self, export: &ScheduleExport) -> ExportResult<()>;
    fn load_schedule(&self) -> ExportResult<Option<ScheduleExport>>;
    fn save_procurement(&self, records: &[ProcurementRecord]) -> ExportResult<()>;
    fn load_procurement(&self) -> ExportResult<Vec<ProcurementRecord>>;
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_procurement_from_csv, load_procurement_from_json, load_schedule_from_csv,
    load_schedule_from_json, load_timeline_from_csv, load_timeline_from_json,
    save_procurement_to_csv, save_procurement_to_json, save_schedule_to_csv, save_schedule_to_json,
    save_timeline_to_csv, save_timeline_to_json,
};
