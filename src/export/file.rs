use super::{
    ExportError, ExportResult, MilestoneRecord, ProcurementRecord, ScheduleExport, TaskRecord,
};
use crate::procurement::TimelineEntry;
use crate::task::TaskId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

const METADATA_ROW_NAME: &str = "__metadata__";

pub fn save_schedule_to_json<P: AsRef<Path>>(
    export: &ScheduleExport,
    path: P,
) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, export)?;
    Ok(())
}

pub fn load_schedule_from_json<P: AsRef<Path>>(path: P) -> ExportResult<ScheduleExport> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Fields of the export that do not fit a task row.
#[derive(Serialize, Deserialize)]
struct ExportHeader {
    project_name: String,
    milestones: Vec<MilestoneRecord>,
    total_duration_days: i64,
}

#[derive(Default, Serialize, Deserialize)]
struct TaskCsvRecord {
    id: TaskId,
    name: String,
    phase: String,
    start_date: String,
    end_date: String,
    duration_days: i64,
    dependency_ids: String,
    #[serde(default)]
    metadata_json: String,
}

impl From<&TaskRecord> for TaskCsvRecord {
    fn from(task: &TaskRecord) -> Self {
        Self {
            id: task.id,
            name: task.name.clone(),
            phase: task.phase.clone(),
            start_date: format_date(task.start_date),
            end_date: format_date(task.end_date),
            duration_days: task.duration_days,
            dependency_ids: join_ids(&task.dependency_ids),
            metadata_json: String::new(),
        }
    }
}

impl TaskCsvRecord {
    fn metadata_row(export: &ScheduleExport) -> ExportResult<Self> {
        let header = ExportHeader {
            project_name: export.project_name.clone(),
            milestones: export.milestones.clone(),
            total_duration_days: export.total_duration_days,
        };
        Ok(Self {
            name: METADATA_ROW_NAME.to_string(),
            metadata_json: serde_json::to_string(&header)?,
            ..Self::default()
        })
    }

    fn is_metadata_row(&self) -> bool {
        !self.metadata_json.trim().is_empty()
    }

    fn into_task(self) -> ExportResult<TaskRecord> {
        if self.is_metadata_row() {
            return Err(ExportError::InvalidData(
                "metadata row cannot be converted to task".into(),
            ));
        }
        Ok(TaskRecord {
            id: self.id,
            name: self.name,
            phase: self.phase,
            start_date: parse_date(&self.start_date)?,
            end_date: parse_date(&self.end_date)?,
            duration_days: self.duration_days,
            dependency_ids: split_ids(&self.dependency_ids)?,
        })
    }
}

/// Writes one row per task, preceded by a metadata row holding the project
/// name and milestones as JSON.
pub fn save_schedule_to_csv<P: AsRef<Path>>(export: &ScheduleExport, path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    writer.serialize(TaskCsvRecord::metadata_row(export)?)?;
    for task in &export.tasks {
        writer.serialize(TaskCsvRecord::from(task))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_schedule_from_csv<P: AsRef<Path>>(path: P) -> ExportResult<ScheduleExport> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut header: Option<ExportHeader> = None;
    let mut tasks = Vec::new();
    for record in reader.deserialize::<TaskCsvRecord>() {
        let record = record?;
        if record.is_metadata_row() {
            if header.is_some() {
                return Err(ExportError::InvalidData(
                    "CSV file contained multiple metadata rows".into(),
                ));
            }
            header = Some(serde_json::from_str(&record.metadata_json).map_err(|err| {
                ExportError::InvalidData(format!("invalid metadata json: {err}"))
            })?);
            continue;
        }
        tasks.push(record.into_task()?);
    }

    let header = header
        .ok_or_else(|| ExportError::InvalidData("CSV file contained no metadata row".into()))?;
    Ok(ScheduleExport {
        project_name: header.project_name,
        tasks,
        milestones: header.milestones,
        total_duration_days: header.total_duration_days,
    })
}

pub fn save_procurement_to_json<P: AsRef<Path>>(
    records: &[ProcurementRecord],
    path: P,
) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

pub fn load_procurement_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Vec<ProcurementRecord>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// Unschedulable materials are written with empty date cells.
pub fn save_procurement_to_csv<P: AsRef<Path>>(
    records: &[ProcurementRecord],
    path: P,
) -> ExportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_procurement_from_csv<P: AsRef<Path>>(path: P) -> ExportResult<Vec<ProcurementRecord>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for record in reader.deserialize::<ProcurementRecord>() {
        records.push(record?);
    }
    Ok(records)
}

pub fn save_timeline_to_json<P: AsRef<Path>>(entries: &[TimelineEntry], path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, entries)?;
    Ok(())
}

pub fn load_timeline_from_json<P: AsRef<Path>>(path: P) -> ExportResult<Vec<TimelineEntry>> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(file)?)
}

/// One row per (material, task); an out-of-range order date is an empty cell.
pub fn save_timeline_to_csv<P: AsRef<Path>>(entries: &[TimelineEntry], path: P) -> ExportResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for entry in entries {
        writer.serialize(entry)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_timeline_from_csv<P: AsRef<Path>>(path: P) -> ExportResult<Vec<TimelineEntry>> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    reader
        .deserialize::<TimelineEntry>()
        .map(|row| row.map_err(ExportError::from))
        .collect()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(input: &str) -> ExportResult<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| ExportError::InvalidData(format!("invalid date '{input}': {e}")))
}

fn join_ids(values: &[TaskId]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn split_ids(input: &str) -> ExportResult<Vec<TaskId>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<TaskId>()
                .map_err(|e| ExportError::InvalidData(format!("invalid task id '{part}': {e}")))
        })
        .collect()
}
