use crate::calculations;
use crate::catalog::TaskCatalog;
use crate::error::ScheduleResult;
use crate::metadata::ProjectMetadata;
use crate::milestone::{self, Milestone, MilestoneBinding};
use crate::procurement::{MaterialRequirement, ProcurementPlan};
use crate::task::{Task, TaskId};
use crate::vendor::VendorDirectory;
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSummary {
    pub phase: String,
    pub task_count: usize,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Calendar days between the phase's first start and last end.
    pub span_days: i64,
    /// Sum of task durations in the phase.
    pub work_days: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub project_name: String,
    pub project_start: NaiveDate,
    pub project_end: NaiveDate,
    pub total_duration_days: i64,
    pub task_count: usize,
    pub milestone_count: usize,
    pub phases: Vec<PhaseSummary>,
}

impl ScheduleSummary {
    pub fn to_cli_summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("tasks={}", self.task_count));
        parts.push(format!("milestones={}", self.milestone_count));
        parts.push(format!("start={}", self.project_start));
        parts.push(format!("finish={}", self.project_end));
        parts.push(format!("days={}", self.total_duration_days));
        if !self.phases.is_empty() {
            let spans = self
                .phases
                .iter()
                .map(|p| p.span_days.to_string())
                .collect::<Vec<_>>()
                .join("/");
            parts.push(format!("phase_spans={}", spans));
        }
        parts.join(", ")
    }
}

/// A resolved calendar: the catalog, its dated tasks and bound milestones.
///
/// Dates are only ever produced by the forward pass; changing the start date
/// re-runs the whole resolution instead of patching individual tasks.
#[derive(Debug, Clone)]
pub struct Schedule {
    metadata: ProjectMetadata,
    catalog: TaskCatalog,
    bindings: Vec<MilestoneBinding>,
    tasks: Vec<Task>,
    milestones: Vec<Milestone>,
}

impl Schedule {
    pub fn new(
        metadata: ProjectMetadata,
        catalog: TaskCatalog,
        bindings: Vec<MilestoneBinding>,
    ) -> ScheduleResult<Self> {
        let tasks = calculations::resolve(&catalog, metadata.project_start_date)?;
        let milestones = milestone::resolve_milestones(&tasks, &bindings)?;
        Ok(Self {
            metadata,
            catalog,
            bindings,
            tasks,
            milestones,
        })
    }

    /// The built-in data center template with its milestones.
    pub fn data_center(metadata: ProjectMetadata) -> ScheduleResult<Self> {
        Self::new(
            metadata,
            TaskCatalog::data_center()?,
            milestone::data_center_bindings(),
        )
    }

    pub fn metadata(&self) -> &ProjectMetadata {
        &self.metadata
    }

    pub fn catalog(&self) -> &TaskCatalog {
        &self.catalog
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    pub fn project_name(&self) -> &str {
        &self.metadata.project_name
    }

    pub fn project_start_date(&self) -> NaiveDate {
        self.metadata.project_start_date
    }

    pub fn find_task(&self, task_id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    pub fn find_task_by_name(&self, name: &str) -> Option<&Task> {
        self.catalog.id_of(name).and_then(|id| self.find_task(id))
    }

    /// Re-resolves the calendar from a new start date. On error the schedule
    /// is left untouched.
    pub fn set_project_start_date(&mut self, date: NaiveDate) -> ScheduleResult<()> {
        let tasks = calculations::resolve(&self.catalog, date)?;
        let milestones = milestone::resolve_milestones(&tasks, &self.bindings)?;
        self.metadata.project_start_date = date;
        self.tasks = tasks;
        self.milestones = milestones;
        Ok(())
    }

    /// Replaces the project metadata, re-resolving when the start date moved.
    pub fn set_metadata(&mut self, metadata: ProjectMetadata) -> ScheduleResult<()> {
        if metadata.project_start_date != self.metadata.project_start_date {
            self.set_project_start_date(metadata.project_start_date)?;
        }
        self.metadata = metadata;
        Ok(())
    }

    /// Days from the first task's start to the last declared task's end.
    pub fn total_duration_days(&self) -> i64 {
        let first = self.tasks.first().and_then(|t| t.start_date);
        let last = self.tasks.last().and_then(|t| t.end_date);
        match (first, last) {
            (Some(first), Some(last)) => (last - first).num_days(),
            _ => 0,
        }
    }

    pub fn procurement_plan(
        &self,
        requirements: &[MaterialRequirement],
        directory: &VendorDirectory,
    ) -> ProcurementPlan {
        ProcurementPlan::build(&self.tasks, requirements, directory)
    }

    pub fn dataframe(&self) -> PolarsResult<DataFrame> {
        let ids: Vec<u32> = self.tasks.iter().map(|t| t.id).collect();
        let names: Vec<&str> = self.tasks.iter().map(|t| t.name.as_str()).collect();
        let phases: Vec<&str> = self.tasks.iter().map(|t| t.phase.as_str()).collect();
        let durations: Vec<i64> = self.tasks.iter().map(|t| t.duration_days).collect();
        let starts: Vec<Option<i32>> = self
            .tasks
            .iter()
            .map(|t| t.start_date.map(Task::date_to_i32))
            .collect();
        let ends: Vec<Option<i32>> = self
            .tasks
            .iter()
            .map(|t| t.end_date.map(Task::date_to_i32))
            .collect();

        DataFrame::new(vec![
            Series::new(PlSmallStr::from_static("id"), ids).into_column(),
            Series::new(PlSmallStr::from_static("name"), names).into_column(),
            Series::new(PlSmallStr::from_static("phase"), phases).into_column(),
            Series::new(PlSmallStr::from_static("duration_days"), durations).into_column(),
            Series::new(PlSmallStr::from_static("start_date"), starts)
                .cast(&DataType::Date)?
                .into_column(),
            Series::new(PlSmallStr::from_static("end_date"), ends)
                .cast(&DataType::Date)?
                .into_column(),
        ])
    }

    /// Project span plus a per-phase breakdown in declaration order.
    pub fn summary(&self) -> ScheduleResult<ScheduleSummary> {
        let by_phase = self
            .dataframe()?
            .lazy()
            .group_by_stable([col("phase")])
            .agg([
                col("id").count().alias("task_count"),
                col("start_date").min(),
                col("end_date").max(),
                col("duration_days").sum().alias("work_days"),
            ])
            .collect()?;

        let names = by_phase.column("phase")?.str()?;
        let counts = by_phase.column("task_count")?.u32()?;
        let starts = by_phase.column("start_date")?.date()?;
        let ends = by_phase.column("end_date")?.date()?;
        let work = by_phase.column("work_days")?.i64()?;

        let mut phases = Vec::with_capacity(by_phase.height());
        for idx in 0..by_phase.height() {
            let (Some(start), Some(end)) = (starts.get(idx), ends.get(idx)) else {
                continue;
            };
            let start = Task::date_from_i32(start);
            let end = Task::date_from_i32(end);
            phases.push(PhaseSummary {
                phase: names.get(idx).unwrap_or_default().to_string(),
                task_count: counts.get(idx).unwrap_or(0) as usize,
                start,
                end,
                span_days: (end - start).num_days(),
                work_days: work.get(idx).unwrap_or(0),
            });
        }

        let project_start = self
            .tasks
            .iter()
            .filter_map(|t| t.start_date)
            .min()
            .unwrap_or(self.metadata.project_start_date);
        let project_end = self
            .tasks
            .iter()
            .filter_map(|t| t.end_date)
            .max()
            .unwrap_or(project_start);

        Ok(ScheduleSummary {
            project_name: self.metadata.project_name.clone(),
            project_start,
            project_end,
            total_duration_days: (project_end - project_start).num_days(),
            task_count: self.tasks.len(),
            milestone_count: self.milestones.len(),
            phases,
        })
    }
}
