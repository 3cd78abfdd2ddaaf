use crate::catalog::TaskCatalog;
use crate::error::{CatalogViolation, ScheduleError, ScheduleResult};
use crate::task::{Task, TaskId};
use chrono::{Days, NaiveDate};
use std::collections::HashMap;

/// Single pass over the catalog in declaration order.
///
/// Declaration order is already topological, so each task only needs the end
/// dates of tasks visited before it. A dependent starts one full day after its
/// latest-finishing dependency.
pub struct ForwardPass<'a> {
    catalog: &'a TaskCatalog,
}

impl<'a> ForwardPass<'a> {
    pub fn new(catalog: &'a TaskCatalog) -> Self {
        Self { catalog }
    }

    pub fn execute(&self, project_start: NaiveDate) -> ScheduleResult<Vec<Task>> {
        let mut end_dates: HashMap<TaskId, NaiveDate> = HashMap::with_capacity(self.catalog.len());
        let mut resolved = Vec::with_capacity(self.catalog.len());

        for task in self.catalog.tasks() {
            let start = self.start_for(task, &end_dates, project_start)?;
            let end = start
                .checked_add_days(Days::new(task.duration_days.unsigned_abs()))
                .ok_or(ScheduleError::DateOutOfRange(task.id))?;
            end_dates.insert(task.id, end);

            let mut task = task.clone();
            task.start_date = Some(start);
            task.end_date = Some(end);
            resolved.push(task);
        }

        tracing::debug!(
            tasks = resolved.len(),
            %project_start,
            finish = ?resolved.iter().filter_map(|t| t.end_date).max(),
            "forward pass complete"
        );
        Ok(resolved)
    }

    fn start_for(
        &self,
        task: &Task,
        end_dates: &HashMap<TaskId, NaiveDate>,
        project_start: NaiveDate,
    ) -> ScheduleResult<NaiveDate> {
        let mut latest: Option<NaiveDate> = None;
        for dep_id in &task.dependencies {
            let dep_end = end_dates.get(dep_id).copied().ok_or(
                CatalogViolation::UnresolvedDependency {
                    task_id: task.id,
                    dependency_id: *dep_id,
                },
            )?;
            latest = latest.max(Some(dep_end));
        }
        match latest {
            None => Ok(project_start),
            Some(latest) => latest
                .checked_add_days(Days::new(1))
                .ok_or(ScheduleError::DateOutOfRange(task.id)),
        }
    }
}
