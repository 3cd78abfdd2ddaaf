pub mod forward_pass;

use crate::catalog::TaskCatalog;
use crate::error::ScheduleResult;
use crate::task::Task;
use chrono::NaiveDate;

/// Resolves concrete start and end dates for every catalog task.
pub fn resolve(catalog: &TaskCatalog, project_start: NaiveDate) -> ScheduleResult<Vec<Task>> {
    forward_pass::ForwardPass::new(catalog).execute(project_start)
}
