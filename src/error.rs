use crate::milestone::TaskRef;
use crate::procurement::UnschedulableReason;
use crate::task::TaskId;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Structural problems found while building a [`TaskCatalog`](crate::TaskCatalog).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogViolation {
    #[error("task '{task}' depends on index {index}, but the catalog only has {len} tasks")]
    DependencyOutOfRange {
        task: String,
        index: usize,
        len: usize,
    },
    #[error("task '{task}' (index {position}) depends on index {index}, which is not declared before it")]
    ForwardReference {
        task: String,
        position: usize,
        index: usize,
    },
    #[error("task name '{name}' is declared more than once")]
    DuplicateName { name: String },
    #[error("task '{task}' has non-positive duration {duration_days}")]
    NonPositiveDuration { task: String, duration_days: i64 },
    #[error("task at index {position} in phase '{phase}' has a blank name")]
    BlankTaskName { phase: String, position: usize },
    #[error("phase #{position} has a blank name")]
    BlankPhaseName { position: usize },
    #[error("dependency graph contains a cycle through task {task_id}")]
    Cycle { task_id: TaskId },
    #[error("task {task_id} depends on task {dependency_id}, which was not resolved first")]
    UnresolvedDependency {
        task_id: TaskId,
        dependency_id: TaskId,
    },
}

#[derive(Debug, Error)]
pub enum ScheduleError {
    #[error("invalid catalog: {0}")]
    InvalidCatalog(#[from] CatalogViolation),
    #[error("unknown task reference {0}")]
    UnknownTaskReference(TaskRef),
    #[error("task {0} has no resolved dates")]
    UnresolvedTask(TaskId),
    #[error("material '{material}' cannot be scheduled: {reason}")]
    UnschedulableMaterial {
        material: String,
        reason: UnschedulableReason,
    },
    #[error("date arithmetic overflowed while scheduling task {0}")]
    DateOutOfRange(TaskId),
    #[error("tabular summary error: {0}")]
    Table(#[from] PolarsError),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;
