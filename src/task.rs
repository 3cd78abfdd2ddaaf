use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Stable task identifier, assigned once when the catalog is built.
pub type TaskId = u32;

/// A catalog task, optionally carrying the dates computed by the forward pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub phase: String,
    pub duration_days: i64,
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(
        id: TaskId,
        name: impl Into<String>,
        phase: impl Into<String>,
        duration_days: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            phase: phase.into(),
            duration_days,
            dependencies: Vec::new(),
            start_date: None,
            end_date: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: impl IntoIterator<Item = TaskId>) -> Self {
        self.dependencies = dependencies.into_iter().collect();
        self.dependencies.sort_unstable();
        self.dependencies.dedup();
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.start_date.is_some() && self.end_date.is_some()
    }

    /// Both computed dates, if the task went through the forward pass.
    pub fn dates(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.start_date.zip(self.end_date)
    }

    pub(crate) fn date_to_i32(date: NaiveDate) -> i32 {
        (date - NaiveDate::default()).num_days() as i32
    }

    pub(crate) fn date_from_i32(days: i32) -> NaiveDate {
        NaiveDate::default() + Duration::days(days as i64)
    }
}
