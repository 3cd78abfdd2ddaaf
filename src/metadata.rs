use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Project-level settings that drive a scheduling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    #[serde(default)]
    pub location: String,
    pub project_start_date: NaiveDate,
}

impl Default for ProjectMetadata {
    fn default() -> Self {
        Self {
            project_name: "Data Center Construction Project".to_string(),
            project_description: "25MW facility, 200,000 sq ft".to_string(),
            location: "Maharashtra, India".to_string(),
            project_start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

impl ProjectMetadata {
    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.project_start_date = date;
        self
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, crate::ExportError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
