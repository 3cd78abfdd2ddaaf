//! Boundary to the material-quantity forecaster.
//!
//! The predictor itself lives outside this crate. Implementations are free to
//! be stochastic; nothing here assumes identical input yields identical output.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFeatures {
    pub project_type: String,
    pub region: String,
    /// Facility power capacity in MW.
    pub power_capacity: f64,
    /// Built-up area in square feet.
    pub area: f64,
}

impl Default for ProjectFeatures {
    fn default() -> Self {
        Self {
            project_type: "Data Center".to_string(),
            region: "Maharashtra".to_string(),
            power_capacity: 25.0,
            area: 200_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub material_id: u32,
    pub quantity: f64,
}

pub trait MaterialForecaster: Send + Sync {
    fn predict(&self, features: &ProjectFeatures) -> Forecast;
}

impl<F> MaterialForecaster for F
where
    F: Fn(&ProjectFeatures) -> Forecast + Send + Sync,
{
    fn predict(&self, features: &ProjectFeatures) -> Forecast {
        self(features)
    }
}

const MATERIAL_NAMES: [(u32, &str); 10] = [
    (101, "Steel Reinforcement Bars"),
    (102, "Concrete Mix"),
    (103, "Electrical Cables"),
    (104, "HVAC Equipment"),
    (105, "Flooring Materials"),
    (106, "Insulation Materials"),
    (107, "Piping Systems"),
    (108, "Fire Safety Equipment"),
    (109, "Glass Panels"),
    (110, "Roofing Materials"),
];

/// Display name of a forecaster material id.
pub fn material_name(material_id: u32) -> Option<&'static str> {
    MATERIAL_NAMES
        .iter()
        .find(|(id, _)| *id == material_id)
        .map(|(_, name)| *name)
}
