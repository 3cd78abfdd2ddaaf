//! Backward-looking procurement schedule derived from the resolved calendar.

pub mod plan;
pub mod window;

pub use plan::{
    BudgetBreakdown, BudgetLine, InventoryStrategy, MaterialStrategy, ProcurementMethod,
    ProcurementPlan, UnschedulableMaterial,
};
pub use window::{
    DeliveryMethod, PHASED_DELIVERY_THRESHOLD, ProcurementWindow, TimelineEntry,
    UnschedulableReason, compute_window, compute_windows, timeline_entries,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequirement {
    pub material_name: String,
    pub quantity: f64,
    pub unit: String,
    #[serde(default)]
    pub is_critical_path: bool,
    /// Fragments matched (case-sensitive substring) against resolved task names.
    pub required_for_task_names: Vec<String>,
    #[serde(default)]
    pub estimated_cost_per_unit: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_standards: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_requirements: Option<String>,
}

impl MaterialRequirement {
    pub fn new<I, S>(
        material_name: impl Into<String>,
        quantity: f64,
        unit: impl Into<String>,
        required_for_task_names: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            material_name: material_name.into(),
            quantity,
            unit: unit.into(),
            is_critical_path: false,
            required_for_task_names: required_for_task_names.into_iter().map(Into::into).collect(),
            estimated_cost_per_unit: 0.0,
            quality_standards: None,
            storage_requirements: None,
        }
    }

    pub fn critical(mut self) -> Self {
        self.is_critical_path = true;
        self
    }

    pub fn with_unit_cost(mut self, cost: f64) -> Self {
        self.estimated_cost_per_unit = cost;
        self
    }

    pub fn with_standards(mut self, quality: &str, storage: &str) -> Self {
        self.quality_standards = Some(quality.to_string());
        self.storage_requirements = Some(storage.to_string());
        self
    }

    pub fn estimated_total_cost(&self) -> f64 {
        self.quantity * self.estimated_cost_per_unit
    }
}

/// Material requirements of the 25MW data center project.
pub fn data_center_requirements() -> Vec<MaterialRequirement> {
    vec![
        MaterialRequirement::new(
            "Steel Reinforcement Bars",
            160.0,
            "tons",
            ["Excavation & Foundation", "Steel Structure Assembly"],
        )
        .critical()
        .with_unit_cost(15000.0)
        .with_standards(
            "IS 1786:2008, Grade Fe 500",
            "Covered warehouse, max 3 tier stacking",
        ),
        MaterialRequirement::new(
            "Concrete Mix",
            200.0,
            "cubic meters",
            ["Foundation Work", "Superstructure"],
        )
        .critical()
        .with_unit_cost(5000.0)
        .with_standards("IS 456:2000, M30 Grade", "Ready-mix on demand, no storage"),
        MaterialRequirement::new(
            "Electrical Cables",
            80.0,
            "kilometers",
            ["Electrical Infrastructure", "Power Distribution"],
        )
        .with_unit_cost(8000.0)
        .with_standards("IS 694:1990, PVC insulated", "Dry storage, vertical reels"),
        MaterialRequirement::new(
            "HVAC Equipment",
            84.0,
            "units",
            ["HVAC System Installation"],
        )
        .critical()
        .with_unit_cost(150000.0)
        .with_standards(
            "ASHRAE standards, Energy Star rated",
            "Climate-controlled warehouse",
        ),
    ]
}
