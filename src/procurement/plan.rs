use super::window::{
    ProcurementWindow, TimelineEntry, UnschedulableReason, compute_windows, timeline_entries,
};
use super::MaterialRequirement;
use crate::error::{ScheduleError, ScheduleResult};
use crate::task::Task;
use crate::vendor::{Vendor, VendorDirectory};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

const LOGISTICS_RATE: f64 = 0.05;
const INSURANCE_RATE: f64 = 0.02;
const CONTINGENCY_RATE: f64 = 0.10;
const MAX_BACKUP_VENDORS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcurementMethod {
    CompetitiveBidding,
    DirectProcurement,
}

impl ProcurementMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcurementMethod::CompetitiveBidding => "Competitive bidding",
            ProcurementMethod::DirectProcurement => "Direct procurement",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStrategy {
    JustInTime,
    SafetyStock,
}

impl InventoryStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStrategy::JustInTime => "Just-in-time",
            InventoryStrategy::SafetyStock => "Safety stock",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialStrategy {
    pub material_name: String,
    /// `None` until a vendor is on record for the material.
    pub primary_vendor: Option<Vendor>,
    pub backup_vendors: Vec<Vendor>,
    pub procurement_method: ProcurementMethod,
    pub inventory_strategy: InventoryStrategy,
    pub window: ProcurementWindow,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetLine {
    pub material_name: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
    /// Share of the total material cost, in percent, rounded to two decimals.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetBreakdown {
    pub lines: Vec<BudgetLine>,
    pub total_material_cost: f64,
    pub logistics: f64,
    pub insurance: f64,
    pub contingency: f64,
    pub total_procurement_cost: f64,
    pub currency: String,
}

impl BudgetBreakdown {
    pub fn from_requirements(requirements: &[MaterialRequirement]) -> Self {
        let total_material_cost: f64 = requirements
            .iter()
            .map(MaterialRequirement::estimated_total_cost)
            .sum();
        let lines = requirements
            .iter()
            .map(|req| {
                let total_cost = req.estimated_total_cost();
                let percentage = if total_material_cost > 0.0 {
                    (total_cost / total_material_cost * 100.0 * 100.0).round() / 100.0
                } else {
                    0.0
                };
                BudgetLine {
                    material_name: req.material_name.clone(),
                    quantity: req.quantity,
                    unit_cost: req.estimated_cost_per_unit,
                    total_cost,
                    percentage,
                }
            })
            .collect();

        let logistics = total_material_cost * LOGISTICS_RATE;
        let insurance = total_material_cost * INSURANCE_RATE;
        let contingency = total_material_cost * CONTINGENCY_RATE;
        Self {
            lines,
            total_material_cost,
            logistics,
            insurance,
            contingency,
            total_procurement_cost: total_material_cost + logistics + insurance + contingency,
            currency: "INR".to_string(),
        }
    }
}

/// A material the plan could not give delivery dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnschedulableMaterial {
    pub material_name: String,
    pub required_for_task_names: Vec<String>,
    pub reason: UnschedulableReason,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcurementPlan {
    pub strategies: Vec<MaterialStrategy>,
    pub budget: BudgetBreakdown,
    pub unschedulable: Vec<UnschedulableMaterial>,
    /// Per-task order dates, grouped by material in strategy order.
    pub timeline: Vec<TimelineEntry>,
}

impl ProcurementPlan {
    /// Strategies follow requirement order; a repeated material keeps its last entry.
    pub fn build(
        resolved_tasks: &[Task],
        requirements: &[MaterialRequirement],
        directory: &VendorDirectory,
    ) -> Self {
        let mut windows = compute_windows(resolved_tasks, requirements, directory);

        let last_position: HashMap<&str, usize> = requirements
            .iter()
            .enumerate()
            .map(|(idx, req)| (req.material_name.as_str(), idx))
            .collect();

        let mut strategies = Vec::with_capacity(requirements.len());
        let mut unschedulable = Vec::new();
        let mut timeline = Vec::new();
        for (idx, requirement) in requirements.iter().enumerate() {
            if last_position[requirement.material_name.as_str()] != idx {
                continue;
            }
            let Some(window) = windows.remove(&requirement.material_name) else {
                continue;
            };
            if let Some(reason) = window.unschedulable_reason() {
                unschedulable.push(UnschedulableMaterial {
                    material_name: requirement.material_name.clone(),
                    required_for_task_names: requirement.required_for_task_names.clone(),
                    reason,
                });
            }
            timeline.extend(timeline_entries(resolved_tasks, &window));
            strategies.push(Self::strategy_for(requirement, directory, window));
        }

        Self {
            strategies,
            budget: BudgetBreakdown::from_requirements(requirements),
            unschedulable,
            timeline,
        }
    }

    fn strategy_for(
        requirement: &MaterialRequirement,
        directory: &VendorDirectory,
        window: ProcurementWindow,
    ) -> MaterialStrategy {
        let listed = directory.listed(&requirement.material_name);
        let procurement_method = if listed.len() > 2 {
            ProcurementMethod::CompetitiveBidding
        } else {
            ProcurementMethod::DirectProcurement
        };
        let primary_vendor = directory.best_vendor(&requirement.material_name).cloned();
        // backups keep directory order, not rating order
        let backup_vendors = listed
            .iter()
            .filter(|vendor| Some(*vendor) != primary_vendor.as_ref())
            .take(MAX_BACKUP_VENDORS)
            .cloned()
            .collect();

        MaterialStrategy {
            material_name: requirement.material_name.clone(),
            primary_vendor,
            backup_vendors,
            procurement_method,
            inventory_strategy: if requirement.is_critical_path {
                InventoryStrategy::SafetyStock
            } else {
                InventoryStrategy::JustInTime
            },
            window,
        }
    }

    pub fn windows(&self) -> impl Iterator<Item = &ProcurementWindow> {
        self.strategies.iter().map(|strategy| &strategy.window)
    }

    pub fn window(&self, material_name: &str) -> Option<&ProcurementWindow> {
        self.windows().find(|w| w.material_name == material_name)
    }

    pub fn is_complete(&self) -> bool {
        self.unschedulable.is_empty()
    }

    /// Escalates the first unschedulable material to an error.
    pub fn require_complete(&self) -> ScheduleResult<()> {
        match self.unschedulable.first() {
            Some(missing) => Err(ScheduleError::UnschedulableMaterial {
                material: missing.material_name.clone(),
                reason: missing.reason,
            }),
            None => Ok(()),
        }
    }
}
