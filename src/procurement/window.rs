use super::MaterialRequirement;
use crate::task::{Task, TaskId};
use crate::vendor::{DEFAULT_LEAD_TIME_DAYS, VendorLookup};
use chrono::{Days, NaiveDate};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Quantities strictly above this are delivered in phases.
pub const PHASED_DELIVERY_THRESHOLD: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryMethod {
    Phased,
    Single,
}

impl DeliveryMethod {
    pub fn for_quantity(quantity: f64) -> Self {
        if quantity > PHASED_DELIVERY_THRESHOLD {
            DeliveryMethod::Phased
        } else {
            DeliveryMethod::Single
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Phased => "phased",
            DeliveryMethod::Single => "single",
        }
    }
}

impl fmt::Display for DeliveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery window for one material. Both dates are `None` when the window
/// is unschedulable; [`ProcurementWindow::unschedulable_reason`] says why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcurementWindow {
    pub material_name: String,
    pub delivery_start: Option<NaiveDate>,
    pub delivery_end: Option<NaiveDate>,
    pub lead_time_days: u32,
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub matched_task_ids: Vec<TaskId>,
}

impl ProcurementWindow {
    pub fn is_schedulable(&self) -> bool {
        self.delivery_start.is_some() && self.delivery_end.is_some()
    }

    /// Why the window carries no dates, or `None` when it is schedulable.
    pub fn unschedulable_reason(&self) -> Option<UnschedulableReason> {
        if self.is_schedulable() {
            None
        } else if self.matched_task_ids.is_empty() {
            Some(UnschedulableReason::NoMatchingTask)
        } else {
            Some(UnschedulableReason::LeadTimeOutOfRange)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnschedulableReason {
    NoMatchingTask,
    /// Tasks matched, but ordering ahead of them falls before the supported calendar.
    LeadTimeOutOfRange,
}

impl fmt::Display for UnschedulableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnschedulableReason::NoMatchingTask => {
                f.write_str("no task matches the requirement keywords")
            }
            UnschedulableReason::LeadTimeOutOfRange => {
                f.write_str("lead time reaches before the supported calendar range")
            }
        }
    }
}

/// When a material must be ordered to arrive for one particular task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub material_name: String,
    pub task_id: TaskId,
    pub required_for_task: String,
    pub task_start_date: NaiveDate,
    /// `None` when the lead time reaches before the supported calendar.
    pub procurement_start_date: Option<NaiveDate>,
    pub lead_time_days: u32,
}

/// One entry per task matched by `window`, looked up by id.
pub fn timeline_entries(resolved_tasks: &[Task], window: &ProcurementWindow) -> Vec<TimelineEntry> {
    let by_id: HashMap<TaskId, &Task> = resolved_tasks.iter().map(|t| (t.id, t)).collect();
    window
        .matched_task_ids
        .iter()
        .filter_map(|id| by_id.get(id).copied())
        .filter_map(|task| {
            let task_start_date = task.start_date?;
            Some(TimelineEntry {
                material_name: window.material_name.clone(),
                task_id: task.id,
                required_for_task: task.name.clone(),
                task_start_date,
                procurement_start_date: task_start_date
                    .checked_sub_days(Days::new(u64::from(window.lead_time_days))),
                lead_time_days: window.lead_time_days,
            })
        })
        .collect()
}

/// Computes one window per requirement, keyed by material name.
///
/// Materials are independent of each other and are computed in parallel. When
/// two requirements share a material name, the later one wins.
pub fn compute_windows<L>(
    resolved_tasks: &[Task],
    requirements: &[MaterialRequirement],
    vendor_lookup: &L,
) -> BTreeMap<String, ProcurementWindow>
where
    L: VendorLookup + ?Sized,
{
    let windows: BTreeMap<String, ProcurementWindow> = requirements
        .par_iter()
        .map(|requirement| {
            let window = compute_window(resolved_tasks, requirement, vendor_lookup);
            (requirement.material_name.clone(), window)
        })
        .collect();

    tracing::info!(
        materials = windows.len(),
        unschedulable = windows.values().filter(|w| !w.is_schedulable()).count(),
        "procurement windows computed"
    );
    windows
}

pub fn compute_window<L>(
    resolved_tasks: &[Task],
    requirement: &MaterialRequirement,
    vendor_lookup: &L,
) -> ProcurementWindow
where
    L: VendorLookup + ?Sized,
{
    let lead_time_days = vendor_lookup
        .best_rated(&requirement.material_name)
        .map(|quote| quote.lead_time_days)
        .unwrap_or(DEFAULT_LEAD_TIME_DAYS);

    let mut window = ProcurementWindow {
        material_name: requirement.material_name.clone(),
        delivery_start: None,
        delivery_end: None,
        lead_time_days,
        delivery_method: DeliveryMethod::for_quantity(requirement.quantity),
        matched_task_ids: Vec::new(),
    };

    // (start, end) of the earliest-starting and latest-ending matches
    let mut earliest: Option<(NaiveDate, NaiveDate)> = None;
    let mut latest: Option<(NaiveDate, NaiveDate)> = None;
    for task in resolved_tasks {
        let matches = requirement
            .required_for_task_names
            .iter()
            .any(|fragment| task.name.contains(fragment.as_str()));
        if !matches {
            continue;
        }
        let Some((start, end)) = task.dates() else {
            continue;
        };
        window.matched_task_ids.push(task.id);
        if earliest.is_none_or(|(best, _)| start < best) {
            earliest = Some((start, end));
        }
        if latest.is_none_or(|(_, best)| end > best) {
            latest = Some((start, end));
        }
    }

    let (Some((earliest_start, _)), Some((latest_start, _))) = (earliest, latest) else {
        tracing::warn!(
            material = %requirement.material_name,
            keywords = ?requirement.required_for_task_names,
            "no resolved task matches material requirement"
        );
        return window;
    };

    match earliest_start.checked_sub_days(Days::new(u64::from(lead_time_days))) {
        Some(delivery_start) => {
            window.delivery_start = Some(delivery_start);
            window.delivery_end = Some(latest_start);
        }
        None => tracing::warn!(
            material = %requirement.material_name,
            lead_time_days,
            "lead time reaches before the supported calendar range"
        ),
    }
    window
}
