use chrono::NaiveDate;
use construction_schedule::procurement::{InventoryStrategy, ProcurementMethod};
use chrono::Days;
use construction_schedule::procurement::timeline_entries;
use construction_schedule::{
    DEFAULT_LEAD_TIME_DAYS, DeliveryMethod, MaterialRequirement, ProcurementPlan, ScheduleError,
    Task, TaskCatalog, UnschedulableReason, Vendor, VendorDirectory, VendorQuote, compute_windows,
    data_center_requirements, resolve,
};
use std::collections::HashMap;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn resolved(id: u32, name: &str, start: NaiveDate, end: NaiveDate) -> Task {
    let mut task = Task::new(id, name, "Works", (end - start).num_days());
    task.start_date = Some(start);
    task.end_date = Some(end);
    task
}

fn quotes(entries: &[(&str, u32)]) -> HashMap<String, VendorQuote> {
    entries
        .iter()
        .map(|(material, lead)| {
            (
                material.to_string(),
                VendorQuote {
                    lead_time_days: *lead,
                    rating: 4.0,
                },
            )
        })
        .collect()
}

#[test]
fn window_opens_lead_time_before_first_matching_task() {
    let tasks = vec![resolved(0, "Foundation Work", d(2024, 3, 1), d(2024, 3, 20))];
    let requirements = vec![MaterialRequirement::new("Steel", 150.0, "tons", ["Foundation"])];

    let windows = compute_windows(&tasks, &requirements, &quotes(&[("Steel", 14)]));
    let steel = &windows["Steel"];

    assert_eq!(steel.delivery_start, Some(d(2024, 2, 16)));
    assert_eq!(steel.delivery_end, Some(d(2024, 3, 1)));
    assert_eq!(steel.lead_time_days, 14);
    assert_eq!(steel.delivery_method, DeliveryMethod::Phased);
    assert_eq!(steel.matched_task_ids, vec![0]);
}

#[test]
fn delivery_end_is_the_start_of_the_latest_finishing_task() {
    let tasks = vec![
        resolved(0, "Pour Slab A", d(2024, 5, 1), d(2024, 5, 10)),
        resolved(1, "Pour Slab B", d(2024, 5, 3), d(2024, 6, 1)),
        resolved(2, "Cure", d(2024, 6, 2), d(2024, 6, 9)),
    ];
    let requirements = vec![MaterialRequirement::new("Concrete", 50.0, "m3", ["Slab"])];

    let windows = compute_windows(&tasks, &requirements, &quotes(&[("Concrete", 7)]));
    let concrete = &windows["Concrete"];

    assert_eq!(concrete.delivery_start, Some(d(2024, 4, 24)));
    assert_eq!(concrete.delivery_end, Some(d(2024, 5, 3)));
    assert_eq!(concrete.delivery_method, DeliveryMethod::Single);
    assert_eq!(concrete.matched_task_ids, vec![0, 1]);
}

#[test]
fn ties_keep_the_first_declared_task() {
    let tasks = vec![
        resolved(0, "Wiring East", d(2024, 5, 1), d(2024, 5, 20)),
        resolved(1, "Wiring West", d(2024, 5, 10), d(2024, 5, 20)),
    ];
    let requirements = vec![MaterialRequirement::new("Cable", 10.0, "km", ["Wiring"])];

    let windows = compute_windows(&tasks, &requirements, &quotes(&[("Cable", 1)]));
    assert_eq!(windows["Cable"].delivery_end, Some(d(2024, 5, 1)));
}

#[test]
fn matching_is_case_sensitive_substring() {
    let tasks = vec![resolved(0, "Foundation Work", d(2024, 3, 1), d(2024, 3, 20))];
    let requirements = vec![MaterialRequirement::new("Steel", 10.0, "tons", ["foundation"])];

    let windows = compute_windows(&tasks, &requirements, &quotes(&[("Steel", 14)]));
    assert!(!windows["Steel"].is_schedulable());
    assert_eq!(windows["Steel"].delivery_start, None);
    assert_eq!(windows["Steel"].delivery_end, None);
}

#[test]
fn missing_vendor_falls_back_to_default_lead_time() {
    let tasks = vec![resolved(0, "Roofing", d(2024, 7, 1), d(2024, 7, 21))];
    let requirements = vec![MaterialRequirement::new("Membrane", 100.0, "rolls", ["Roof"])];

    let windows = compute_windows(&tasks, &requirements, &VendorDirectory::new());
    let membrane = &windows["Membrane"];
    assert_eq!(membrane.lead_time_days, DEFAULT_LEAD_TIME_DAYS);
    assert_eq!(membrane.delivery_start, Some(d(2024, 6, 1)));
    // exactly 100 is not above the threshold
    assert_eq!(membrane.delivery_method, DeliveryMethod::Single);
}

#[test]
fn delivery_start_precedes_delivery_end() {
    let catalog = TaskCatalog::data_center().unwrap();
    let tasks = resolve(&catalog, d(2024, 1, 1)).unwrap();
    let windows = compute_windows(&tasks, &data_center_requirements(), &VendorDirectory::sample());

    assert_eq!(windows.len(), 4);
    for window in windows.values() {
        let (start, end) = (window.delivery_start.unwrap(), window.delivery_end.unwrap());
        assert!(start < end, "{} window is inverted", window.material_name);
    }
}

#[test]
fn later_duplicate_requirement_wins() {
    let tasks = vec![resolved(0, "Glazing", d(2024, 9, 1), d(2024, 9, 11))];
    let requirements = vec![
        MaterialRequirement::new("Glass Panels", 500.0, "m2", ["Glazing"]),
        MaterialRequirement::new("Glass Panels", 20.0, "m2", ["Glazing"]),
    ];
    let directory = VendorDirectory::new();

    let windows = compute_windows(&tasks, &requirements, &directory);
    assert_eq!(windows.len(), 1);
    assert_eq!(windows["Glass Panels"].delivery_method, DeliveryMethod::Single);

    let plan = ProcurementPlan::build(&tasks, &requirements, &directory);
    assert_eq!(plan.strategies.len(), 1);
    assert_eq!(
        plan.window("Glass Panels").unwrap().delivery_method,
        DeliveryMethod::Single
    );
}

#[test]
fn data_center_plan_uses_sample_vendors() {
    let catalog = TaskCatalog::data_center().unwrap();
    let tasks = resolve(&catalog, d(2024, 1, 1)).unwrap();
    let plan = ProcurementPlan::build(&tasks, &data_center_requirements(), &VendorDirectory::sample());

    assert!(plan.is_complete());
    plan.require_complete().unwrap();

    let steel = plan.window("Steel Reinforcement Bars").unwrap();
    assert_eq!(steel.delivery_start, Some(d(2024, 4, 4)));
    assert_eq!(steel.delivery_end, Some(d(2024, 6, 4)));
    assert_eq!(steel.delivery_method, DeliveryMethod::Phased);

    // only "Superstructure" matches a template task
    let concrete = plan.window("Concrete Mix").unwrap();
    assert_eq!(concrete.delivery_start, Some(d(2024, 6, 28)));
    assert_eq!(concrete.delivery_end, Some(d(2024, 7, 5)));

    let cables = plan.window("Electrical Cables").unwrap();
    assert_eq!(cables.delivery_start, Some(d(2024, 7, 20)));
    assert_eq!(cables.delivery_end, Some(d(2024, 9, 20)));
    assert_eq!(cables.delivery_method, DeliveryMethod::Single);

    let hvac = plan.window("HVAC Equipment").unwrap();
    assert_eq!(hvac.delivery_start, Some(d(2024, 7, 6)));
    assert_eq!(hvac.delivery_end, Some(d(2024, 8, 10)));

    let steel_strategy = &plan.strategies[0];
    assert_eq!(
        steel_strategy.primary_vendor.as_ref().unwrap().name,
        "Mumbai Steel Works Pvt Ltd"
    );
    assert_eq!(steel_strategy.backup_vendors.len(), 2);
    assert_eq!(
        steel_strategy.procurement_method,
        ProcurementMethod::CompetitiveBidding
    );
    assert_eq!(steel_strategy.inventory_strategy, InventoryStrategy::SafetyStock);

    let cable_strategy = &plan.strategies[2];
    assert_eq!(
        cable_strategy.procurement_method,
        ProcurementMethod::DirectProcurement
    );
    assert_eq!(cable_strategy.inventory_strategy, InventoryStrategy::JustInTime);
}

#[test]
fn unschedulable_material_is_reported_not_dated() {
    let tasks = vec![resolved(0, "Excavation", d(2024, 3, 1), d(2024, 3, 10))];
    let requirements = vec![
        MaterialRequirement::new("Rebar", 10.0, "tons", ["Excavation"]),
        MaterialRequirement::new("Glass Panels", 40.0, "m2", ["Curtain Wall"]),
    ];
    let directory = VendorDirectory::new()
        .with_vendor("Glass Panels", Vendor::new("Pune Glass", "Pune", 4.1).with_lead_time(12));

    let plan = ProcurementPlan::build(&tasks, &requirements, &directory);

    assert!(!plan.is_complete());
    assert_eq!(plan.unschedulable.len(), 1);
    assert_eq!(plan.unschedulable[0].material_name, "Glass Panels");
    assert_eq!(
        plan.unschedulable[0].required_for_task_names,
        vec!["Curtain Wall".to_string()]
    );
    assert_eq!(plan.unschedulable[0].reason, UnschedulableReason::NoMatchingTask);
    let glass = plan.window("Glass Panels").unwrap();
    assert_eq!(glass.lead_time_days, 12);
    assert!(glass.delivery_start.is_none());

    let err = plan.require_complete().unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::UnschedulableMaterial {
            ref material,
            reason: UnschedulableReason::NoMatchingTask,
        } if material == "Glass Panels"
    ));
}

#[test]
fn lead_time_before_calendar_start_is_not_reported_as_unmatched() {
    let start = NaiveDate::MIN;
    let end = start.checked_add_days(Days::new(19)).unwrap();
    let tasks = vec![resolved(0, "Foundation Work", start, end)];
    let requirements = vec![MaterialRequirement::new(
        "Steel",
        50.0,
        "tons",
        ["Foundation"],
    )];
    let directory = VendorDirectory::new()
        .with_vendor("Steel", Vendor::new("Mumbai Steel", "Mumbai", 4.5).with_lead_time(14));

    let plan = ProcurementPlan::build(&tasks, &requirements, &directory);

    let steel = plan.window("Steel").unwrap();
    assert_eq!(steel.matched_task_ids, vec![0]);
    assert!(steel.delivery_start.is_none());
    assert_eq!(
        steel.unschedulable_reason(),
        Some(UnschedulableReason::LeadTimeOutOfRange)
    );
    assert_eq!(
        plan.unschedulable[0].reason,
        UnschedulableReason::LeadTimeOutOfRange
    );

    assert_eq!(plan.timeline.len(), 1);
    assert_eq!(plan.timeline[0].task_start_date, start);
    assert!(plan.timeline[0].procurement_start_date.is_none());

    let err = plan.require_complete().unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::UnschedulableMaterial {
            reason: UnschedulableReason::LeadTimeOutOfRange,
            ..
        }
    ));
    assert!(err.to_string().contains("lead time reaches before"));
}

#[test]
fn data_center_timeline_lists_each_matched_task() {
    let catalog = TaskCatalog::data_center().unwrap();
    let tasks = resolve(&catalog, d(2024, 1, 1)).unwrap();
    let plan = ProcurementPlan::build(&tasks, &data_center_requirements(), &VendorDirectory::sample());

    let rows: Vec<(&str, u32, &str, NaiveDate, Option<NaiveDate>)> = plan
        .timeline
        .iter()
        .map(|e| {
            (
                e.material_name.as_str(),
                e.task_id,
                e.required_for_task.as_str(),
                e.task_start_date,
                e.procurement_start_date,
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            (
                "Steel Reinforcement Bars",
                12,
                "Excavation & Foundation",
                d(2024, 4, 18),
                Some(d(2024, 4, 4))
            ),
            (
                "Steel Reinforcement Bars",
                14,
                "Steel Structure Assembly",
                d(2024, 6, 4),
                Some(d(2024, 5, 21))
            ),
            (
                "Concrete Mix",
                15,
                "Concrete Work - Superstructure",
                d(2024, 7, 5),
                Some(d(2024, 6, 28))
            ),
            (
                "Electrical Cables",
                19,
                "Electrical Infrastructure",
                d(2024, 8, 10),
                Some(d(2024, 7, 20))
            ),
            (
                "Electrical Cables",
                22,
                "Power Distribution & UPS",
                d(2024, 9, 20),
                Some(d(2024, 8, 30))
            ),
            (
                "HVAC Equipment",
                20,
                "HVAC System Installation",
                d(2024, 8, 10),
                Some(d(2024, 7, 6))
            ),
        ]
    );
    assert!(plan.timeline.iter().all(|e| {
        e.procurement_start_date
            == e.task_start_date.checked_sub_days(Days::new(u64::from(e.lead_time_days)))
    }));
}

#[test]
fn timeline_binds_matched_tasks_by_id() {
    let tasks = vec![
        resolved(7, "Slab Pour", d(2024, 5, 1), d(2024, 5, 5)),
        resolved(3, "Slab Formwork", d(2024, 4, 1), d(2024, 4, 10)),
    ];
    let requirements = vec![MaterialRequirement::new("Concrete", 80.0, "m3", ["Pour"])];
    let windows = compute_windows(&tasks, &requirements, &quotes(&[("Concrete", 5)]));
    let window = &windows["Concrete"];
    assert_eq!(window.matched_task_ids, vec![7]);

    // lookup must not depend on slice position
    let reordered = vec![tasks[1].clone(), tasks[0].clone()];
    let entries = timeline_entries(&reordered, window);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].task_id, 7);
    assert_eq!(entries[0].required_for_task, "Slab Pour");
    assert_eq!(entries[0].procurement_start_date, Some(d(2024, 4, 26)));
}

#[test]
fn backup_vendors_keep_directory_order() {
    let tasks = vec![resolved(0, "Framing", d(2024, 2, 1), d(2024, 2, 20))];
    let requirements = vec![MaterialRequirement::new("Timber", 20.0, "m3", ["Framing"])];
    let directory = VendorDirectory::new()
        .with_vendor("Timber", Vendor::new("High", "Pune", 4.8).with_lead_time(10))
        .with_vendor("Timber", Vendor::new("Low", "Nagpur", 3.0).with_lead_time(10))
        .with_vendor("Timber", Vendor::new("Mid", "Nashik", 4.0).with_lead_time(10));

    let plan = ProcurementPlan::build(&tasks, &requirements, &directory);
    let strategy = &plan.strategies[0];

    assert_eq!(strategy.primary_vendor.as_ref().unwrap().name, "High");
    let backups: Vec<&str> = strategy
        .backup_vendors
        .iter()
        .map(|v| v.name.as_str())
        .collect();
    assert_eq!(backups, vec!["Low", "Mid"]);
    assert_eq!(
        strategy.procurement_method,
        ProcurementMethod::CompetitiveBidding
    );
}

#[test]
fn budget_applies_overhead_rates() {
    let plan = ProcurementPlan::build(&[], &data_center_requirements(), &VendorDirectory::sample());
    let budget = &plan.budget;

    assert_eq!(budget.total_material_cost, 16_640_000.0);
    assert!((budget.logistics - 832_000.0).abs() < 1e-6);
    assert!((budget.insurance - 332_800.0).abs() < 1e-6);
    assert!((budget.contingency - 1_664_000.0).abs() < 1e-6);
    assert!((budget.total_procurement_cost - 19_468_800.0).abs() < 1e-6);
    assert_eq!(budget.currency, "INR");

    let share: f64 = budget.lines.iter().map(|l| l.percentage).sum();
    assert!((share - 100.0).abs() < 0.05, "shares sum to {share}");
    assert_eq!(plan.unschedulable.len(), 4);
}
