use chrono::NaiveDate;
use construction_schedule::{
    DeliveryMethod, ExportError, MilestoneKind, ProcurementPlan, ProjectMetadata, Schedule,
    ScheduleExport, VendorDirectory, data_center_requirements, load_procurement_from_csv,
    load_procurement_from_json, load_schedule_from_csv, load_schedule_from_json,
    procurement_records, save_procurement_to_csv, save_procurement_to_json, save_schedule_to_csv,
    save_schedule_to_json,
};
use construction_schedule::{
    MaterialRequirement, Task, TaskRecord, TimelineEntry, load_timeline_from_csv,
    load_timeline_from_json, save_timeline_to_csv, save_timeline_to_json,
};
use tempfile::NamedTempFile;

fn d(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn data_center_export() -> ScheduleExport {
    let schedule = Schedule::data_center(ProjectMetadata::default()).unwrap();
    ScheduleExport::from_schedule(&schedule).unwrap()
}

#[test]
fn export_copies_resolved_dates_and_milestones() {
    let export = data_center_export();

    assert_eq!(export.project_name, "Data Center Construction Project");
    assert_eq!(export.tasks.len(), 30);
    assert_eq!(export.milestones.len(), 7);
    assert_eq!(export.total_duration_days, 346);

    let excavation = &export.tasks[12];
    assert_eq!(excavation.name, "Excavation & Foundation");
    assert_eq!(excavation.phase, "Foundation & Structure");
    assert_eq!(excavation.start_date, d(2024, 4, 18));
    assert_eq!(excavation.end_date, d(2024, 5, 13));
    assert_eq!(excavation.dependency_ids, vec![6, 11]);

    let completion = export.milestones.last().unwrap();
    assert_eq!(completion.kind, MilestoneKind::End);
    assert_eq!(completion.date, d(2024, 12, 12));
}

#[test]
fn json_uses_iso_dates() {
    let export = data_center_export();
    let value = serde_json::to_value(&export).unwrap();
    assert_eq!(value["tasks"][0]["start_date"], "2024-01-01");
    assert_eq!(value["tasks"][0]["end_date"], "2024-01-11");
    assert_eq!(value["milestones"][0]["kind"], "start");
}

#[test]
fn schedule_json_round_trip() {
    let export = data_center_export();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_json(&export, file.path()).unwrap();
    let loaded = load_schedule_from_json(file.path()).unwrap();

    assert_eq!(loaded, export);
}

#[test]
fn schedule_csv_round_trip_keeps_milestones() {
    let export = data_center_export();
    let file = NamedTempFile::new().unwrap();

    save_schedule_to_csv(&export, file.path()).unwrap();
    let raw = std::fs::read_to_string(file.path()).unwrap();
    assert!(raw.starts_with("id,name,phase,start_date,end_date,duration_days,dependency_ids"));
    assert!(raw.contains("\"6,11\""));

    let loaded = load_schedule_from_csv(file.path()).unwrap();
    assert_eq!(loaded, export);
}

#[test]
fn csv_without_metadata_row_is_rejected() {
    let file = NamedTempFile::new().unwrap();
    std::fs::write(
        file.path(),
        "id,name,phase,start_date,end_date,duration_days,dependency_ids,metadata_json\n\
         0,Survey,Design,2024-01-01,2024-01-04,3,,\n",
    )
    .unwrap();

    let err = load_schedule_from_csv(file.path()).unwrap_err();
    assert!(matches!(err, ExportError::InvalidData(_)));
}

#[test]
fn unresolved_task_cannot_be_exported() {
    let task = Task::new(0, "Survey", "Design", 3);
    let err = TaskRecord::from_task(&task).unwrap_err();
    assert!(matches!(err, ExportError::InvalidData(_)));
}

fn procurement_with_gap() -> Vec<construction_schedule::ProcurementRecord> {
    let schedule = Schedule::data_center(ProjectMetadata::default()).unwrap();
    let mut requirements = data_center_requirements();
    requirements.push(MaterialRequirement::new(
        "Glass Panels",
        40.0,
        "m2",
        ["Curtain Wall"],
    ));
    let plan: ProcurementPlan = schedule.procurement_plan(&requirements, &VendorDirectory::sample());
    procurement_records(plan.windows())
}

#[test]
fn procurement_json_round_trip_keeps_null_dates() {
    let records = procurement_with_gap();
    let file = NamedTempFile::new().unwrap();

    save_procurement_to_json(&records, file.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    let glass = value
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["material_name"] == "Glass Panels")
        .unwrap();
    assert!(glass["delivery_start"].is_null());
    assert!(glass["delivery_end"].is_null());
    assert_eq!(glass["delivery_method"], "single");

    let loaded = load_procurement_from_json(file.path()).unwrap();
    assert_eq!(loaded, records);
}

#[test]
fn procurement_csv_round_trip_keeps_empty_dates() {
    let records = procurement_with_gap();
    let file = NamedTempFile::new().unwrap();

    save_procurement_to_csv(&records, file.path()).unwrap();
    let raw = std::fs::read_to_string(file.path()).unwrap();
    assert!(raw.starts_with("material_name,delivery_start,delivery_end,lead_time_days,delivery_method"));
    assert!(raw.contains("Glass Panels,,,30,single"));
    assert!(raw.contains("Steel Reinforcement Bars,2024-04-04,2024-06-04,14,phased"));

    let loaded = load_procurement_from_csv(file.path()).unwrap();
    assert_eq!(loaded, records);
    let steel = loaded
        .iter()
        .find(|r| r.material_name == "Steel Reinforcement Bars")
        .unwrap();
    assert_eq!(steel.delivery_method, DeliveryMethod::Phased);
}

fn data_center_timeline() -> Vec<TimelineEntry> {
    let schedule = Schedule::data_center(ProjectMetadata::default()).unwrap();
    schedule
        .procurement_plan(&data_center_requirements(), &VendorDirectory::sample())
        .timeline
}

#[test]
fn timeline_csv_round_trip() {
    let mut entries = data_center_timeline();
    entries.push(TimelineEntry {
        material_name: "Anchor Bolts".to_string(),
        task_id: 0,
        required_for_task: "Project Charter & Feasibility".to_string(),
        task_start_date: d(2024, 1, 1),
        procurement_start_date: None,
        lead_time_days: 30,
    });
    let file = NamedTempFile::new().unwrap();

    save_timeline_to_csv(&entries, file.path()).unwrap();
    let raw = std::fs::read_to_string(file.path()).unwrap();
    assert!(raw.starts_with(
        "material_name,task_id,required_for_task,task_start_date,procurement_start_date,lead_time_days"
    ));
    assert!(raw.contains("Steel Reinforcement Bars,12,Excavation & Foundation,2024-04-18,2024-04-04,14"));
    assert!(raw.contains("Electrical Cables,22,Power Distribution & UPS,2024-09-20,2024-08-30,21"));

    let loaded = load_timeline_from_csv(file.path()).unwrap();
    assert_eq!(loaded, entries);
    assert!(loaded.last().unwrap().procurement_start_date.is_none());
}

#[test]
fn timeline_json_round_trip() {
    let entries = data_center_timeline();
    assert_eq!(entries.len(), 6);
    let file = NamedTempFile::new().unwrap();

    save_timeline_to_json(&entries, file.path()).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
    assert_eq!(value[2]["required_for_task"], "Concrete Work - Superstructure");
    assert_eq!(value[2]["procurement_start_date"], "2024-06-28");

    assert_eq!(load_timeline_from_json(file.path()).unwrap(), entries);
}
