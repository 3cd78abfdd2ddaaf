#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("CONSTRUCTION_SCHEDULE_VENDORS");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_shows_template_calendar() {
    run_cli("show\nquit\n")
        .success()
        .stdout(str_contains("Documentation & Handover"))
        .stdout(str_contains("2024-12-12"));
}

#[test]
fn cli_lists_milestones() {
    run_cli("milestones\nexit\n")
        .success()
        .stdout(str_contains("Project Completion"))
        .stdout(str_contains("Design Completion"));
}

#[test]
fn cli_start_command_recomputes() {
    run_cli("start 2024-02-01\nquit\n")
        .success()
        .stdout(str_contains("Project start set to 2024-02-01."))
        .stdout(str_contains("2025-01-12"));
}

#[test]
fn cli_rejects_bad_dates() {
    run_cli("start 2024-13-01\nquit\n")
        .success()
        .stdout(str_contains("Invalid date (YYYY-MM-DD)"));
}

#[test]
fn cli_lists_vendors_with_spaces_in_material() {
    run_cli("vendors HVAC Equipment\nquit\n")
        .success()
        .stdout(str_contains("Cool Air Systems Maharashtra"));
}

#[test]
fn cli_procurement_shows_budget() {
    run_cli("procurement\nquit\n")
        .success()
        .stdout(str_contains("Steel Reinforcement Bars"))
        .stdout(str_contains("Total procurement cost: 19468800.00 INR"));
}

#[test]
fn cli_exports_procurement_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    run_cli(&format!("export procurement csv {path}\nquit\n"))
        .success()
        .stdout(str_contains("Procurement exported to"));

    let raw = std::fs::read_to_string(tmp.path()).unwrap();
    assert!(raw.contains("HVAC Equipment,2024-07-06,2024-08-10,35,single"));
}

#[test]
fn cli_exports_schedule_json() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    run_cli(&format!("export schedule json {path}\nquit\n"))
        .success()
        .stdout(str_contains("Schedule exported to"));

    let export = construction_schedule::load_schedule_from_json(tmp.path()).unwrap();
    assert_eq!(export.tasks.len(), 30);
}

#[test]
fn cli_reports_unknown_export_format() {
    run_cli("export schedule xml out.xml\nquit\n")
        .success()
        .stdout(str_contains("Export error: unknown format 'xml'"));
}

#[test]
fn cli_procurement_lists_order_timeline() {
    run_cli("procurement\nquit\n")
        .success()
        .stdout(str_contains("Order timeline:"))
        .stdout(str_contains(
            "Excavation & Foundation (id 12) starts 2024-04-18, order by 2024-04-04",
        ))
        .stdout(str_contains(
            "HVAC System Installation (id 20) starts 2024-08-10, order by 2024-07-06",
        ));
}

#[test]
fn cli_exports_timeline_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    run_cli(&format!("export timeline csv {path}\nquit\n"))
        .success()
        .stdout(str_contains("Timeline exported to"));

    let entries = construction_schedule::load_timeline_from_csv(tmp.path()).unwrap();
    assert_eq!(entries.len(), 6);
    assert_eq!(entries[1].required_for_task, "Steel Structure Assembly");
}
