/// CLI integration tests for taskflow
///
/// These tests run the binary as a black box against a temporary task file,
/// with "today" pinned to 2024-01-04 (a Thursday).
use predicates::prelude::*;

mod helpers;
use helpers::{assertions, CliTestHarness};

/// Short id of the first stored template, as accepted by the CLI.
fn template_prefix(harness: &CliTestHarness) -> String {
    let templates = harness.stored_templates();
    let id = templates[0]["id"].as_str().expect("template id").to_string();
    id[..8].to_string()
}

#[test]
fn test_cli_help_and_version() {
    let harness = CliTestHarness::new();

    harness
        .command()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("recurring templates"));

    harness
        .command()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskflow"));

    harness
        .command()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_add_plain_task() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&[
            "add",
            "Call plumber",
            "--due",
            "tomorrow",
            "--time",
            "09:30",
            "--label",
            "home",
            "--details",
            "Kitchen sink",
        ])
        .stdout(assertions::task_created_successfully());

    let tasks = harness.stored_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["subject"], "Call plumber");
    assert_eq!(tasks[0]["assignee"], "tester");
    assert_eq!(tasks[0]["dueDate"], "2024-01-05");
    assert_eq!(tasks[0]["dueTime"], "09:30");
    assert_eq!(tasks[0]["status"], "assigned");
    assert_eq!(tasks[0]["isFullDay"], false);
    assert_eq!(tasks[0]["labels"], serde_json::json!(["home"]));
}

#[test]
fn test_add_rejects_bad_input() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["add", "Bad date", "--due", "not a real date"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "Bad time", "--time", "25:61"])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["add", "No days", "--weekly", ""])
        .stderr(predicate::str::contains("select at least one weekday"));

    harness
        .run_failure(&["add", "Two rules", "--weekly", "mon", "--monthly", "1"])
        .stderr(predicate::str::contains("cannot be used with"));

    harness
        .run_failure(&["add", "   "])
        .stderr(predicate::str::contains("Subject is required"));
}

#[test]
fn test_weekly_template_generates_next_monday() {
    let harness = CliTestHarness::new();

    harness
        .run_success(&["add", "Bins out", "--weekly", "mon"])
        .stdout(assertions::task_created_successfully())
        .stdout(predicate::str::contains("Generated 1 instance(s)"));

    let instances = harness.stored_instances();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["dueDate"], "2024-01-08");
    assert_eq!(instances[0]["status"], "assigned");
    assert!(instances[0].get("recurrence").is_none());
    assert!(instances[0]["id"]
        .as_str()
        .unwrap()
        .ends_with("-recur-1704672000000"));

    let templates = harness.stored_templates();
    assert_eq!(templates[0]["recurrence"]["type"], "weekly");
    assert_eq!(templates[0]["recurrence"]["weekDays"], serde_json::json!([1]));
    assert_eq!(templates[0]["templateStatus"], "active");
}

#[test]
fn test_generation_is_idempotent() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Gym", "--weekly", "mon,wed,fri"]);
    let before = harness.stored_tasks().len();

    harness
        .run_success(&["generate"])
        .stdout(predicate::str::contains("Instances created:   0"));
    harness.run_success(&["list"]);

    assert_eq!(harness.stored_tasks().len(), before);
}

#[test]
fn test_generate_with_later_today() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Review", "--weekly", "mon"]);

    harness
        .command()
        .args(["--today", "2024-01-11", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Instances created:   1"));

    let mut dates: Vec<String> = harness
        .stored_instances()
        .iter()
        .map(|t| t["dueDate"].as_str().unwrap().to_string())
        .collect();
    dates.sort();
    assert_eq!(dates, vec!["2024-01-08", "2024-01-15"]);
}

#[test]
fn test_monthly_template_short_month() {
    let harness = CliTestHarness::new();

    harness
        .command()
        .args(["--today", "2023-02-15", "add", "Month end", "--monthly", "31"])
        .assert()
        .success();

    harness
        .command()
        .args(["--today", "2023-02-15", "preview", &template_prefix(&harness), "-n", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2023-03-31"))
        .stdout(predicate::str::contains("2023-05-31"))
        .stdout(predicate::str::contains("2023-07-31"))
        .stdout(predicate::str::contains("2023-04-31").not());
}

#[test]
fn test_list_filters() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Stand-up", "--weekly", "mon,tue,wed,thu,fri"]);
    harness.run_success(&["add", "Tax return", "--due", "2024-01-02"]);

    harness
        .run_success(&["list"])
        .stdout(assertions::has_task_table_headers())
        .stdout(predicate::str::contains("Stand-up"))
        .stdout(predicate::str::contains("Tax return"));

    harness
        .run_success(&["list", "--due", "overdue"])
        .stdout(predicate::str::contains("Tax return"))
        .stdout(predicate::str::contains("Stand-up").not());

    harness
        .run_success(&["list", "--templates"])
        .stdout(predicate::str::contains("weekly on Mon, Tue, Wed, Thu, Fri"));

    harness
        .run_success(&["list", "--instances", "--due", "2024-01-08"])
        .stdout(predicate::str::contains("@2024-01-08"));

    harness
        .run_success(&["list", "--status", "closed"])
        .stdout(assertions::empty_result());

    harness
        .run_failure(&["list", "--status", "sleeping"])
        .stderr(assertions::has_error());
}

#[test]
fn test_status_changes_by_instance_reference() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Laundry", "--weekly", "mon"]);
    let prefix = template_prefix(&harness);
    let reference = format!("{prefix}@2024-01-08");

    harness
        .run_success(&["start", &reference])
        .stdout(predicate::str::contains("Started"));
    assert_eq!(harness.stored_instances()[0]["status"], "in-progress");

    harness
        .run_success(&["done", &reference])
        .stdout(predicate::str::contains("Completed"));
    assert_eq!(harness.stored_instances()[0]["status"], "closed");

    // Templates have no status of their own
    harness
        .run_failure(&["done", &prefix])
        .stderr(assertions::has_error());

    harness
        .run_failure(&["done", &format!("{prefix}@2024-01-09")])
        .stderr(predicate::str::contains("No instance"));
}

#[test]
fn test_pause_and_resume() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Water plants", "--weekly", "mon"]);
    let prefix = template_prefix(&harness);

    harness
        .run_success(&["pause", &prefix])
        .stdout(predicate::str::contains("Paused"));
    assert_eq!(harness.stored_templates()[0]["templateStatus"], "inactive");

    harness
        .command()
        .args(["--today", "2024-01-11", "generate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Instances created:   0"));
    assert_eq!(harness.stored_instances().len(), 1);

    harness
        .run_success(&["list", "--paused"])
        .stdout(predicate::str::contains("Water plants"));

    harness
        .command()
        .args(["--today", "2024-01-11", "resume", &prefix])
        .assert()
        .success()
        .stdout(predicate::str::contains("generated 1 instance(s)"));
    assert_eq!(harness.stored_instances().len(), 2);
}

#[test]
fn test_delete_template_cascades() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Every day", "--weekly", "0,1,2,3,4,5,6"]);
    harness.run_success(&["add", "Keep me"]);
    let prefix = template_prefix(&harness);
    assert_eq!(harness.stored_instances().len(), 6);

    harness
        .run_success(&["delete", &prefix, "--force"])
        .stdout(predicate::str::contains("along with 6 instance(s)"));

    let tasks = harness.stored_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["subject"], "Keep me");
}

#[test]
fn test_edit_recurrence_keeps_existing_instances() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Report", "--weekly", "mon"]);
    let prefix = template_prefix(&harness);

    harness
        .run_success(&["edit", &prefix, "--weekly", "fri", "--subject", "Weekly report"])
        .stdout(predicate::str::contains("weekly on Fri"));

    let templates = harness.stored_templates();
    assert_eq!(templates[0]["subject"], "Weekly report");
    assert_eq!(templates[0]["recurrence"]["weekDays"], serde_json::json!([5]));

    let instances = harness.stored_instances();
    assert_eq!(instances.len(), 1);
    assert_eq!(instances[0]["dueDate"], "2024-01-08");

    harness
        .run_failure(&["edit", &prefix, "--monthly", "0"])
        .stderr(assertions::has_error());
}

#[test]
fn test_show_and_stats() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Birthday", "--yearly", "01-05"]);
    harness.run_success(&["add", "Overdue thing", "--due", "2024-01-01"]);
    let prefix = template_prefix(&harness);

    harness
        .run_success(&["show", &prefix])
        .stdout(predicate::str::contains("yearly on Jan 5"))
        .stdout(predicate::str::contains("Instances"));

    harness
        .run_success(&["stats"])
        .stdout(predicate::str::contains("Overdue"))
        .stdout(predicate::str::contains("Active templates"));
}

#[test]
fn test_export_import_roundtrip() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Backup", "--monthly", "1,15"]);
    harness.run_success(&["add", "Plain task"]);
    let export_path = harness.temp_path().join("export.json");
    let export_arg = export_path.to_str().unwrap();

    harness.run_success(&["export", "--output", export_arg]);
    let exported: Vec<serde_json::Value> =
        serde_json::from_str(&std::fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(exported.len(), harness.stored_tasks().len());

    let other = CliTestHarness::new();
    other
        .run_success(&["import", export_arg, "--force"])
        .stdout(predicate::str::contains(format!("Imported {} task(s)", exported.len())));
    assert_eq!(other.stored_tasks(), harness.stored_tasks());
}

#[test]
fn test_import_rejects_invalid_file() {
    let harness = CliTestHarness::new();
    harness.run_success(&["add", "Precious"]);

    let bad_path = harness.temp_path().join("bad.json");
    std::fs::write(&bad_path, r#"{"not": "an array"}"#).unwrap();

    harness
        .run_failure(&["import", bad_path.to_str().unwrap(), "--force"])
        .stderr(predicate::str::contains("Invalid task structure"));

    let tasks = harness.stored_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["subject"], "Precious");
}

#[test]
fn test_ambiguous_and_unknown_ids() {
    let harness = CliTestHarness::new();

    harness
        .run_failure(&["show", "x"])
        .stderr(predicate::str::contains("at least 2 characters"));

    harness
        .run_failure(&["show", "zz-no-such-task"])
        .stderr(predicate::str::contains("No task found"));
}
