#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The fixed "today" used by every harness command: Thursday 2024-01-04.
pub const TODAY: &str = "2024-01-04";

/// Test harness for running CLI commands against a temporary task file
pub struct CliTestHarness {
    temp_dir: TempDir,
    data_file: PathBuf,
}

impl CliTestHarness {
    /// Create a new test harness with an empty task file location
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
        let data_file = temp_dir.path().join("tasks.json");

        Self { temp_dir, data_file }
    }

    /// Get a Command instance configured for testing
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("taskflow").expect("Failed to find taskflow binary");

        cmd.current_dir(self.temp_dir.path())
            .env("TASKFLOW_DATA_FILE", &self.data_file)
            .env("TASKFLOW_DEFAULT_ASSIGNEE", "tester")
            .env("TASKFLOW_DEFAULT_TIMEZONE", "UTC")
            .env_remove("TASKFLOW_LOG");

        cmd
    }

    /// Path of the task file for this test instance
    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn temp_path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Run a command with the harness date and assert success
    pub fn run_success(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command()
            .args(["--today", TODAY])
            .args(args)
            .assert()
            .success()
    }

    /// Run a command with the harness date and assert failure
    pub fn run_failure(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.command()
            .args(["--today", TODAY])
            .args(args)
            .assert()
            .failure()
    }

    /// Parsed contents of the task file
    pub fn stored_tasks(&self) -> Vec<serde_json::Value> {
        let raw = std::fs::read_to_string(&self.data_file).expect("task file should exist");
        serde_json::from_str(&raw).expect("task file should hold a JSON array")
    }

    pub fn stored_templates(&self) -> Vec<serde_json::Value> {
        self.stored_tasks()
            .into_iter()
            .filter(|t| t.get("recurrence").is_some())
            .collect()
    }

    pub fn stored_instances(&self) -> Vec<serde_json::Value> {
        self.stored_tasks()
            .into_iter()
            .filter(|t| t.get("recurrenceTemplateId").is_some())
            .collect()
    }
}

/// Utility functions for test assertions
pub mod assertions {
    use super::*;

    pub fn has_task_table_headers() -> impl Predicate<str> {
        predicate::str::contains("ID")
            .and(predicate::str::contains("Subject"))
            .and(predicate::str::contains("Status"))
    }

    pub fn task_created_successfully() -> impl Predicate<str> {
        predicate::str::contains("✓")
            .and(predicate::str::contains("Created"))
    }

    pub fn empty_result() -> impl Predicate<str> {
        predicate::str::contains("No tasks found")
    }

    pub fn has_error() -> impl Predicate<str> {
        predicate::str::contains("Error").or(predicate::str::contains("error"))
    }
}
