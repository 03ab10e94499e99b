use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use crate::error::CoreError;
use crate::models::Task;

/// Reads the task collection from `path`. A missing file is an empty collection.
pub async fn load_tasks(path: &Path) -> Result<Vec<Task>, CoreError> {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no task file yet, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(e.into()),
    };

    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    let tasks: Vec<Task> = serde_json::from_str(&raw)?;
    debug!(path = %path.display(), count = tasks.len(), "loaded tasks");
    Ok(tasks)
}

/// Writes the task collection to `path` as a pretty JSON array.
///
/// Writes a sibling temp file first and renames it over the target, so a
/// crash never leaves a half-written collection behind.
pub async fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(tasks)?;
    let tmp = temp_path(path);
    fs::write(&tmp, json).await?;
    fs::rename(&tmp, path).await?;

    debug!(path = %path.display(), count = tasks.len(), "saved tasks");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RecurrenceRule, TaskStatus};
    use chrono::NaiveDate;

    fn sample() -> Task {
        Task {
            id: "t1".to_string(),
            subject: "Take out bins".to_string(),
            details: None,
            assignee: "alex".to_string(),
            due_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            due_time: None,
            reminder_time: None,
            status: TaskStatus::Assigned,
            labels: vec![],
            is_full_day: true,
            url: None,
            attachments: vec![],
            recurrence: Some(RecurrenceRule::weekly([1])),
            template_status: None,
            recurrence_template_id: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let tasks = load_tasks(&dir.path().join("absent.json")).await.unwrap();
        assert!(tasks.is_empty());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tasks.json");

        save_tasks(&path, &[sample()]).await.unwrap();
        assert!(!temp_path(&path).exists());

        let loaded = load_tasks(&path).await.unwrap();
        assert_eq!(loaded, vec![sample()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        assert!(matches!(load_tasks(&path).await, Err(CoreError::Serialization(_))));
    }
}
