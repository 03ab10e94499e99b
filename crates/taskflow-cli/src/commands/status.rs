use anyhow::Result;
use owo_colors::OwoColorize;
use taskflow_core::models::TaskStatus;
use taskflow_core::repository::Repository;

use crate::cli::IdCommand;
use crate::util::{display_id, resolve_task_id};

pub async fn set_status(repo: &impl Repository, command: IdCommand, status: TaskStatus) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo.set_task_status(&task_id, status).await?;

    let verb = match status {
        TaskStatus::Closed => "Completed",
        TaskStatus::InProgress => "Started",
        TaskStatus::Assigned => "Reopened",
    };
    println!(
        "{} task: '{}' ({})",
        verb.green(),
        task.subject,
        display_id(&task).yellow()
    );
    Ok(())
}
