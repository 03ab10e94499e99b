use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use taskflow_core::repository::Repository;

use crate::cli::IdCommand;
use crate::util::resolve_task_id;
use crate::views::table::display_task;

pub async fn show_task(repo: &impl Repository, command: IdCommand, today: NaiveDate) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(&task_id)
        .await?
        .ok_or_else(|| anyhow!("Task '{}' not found", task_id))?;

    let instances = if task.is_template() {
        repo.find_instances(&task.id).await?
    } else {
        Vec::new()
    };

    display_task(&task, &instances, today);
    Ok(())
}
