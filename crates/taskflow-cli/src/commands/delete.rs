use anyhow::{anyhow, Result};
use dialoguer::Confirm;
use taskflow_core::repository::Repository;

use crate::cli::DeleteCommand;
use crate::util::resolve_task_id;

pub async fn delete_task(repo: &impl Repository, command: DeleteCommand) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(&task_id)
        .await?
        .ok_or_else(|| anyhow!("Task with ID '{}' not found.", task_id))?;

    if !command.force {
        let prompt = if task.is_template() {
            let instances = repo.find_instances(&task.id).await?.len();
            format!(
                "Delete template '{}' and its {} generated instance(s)?",
                task.subject, instances
            )
        } else {
            format!("Are you sure you want to delete task '{}'?", task.subject)
        };

        let confirmation = Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .unwrap_or(false);

        if !confirmation {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    let summary = repo.delete_task(&task_id).await?;
    if summary.cascaded.is_empty() {
        println!("Task '{}' deleted.", summary.deleted.subject);
    } else {
        println!(
            "Template '{}' deleted along with {} instance(s).",
            summary.deleted.subject,
            summary.cascaded.len()
        );
    }
    Ok(())
}
