use anyhow::{Context, Result};
use dialoguer::Confirm;
use taskflow_core::repository::Repository;
use tracing::info;

use crate::cli::{ExportCommand, ImportCommand};

pub async fn export_tasks(repo: &impl Repository, command: ExportCommand) -> Result<()> {
    let json = repo.export_tasks().await?;
    match command.output {
        Some(path) => {
            tokio::fs::write(&path, json)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), "exported tasks");
            println!("Exported tasks to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

pub async fn import_tasks(repo: &impl Repository, command: ImportCommand) -> Result<()> {
    let json = tokio::fs::read_to_string(&command.file)
        .await
        .with_context(|| format!("Failed to read {}", command.file.display()))?;

    if !command.force {
        let confirmation = Confirm::new()
            .with_prompt("Importing replaces all existing tasks. Continue?")
            .default(false)
            .interact()
            .unwrap_or(false);
        if !confirmation {
            println!("Import cancelled.");
            return Ok(());
        }
    }

    let count = repo.import_tasks(&json).await?;
    println!("Imported {count} task(s) from {}", command.file.display());
    Ok(())
}
