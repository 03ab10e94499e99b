use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use taskflow_core::models::{TaskFilter, TaskKind, TaskStatus, TemplateStatus};
use taskflow_core::repository::Repository;

use crate::cli::ListCommand;
use crate::parser::parse_due_filter;
use crate::views::table::display_tasks;

pub fn build_filter(command: &ListCommand, today: NaiveDate) -> Result<TaskFilter> {
    let status = command
        .status
        .as_deref()
        .map(|s| s.parse::<TaskStatus>())
        .transpose()
        .map_err(|e| anyhow!(e))?;
    let due = command
        .due
        .as_deref()
        .map(|d| parse_due_filter(d, today))
        .transpose()?;

    let kind = if command.templates || command.paused {
        Some(TaskKind::Template)
    } else if command.instances {
        Some(TaskKind::Instance)
    } else {
        None
    };

    Ok(TaskFilter {
        status,
        due,
        kind,
        template_status: command.paused.then_some(TemplateStatus::Inactive),
        search: command.search.clone(),
    })
}

pub async fn list_tasks(repo: &impl Repository, command: ListCommand, today: NaiveDate) -> Result<()> {
    let filter = build_filter(&command, today)?;
    let tasks = repo.list_tasks(&filter, today).await?;
    display_tasks(&tasks, today);
    Ok(())
}
