use anyhow::{anyhow, bail, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use taskflow_core::models::UpdateTaskData;
use taskflow_core::repository::Repository;

use crate::cli::EditCommand;
use crate::commands::add::parse_recurrence;
use crate::parser::{parse_due_date, parse_time};
use crate::util::{display_id, resolve_task_id};

pub async fn edit_task(repo: &impl Repository, command: EditCommand, today: NaiveDate) -> Result<()> {
    let task_id = resolve_task_id(repo, &command.id).await?;
    let task = repo
        .find_task_by_id(&task_id)
        .await?
        .ok_or_else(|| anyhow!("Task not found"))?;

    let rule = parse_recurrence(&command.recurrence)?;
    if rule.is_some() && !task.is_template() {
        bail!("'{}' is not a recurring template; only templates have rules", task.subject);
    }

    let details = if command.details_clear {
        Some(None)
    } else {
        command.details.map(Some)
    };

    let due_time = if command.time_clear {
        Some(None)
    } else {
        command.time.as_deref().map(parse_time).transpose()?.map(Some)
    };

    let labels = if command.add_label.is_empty() && command.remove_label.is_empty() {
        None
    } else {
        let mut labels = task.labels.clone();
        labels.retain(|l| !command.remove_label.contains(l));
        for label in command.add_label {
            if !labels.contains(&label) {
                labels.push(label);
            }
        }
        Some(labels)
    };

    let update_data = UpdateTaskData {
        subject: command.subject,
        details,
        assignee: command.assignee,
        due_date: command.due.as_deref().map(|d| parse_due_date(d, today)).transpose()?,
        due_time,
        labels,
        ..Default::default()
    };

    let mut updated = repo.update_task(&task_id, update_data).await?;

    if let Some(rule) = rule {
        // Instances already generated keep their dates
        let update = repo.update_recurrence(&task_id, rule, today).await?;
        println!(
            "Recurrence changed to {}; generated {} new instance(s)",
            update.template.recurrence.as_ref().map(ToString::to_string).unwrap_or_default(),
            update.summary.instances_created()
        );
        updated = update.template;
    }

    println!("Updated task: '{}' ({})", updated.subject, display_id(&updated).yellow());
    Ok(())
}
