use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use taskflow_core::error::CoreError;
use taskflow_core::generator::instance_id;
use taskflow_core::models::{Task, TaskKind};
use taskflow_core::repository::Repository;

const SHORT_ID_LEN: usize = 8;

/// Resolves what the user typed into a full task id.
///
/// Accepts a full id, a unique prefix of at least two characters, or
/// `<template>@YYYY-MM-DD` for the instance a template generated on that
/// day. Instance ids start with their template id, so a prefix matching a
/// template and its instances resolves to the template.
pub async fn resolve_task_id(repo: &impl Repository, reference: &str) -> Result<String> {
    let reference = reference.trim();

    if let Some((template_ref, date)) = reference.split_once('@') {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| anyhow!(CoreError::InvalidInput(format!("Invalid date in '{}'", reference))))?;
        let template_id = resolve_prefix(repo, template_ref).await?;
        let id = instance_id(&template_id, date);
        return match repo.find_task_by_id(&id).await? {
            Some(_) => Ok(id),
            None => Err(anyhow!(CoreError::NotFound(format!(
                "No instance of '{}' due on {}",
                template_ref, date
            )))),
        };
    }

    resolve_prefix(repo, reference).await
}

async fn resolve_prefix(repo: &impl Repository, reference: &str) -> Result<String> {
    if let Some(task) = repo.find_task_by_id(reference).await? {
        return Ok(task.id);
    }

    if reference.len() < 2 {
        return Err(anyhow!(CoreError::InvalidInput(
            "Short ID must be at least 2 characters long.".to_string()
        )));
    }

    let tasks = repo.find_tasks_by_id_prefix(reference).await?;
    if tasks.len() == 1 {
        return Ok(tasks[0].id.clone());
    }
    if tasks.is_empty() {
        return Err(anyhow!(CoreError::NotFound(format!(
            "No task found with ID prefix '{}'",
            reference
        ))));
    }

    let (owners, instances): (Vec<Task>, Vec<Task>) =
        tasks.into_iter().partition(|t| t.kind() != TaskKind::Instance);
    match owners.len() {
        1 => Ok(owners[0].id.clone()),
        0 => Err(ambiguous(instances)),
        _ => Err(ambiguous(owners)),
    }
}

fn ambiguous(tasks: Vec<Task>) -> anyhow::Error {
    let task_info: Vec<(String, String)> = tasks
        .iter()
        .map(|t| (display_id(t), t.subject.clone()))
        .collect();
    anyhow!(CoreError::AmbiguousId(task_info))
}

/// Short id shown in listings: an id prefix, or `<template>@<date>` for
/// generated instances.
pub fn display_id(task: &Task) -> String {
    match &task.recurrence_template_id {
        Some(template_id) if task.id == instance_id(template_id, task.due_date) => {
            format!("{}@{}", short(template_id), task.due_date.format("%Y-%m-%d"))
        }
        _ => short(&task.id).to_string(),
    }
}

fn short(id: &str) -> &str {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}
