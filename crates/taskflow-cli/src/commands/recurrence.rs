use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use owo_colors::{OwoColorize, Style};
use taskflow_core::error::CoreError;
use taskflow_core::models::{MaterializationSummary, TemplateStatus};
use taskflow_core::recurrence::preview_occurrences;
use taskflow_core::repository::Repository;

use crate::cli::{IdCommand, PreviewCommand};
use crate::util::resolve_task_id;
use crate::views::table::humanize_date;

/// Pauses or resumes a template. Resuming generates right away.
pub async fn set_template_status(
    repo: &impl Repository,
    command: IdCommand,
    status: TemplateStatus,
    today: NaiveDate,
) -> Result<()> {
    let template_id = resolve_task_id(repo, &command.id).await?;
    let update = repo.set_template_status(&template_id, status, today).await?;

    match status {
        TemplateStatus::Inactive => println!(
            "{} template '{}'; existing instances are kept",
            "Paused".yellow(),
            update.template.subject
        ),
        TemplateStatus::Active => println!(
            "{} template '{}'; generated {} instance(s)",
            "Resumed".green(),
            update.template.subject,
            update.summary.instances_created()
        ),
    }
    Ok(())
}

pub async fn generate(repo: &impl Repository, today: NaiveDate) -> Result<()> {
    let summary = repo.materialize(today).await?;
    print_summary(&summary, today);
    Ok(())
}

fn print_summary(summary: &MaterializationSummary, today: NaiveDate) {
    let header_style = Style::new().bold();
    println!("{} (today is {})", "Generation complete".style(header_style), today);
    println!("  Templates processed: {}", summary.templates_processed);
    if summary.templates_skipped > 0 {
        println!(
            "  Templates skipped:   {} {}",
            summary.templates_skipped,
            "(rule yields no dates)".bright_black()
        );
    }
    println!("  Instances created:   {}", summary.instances_created());
}

pub async fn preview(repo: &impl Repository, command: PreviewCommand, today: NaiveDate) -> Result<()> {
    let template_id = resolve_task_id(repo, &command.id).await?;
    let template = repo
        .find_task_by_id(&template_id)
        .await?
        .ok_or_else(|| anyhow!("Task '{}' not found", template_id))?;
    let rule = template
        .recurrence
        .as_ref()
        .ok_or_else(|| anyhow!(CoreError::NotATemplate(template.subject.clone())))?;

    let dates = preview_occurrences(rule, today, command.count);
    println!("Next occurrences of '{}' ({}):", template.subject, rule);
    if dates.is_empty() {
        println!("  {}", "none".bright_black());
    }
    for date in dates {
        println!("  {}  {}", date.format("%a %Y-%m-%d"), humanize_date(date, today).bright_black());
    }
    if template.template_status() == TemplateStatus::Inactive {
        println!("{}", "Template is paused; no instances will be generated.".yellow());
    }
    Ok(())
}
