use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use owo_colors::{OwoColorize, Style};
use taskflow_core::models::{NewTaskData, RecurrenceRule};
use taskflow_core::repository::Repository;

use crate::cli::{AddCommand, RecurrenceArgs};
use crate::config::Config;
use crate::parser::{parse_due_date, parse_monthly, parse_time, parse_weekly, parse_yearly};
use crate::util::display_id;

pub async fn add_task(repo: &impl Repository, command: AddCommand, config: &Config, today: NaiveDate) -> Result<()> {
    let due_date = command
        .due
        .as_deref()
        .map(|d| parse_due_date(d, today))
        .transpose()?
        .unwrap_or(today);
    let due_time = command.time.as_deref().map(parse_time).transpose()?;
    let reminder_time = command.reminder.as_deref().map(parse_time).transpose()?;
    let recurrence = parse_recurrence(&command.recurrence)?;

    let assignee = match command.assignee {
        Some(assignee) => assignee,
        None => config
            .default_assignee()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Assignee is required. Pass --assignee or set default_assignee"))?,
    };

    let data = NewTaskData {
        subject: command.subject,
        details: command.details,
        assignee,
        due_date,
        is_full_day: due_time.is_none(),
        due_time,
        reminder_time,
        labels: command.labels,
        url: command.url,
        recurrence,
    };

    let success_style = Style::new().green().bold();
    let info_style = Style::new().blue();

    if data.recurrence.is_some() {
        let update = repo.add_template(data, today).await?;
        let template = &update.template;
        println!(
            "{} Created recurring template: {}",
            "✓".style(success_style),
            template.subject.bright_white().bold()
        );
        println!("  {} Template ID: {}", "→".style(info_style), display_id(template).yellow());
        if let Some(rule) = &template.recurrence {
            println!("  {} Repeats {}", "→".style(info_style), rule);
        }
        println!(
            "  {} Generated {} instance(s)",
            "→".style(info_style),
            update.summary.instances_created()
        );
    } else {
        let task = repo.add_task(data).await?;
        println!(
            "{} Created task: {}",
            "✓".style(success_style),
            task.subject.bright_white().bold()
        );
        println!("  {} Task ID: {}", "→".style(info_style), display_id(&task).yellow());
        println!("  {} Due {}", "→".style(info_style), task.due_date);
    }

    Ok(())
}

pub fn parse_recurrence(args: &RecurrenceArgs) -> Result<Option<RecurrenceRule>> {
    if let Some(days) = &args.weekly {
        return Ok(Some(parse_weekly(days)?));
    }
    if let Some(days) = &args.monthly {
        return Ok(Some(parse_monthly(days)?));
    }
    if let Some(dates) = &args.yearly {
        return Ok(Some(parse_yearly(dates)?));
    }
    Ok(None)
}
