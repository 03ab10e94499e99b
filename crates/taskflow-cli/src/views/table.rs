use chrono::{NaiveDate, TimeZone, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};
use comfy_table::{Attribute, Cell, Color, Row, Table};
use taskflow_core::models::{Task, TaskCounts, TaskKind, TaskStatus, TemplateStatus};

use crate::util::display_id;

pub fn display_tasks(tasks: &[Task], today: NaiveDate) {
    if tasks.is_empty() {
        println!("No tasks found.");
        return;
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Subject", "Status", "Due", "Assignee", "Labels"]);

    for task in tasks {
        let mut row = Row::new();
        row.add_cell(Cell::new(display_id(task)));

        let mut display_name = String::new();
        match task.kind() {
            TaskKind::Instance => display_name.push_str("↻ "),
            TaskKind::Template => display_name.push_str("⟳ "),
            TaskKind::Plain => {}
        }
        display_name.push_str(&task.subject);
        if let Some(rule) = &task.recurrence {
            display_name.push_str(&format!(" ({rule})"));
        }

        let mut name_cell = Cell::new(display_name);
        if task.status == TaskStatus::Closed {
            name_cell = name_cell
                .add_attribute(Attribute::CrossedOut)
                .fg(Color::DarkGrey);
        } else if task.kind() == TaskKind::Template {
            name_cell = name_cell.fg(Color::Cyan);
        }
        row.add_cell(name_cell);

        row.add_cell(status_cell(task));
        row.add_cell(due_cell(task, today));
        row.add_cell(Cell::new(&task.assignee));
        row.add_cell(Cell::new(if task.labels.is_empty() {
            "-".to_string()
        } else {
            task.labels.join(", ")
        }));
        table.add_row(row);
    }

    println!("{table}");
}

fn status_cell(task: &Task) -> Cell {
    if task.is_template() {
        return match task.template_status() {
            TemplateStatus::Active => Cell::new("template").fg(Color::Cyan),
            TemplateStatus::Inactive => Cell::new("paused").fg(Color::DarkGrey),
        };
    }

    let cell = Cell::new(task.status.to_string());
    match task.status {
        TaskStatus::Closed => cell.fg(Color::Green),
        TaskStatus::InProgress => cell.fg(Color::Blue),
        TaskStatus::Assigned => cell,
    }
}

fn due_cell(task: &Task, today: NaiveDate) -> Cell {
    if task.is_template() {
        return Cell::new("-");
    }

    let mut due_text = humanize_date(task.due_date, today);
    if let Some(time) = task.due_time {
        due_text.push_str(&format!(" {}", time.format("%H:%M")));
    }

    if task.status == TaskStatus::Closed {
        Cell::new(due_text)
    } else if task.due_date < today {
        Cell::new(due_text).fg(Color::Red) // Overdue
    } else if task.due_date == today {
        Cell::new(due_text).fg(Color::Yellow) // Due today
    } else {
        Cell::new(due_text)
    }
}

/// `today`, `tomorrow`, or a date with a rough relative distance.
pub fn humanize_date(date: NaiveDate, today: NaiveDate) -> String {
    let days = (date - today).num_days();
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        _ => {
            let to_utc = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
            match (to_utc(date), to_utc(today)) {
                (Some(due), Some(now)) => {
                    let tense = if days < 0 { Tense::Past } else { Tense::Future };
                    format!(
                        "{} ({})",
                        date.format("%Y-%m-%d"),
                        HumanTime::from(due - now).to_text_en(Accuracy::Rough, tense)
                    )
                }
                _ => date.format("%Y-%m-%d").to_string(),
            }
        }
    }
}

pub fn display_task(task: &Task, instances: &[Task], today: NaiveDate) {
    let mut table = Table::new();
    let mut add = |label: &str, value: String| {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), Cell::new(value)]);
    };

    add("ID", task.id.clone());
    add("Subject", task.subject.clone());
    if let Some(details) = &task.details {
        add("Details", details.clone());
    }
    add("Assignee", task.assignee.clone());

    match &task.recurrence {
        Some(rule) => {
            add("Recurrence", rule.to_string());
            add("Template", task.template_status().to_string());
            add("Instances", instances.len().to_string());
            if let Some(latest) = instances.last() {
                add("Latest", humanize_date(latest.due_date, today));
            }
        }
        None => {
            add("Status", task.status.to_string());
            add("Due", humanize_date(task.due_date, today));
        }
    }

    if let Some(time) = task.due_time {
        add("Time", time.format("%H:%M").to_string());
    }
    if let Some(time) = task.reminder_time {
        add("Reminder", time.format("%H:%M").to_string());
    }
    if let Some(template_id) = &task.recurrence_template_id {
        add("From template", template_id.clone());
    }
    if !task.labels.is_empty() {
        add("Labels", task.labels.join(", "));
    }
    if let Some(url) = &task.url {
        add("URL", url.clone());
    }
    if !task.attachments.is_empty() {
        let names: Vec<&str> = task.attachments.iter().map(|a| a.file_name.as_str()).collect();
        add("Attachments", names.join(", "));
    }
    if let Some(created_at) = task.created_at {
        add("Created", HumanTime::from(created_at).to_string());
    }

    println!("{table}");
}

pub fn display_counts(counts: &TaskCounts, today: NaiveDate) {
    let mut table = Table::new();
    table.set_header(vec!["", "Count"]);
    table.add_row(vec![Cell::new("Tasks"), Cell::new(counts.total)]);
    table.add_row(vec![Cell::new("Pending"), Cell::new(counts.pending)]);
    table.add_row(vec![Cell::new("In progress"), Cell::new(counts.in_progress)]);
    table.add_row(vec![Cell::new("Closed"), Cell::new(counts.closed).fg(Color::Green)]);
    table.add_row(vec![Cell::new("Overdue"), Cell::new(counts.overdue).fg(Color::Red)]);
    table.add_row(vec![Cell::new("Due today"), Cell::new(counts.due_today).fg(Color::Yellow)]);
    table.add_row(vec![Cell::new("Active templates"), Cell::new(counts.active_templates)]);
    table.add_row(vec![Cell::new("Paused templates"), Cell::new(counts.inactive_templates)]);
    println!("{table}");

    let upcoming: Vec<_> = counts
        .pending_by_date
        .range(today..)
        .take(7)
        .collect();
    if !upcoming.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Upcoming", "Open"]);
        for (date, count) in upcoming {
            table.add_row(vec![Cell::new(humanize_date(*date, today)), Cell::new(count)]);
        }
        println!("{table}");
    }
}
