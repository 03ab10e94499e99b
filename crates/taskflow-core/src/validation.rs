//! Input checks shared by the store and the CLI.
//!
//! The generator tolerates malformed rules; these checks are what keep
//! malformed rules from being saved in the first place.

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::models::{NewTaskData, RecurrenceRule, Task};

/// Any leap year works for checking that a month/day pair can exist.
const LEAP_YEAR: i32 = 2024;

/// Validates a recurrence rule as entered by a user.
///
/// # Behavior
/// - Rejects empty selector sets ("select at least one weekday")
/// - Rejects selectors outside their ranges
/// - Rejects yearly dates that exist in no year (Feb 30, Apr 31)
/// - Rejects rule types this build cannot expand
pub fn validate_rule(rule: &RecurrenceRule) -> Result<(), CoreError> {
    match rule {
        RecurrenceRule::Weekly { week_days } => {
            if week_days.is_empty() {
                return Err(CoreError::InvalidRecurrence("select at least one weekday".to_string()));
            }
            if let Some(day) = week_days.iter().find(|d| **d > 6) {
                return Err(CoreError::InvalidRecurrence(format!(
                    "weekday {day} is out of range (0 = Sunday .. 6 = Saturday)"
                )));
            }
        }
        RecurrenceRule::Monthly { month_days } => {
            if month_days.is_empty() {
                return Err(CoreError::InvalidRecurrence("select at least one day of the month".to_string()));
            }
            if let Some(day) = month_days.iter().find(|d| !(1..=31).contains(*d)) {
                return Err(CoreError::InvalidRecurrence(format!(
                    "day of month {day} is out of range (1 .. 31)"
                )));
            }
        }
        RecurrenceRule::Yearly { year_dates } => {
            if year_dates.is_empty() {
                return Err(CoreError::InvalidRecurrence("select at least one date of the year".to_string()));
            }
            for date in year_dates {
                let exists = date.month <= 11
                    && NaiveDate::from_ymd_opt(LEAP_YEAR, u32::from(date.month) + 1, u32::from(date.day)).is_some();
                if !exists {
                    return Err(CoreError::InvalidRecurrence(format!(
                        "month {} day {} is not a calendar date",
                        u32::from(date.month) + 1,
                        date.day
                    )));
                }
            }
        }
        RecurrenceRule::Unsupported => {
            return Err(CoreError::InvalidRecurrence("unsupported recurrence type".to_string()));
        }
    }

    Ok(())
}

pub fn validate_new_task(data: &NewTaskData) -> Result<(), CoreError> {
    if data.subject.trim().is_empty() {
        return Err(CoreError::InvalidInput("Subject is required.".to_string()));
    }
    if data.assignee.trim().is_empty() {
        return Err(CoreError::InvalidInput("Assignee is required.".to_string()));
    }
    if let Some(rule) = &data.recurrence {
        validate_rule(rule)?;
    }
    Ok(())
}

/// Checks a task read from an import file.
///
/// Only structural requirements are enforced; rules are left for the
/// generator to skip, matching how stored data is treated.
pub fn validate_imported_task(task: &Task) -> Result<(), CoreError> {
    if task.id.trim().is_empty() {
        return Err(CoreError::InvalidImport("task without an id".to_string()));
    }
    if task.subject.trim().is_empty() {
        return Err(CoreError::InvalidImport(format!("task '{}' has no subject", task.id)));
    }
    if task.recurrence.is_some() && task.recurrence_template_id.is_some() {
        return Err(CoreError::InvalidImport(format!(
            "task '{}' is both a template and an instance",
            task.id
        )));
    }
    Ok(())
}
