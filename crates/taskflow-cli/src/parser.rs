use anyhow::{anyhow, bail, Result};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_english::{parse_date_string, Dialect};
use taskflow_core::models::{DueDate, MonthDay, RecurrenceRule};
use taskflow_core::validation::validate_rule;

/// Parses a due date. ISO dates are taken as-is; anything else ("tomorrow",
/// "next friday") is resolved relative to `today`.
pub fn parse_due_date(date_str: &str, today: NaiveDate) -> Result<NaiveDate> {
    let date_str = date_str.trim();
    if let Ok(date) = NaiveDate::parse_from_str(date_str, "%Y-%m-%d") {
        return Ok(date);
    }

    let noon = today
        .and_hms_opt(12, 0, 0)
        .ok_or_else(|| anyhow!("Failed to parse due date '{}'", date_str))?;
    parse_date_string(date_str, Utc.from_utc_datetime(&noon), Dialect::Us)
        .map(|dt| dt.date_naive())
        .map_err(|e| anyhow!("Failed to parse due date '{}': {}", date_str, e))
}

pub fn parse_time(time_str: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(time_str.trim(), "%H:%M")
        .map_err(|_| anyhow!("Invalid time '{}', expected HH:MM", time_str))
}

/// Parses the `--due` filter of `list`: `today`, `tomorrow`, `overdue`,
/// `before:DATE`, `after:DATE` or a date.
pub fn parse_due_filter(input: &str, today: NaiveDate) -> Result<DueDate> {
    let input = input.trim();
    match input.to_lowercase().as_str() {
        "today" => return Ok(DueDate::Today),
        "tomorrow" => return Ok(DueDate::Tomorrow),
        "overdue" => return Ok(DueDate::Overdue),
        _ => {}
    }

    if let Some((op, value)) = input.split_once(':') {
        let date = parse_due_date(value, today)?;
        return match op.to_lowercase().as_str() {
            "before" => Ok(DueDate::Before(date)),
            "after" => Ok(DueDate::After(date)),
            "on" => Ok(DueDate::On(date)),
            _ => Err(anyhow!("Unknown due filter '{}'", op)),
        };
    }

    Ok(DueDate::On(parse_due_date(input, today)?))
}

fn split_list(input: &str) -> impl Iterator<Item = &str> {
    input
        .split([',', ' '])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// `mon,fri` or `1,5` (0 = Sunday).
pub fn parse_weekly(input: &str) -> Result<RecurrenceRule> {
    let mut days = Vec::new();
    for token in split_list(input) {
        let day = match token.to_lowercase().as_str() {
            "sun" | "sunday" => 0,
            "mon" | "monday" => 1,
            "tue" | "tues" | "tuesday" => 2,
            "wed" | "wednesday" => 3,
            "thu" | "thur" | "thurs" | "thursday" => 4,
            "fri" | "friday" => 5,
            "sat" | "saturday" => 6,
            other => other
                .parse::<u8>()
                .map_err(|_| anyhow!("Unknown weekday '{}'", token))?,
        };
        days.push(day);
    }
    checked(RecurrenceRule::weekly(days))
}

/// `1,15,31`.
pub fn parse_monthly(input: &str) -> Result<RecurrenceRule> {
    let days = split_list(input)
        .map(|token| {
            token
                .parse::<u8>()
                .map_err(|_| anyhow!("Invalid day of month '{}'", token))
        })
        .collect::<Result<Vec<_>>>()?;
    checked(RecurrenceRule::monthly(days))
}

/// `12-25,02-29` as month-day pairs with January = 1.
pub fn parse_yearly(input: &str) -> Result<RecurrenceRule> {
    let mut dates = Vec::new();
    for token in split_list(input) {
        let Some((month, day)) = token.split_once(['-', '/']) else {
            bail!("Invalid yearly date '{}', expected MM-DD", token);
        };
        let month: u8 = month
            .parse()
            .map_err(|_| anyhow!("Invalid month in '{}'", token))?;
        let day: u8 = day.parse().map_err(|_| anyhow!("Invalid day in '{}'", token))?;
        if month == 0 {
            bail!("Invalid month in '{}'", token);
        }
        dates.push(MonthDay::new(month - 1, day));
    }
    checked(RecurrenceRule::yearly(dates))
}

fn checked(rule: RecurrenceRule) -> Result<RecurrenceRule> {
    validate_rule(&rule)?;
    Ok(rule)
}
