use chrono::{Datelike, Months, NaiveDate};

use crate::models::{MonthDay, RecurrenceRule};

/// Months scanned forward for a day-of-month selector. Any day in 1..=31
/// exists at least once in every three consecutive months.
const MONTH_SEARCH_LIMIT: u32 = 12;

/// Years scanned forward for a yearly selector. Feb 29 can be eight years
/// apart across a non-leap century year.
const YEAR_SEARCH_LIMIT: i32 = 8;

/// Computes the earliest date strictly after `after` matching `rule`.
///
/// Every selector in the rule contributes at most one candidate and the
/// minimum wins. Returns `None` for rules without usable selectors.
///
/// # Behavior
/// - Weekly: walks forward day by day from `after + 1` until the weekday matches
/// - Monthly: tries the day in `after`'s month, then the following months;
///   months where the day does not exist (day 31 in April) are skipped, never
///   rolled over into the next month
/// - Yearly: tries the date in `after`'s year, then the following years
/// - Out-of-range selectors yield no candidate
pub fn next_occurrence(rule: &RecurrenceRule, after: NaiveDate) -> Option<NaiveDate> {
    match rule {
        RecurrenceRule::Weekly { week_days } => week_days
            .iter()
            .filter_map(|&weekday| next_weekday(weekday, after))
            .min(),
        RecurrenceRule::Monthly { month_days } => month_days
            .iter()
            .filter_map(|&day| next_month_day(day, after))
            .min(),
        RecurrenceRule::Yearly { year_dates } => year_dates
            .iter()
            .filter_map(|&date| next_year_date(date, after))
            .min(),
        RecurrenceRule::Unsupported => None,
    }
}

/// Lists up to `count` consecutive occurrences after `after`.
///
/// Stops early when the rule yields nothing or fails to advance.
pub fn preview_occurrences(rule: &RecurrenceRule, after: NaiveDate, count: usize) -> Vec<NaiveDate> {
    let mut occurrences = Vec::with_capacity(count.min(64));
    let mut cursor = after;

    for _ in 0..count {
        match next_occurrence(rule, cursor) {
            Some(next) if next > cursor => {
                occurrences.push(next);
                cursor = next;
            }
            _ => break,
        }
    }

    occurrences
}

impl RecurrenceRule {
    /// See [`next_occurrence`].
    #[inline]
    pub fn next_after(&self, after: NaiveDate) -> Option<NaiveDate> {
        next_occurrence(self, after)
    }
}

fn next_weekday(weekday: u8, after: NaiveDate) -> Option<NaiveDate> {
    if weekday > 6 {
        return None;
    }

    after
        .iter_days()
        .skip(1)
        .take(7)
        .find(|candidate| candidate.weekday().num_days_from_sunday() == u32::from(weekday))
}

fn next_month_day(day: u8, after: NaiveDate) -> Option<NaiveDate> {
    if !(1..=31).contains(&day) {
        return None;
    }

    let month_start = after.with_day(1)?;

    (0..=MONTH_SEARCH_LIMIT)
        .filter_map(|offset| month_start.checked_add_months(Months::new(offset)))
        // with_day rejects days the month does not have
        .filter_map(|start| start.with_day(u32::from(day)))
        .find(|candidate| *candidate > after)
}

fn next_year_date(date: MonthDay, after: NaiveDate) -> Option<NaiveDate> {
    if date.month > 11 || !(1..=31).contains(&date.day) {
        return None;
    }

    (0..=YEAR_SEARCH_LIMIT)
        .filter_map(|offset| {
            let year = after.year().checked_add(offset)?;
            NaiveDate::from_ymd_opt(year, u32::from(date.month) + 1, u32::from(date.day))
        })
        .find(|candidate| *candidate > after)
}

/// Source of "next occurrence" answers for the instance generator.
pub trait OccurrenceCalculator {
    fn next_occurrence(&self, rule: &RecurrenceRule, after: NaiveDate) -> Option<NaiveDate>;
}

/// The Gregorian calendar implementation backed by [`next_occurrence`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarCalculator;

impl OccurrenceCalculator for CalendarCalculator {
    #[inline]
    fn next_occurrence(&self, rule: &RecurrenceRule, after: NaiveDate) -> Option<NaiveDate> {
        next_occurrence(rule, after)
    }
}
