use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use std::str::FromStr;

/// Validate IANA timezone name, accepting a few common abbreviations.
pub fn validate_timezone(timezone: &str) -> Result<Tz> {
    let name = normalize_timezone_input(timezone);
    Tz::from_str(name).map_err(|_| {
        let suggestions = suggest_timezone(timezone);
        if suggestions.is_empty() {
            anyhow!(
                "Unknown timezone '{}'. Use IANA timezone names like 'America/New_York'",
                timezone
            )
        } else {
            anyhow!("Unknown timezone '{}'. Did you mean: {}?", timezone, suggestions.join(", "))
        }
    })
}

/// Detect system timezone
pub fn detect_system_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        if !tz.is_empty() && Tz::from_str(&tz).is_ok() {
            return tz;
        }
    }

    if let Ok(tz) = iana_time_zone::get_timezone() {
        if Tz::from_str(&tz).is_ok() {
            return tz;
        }
    }

    "UTC".to_string()
}

/// The calendar date right now in `tz`. This is the `today` handed to the
/// generator.
pub fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn normalize_timezone_input(input: &str) -> &str {
    match input.to_lowercase().as_str() {
        "est" | "eastern" => "America/New_York",
        "cst" | "central" => "America/Chicago",
        "mst" | "mountain" => "America/Denver",
        "pst" | "pacific" => "America/Los_Angeles",
        "gmt" | "utc" => "UTC",
        "cet" => "Europe/Paris",
        "jst" => "Asia/Tokyo",
        _ => input,
    }
}

fn common_timezones() -> &'static [&'static str] {
    &[
        "UTC",
        "America/New_York",
        "America/Chicago",
        "America/Denver",
        "America/Los_Angeles",
        "America/Sao_Paulo",
        "Europe/London",
        "Europe/Paris",
        "Europe/Berlin",
        "Europe/Madrid",
        "Asia/Tokyo",
        "Asia/Shanghai",
        "Asia/Kolkata",
        "Asia/Dubai",
        "Australia/Sydney",
        "Pacific/Auckland",
    ]
}

/// Suggest similar timezones for invalid input
fn suggest_timezone(invalid: &str) -> Vec<&'static str> {
    let invalid_lower = invalid.to_lowercase();

    let mut matches: Vec<_> = common_timezones()
        .iter()
        .copied()
        .filter(|tz| {
            tz.split('/')
                .any(|part| !invalid_lower.is_empty() && part.to_lowercase().contains(&invalid_lower))
        })
        .collect();

    matches.truncate(5);
    matches
}
