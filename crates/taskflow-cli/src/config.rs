use chrono_tz::Tz;
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::path::PathBuf;
use taskflow_core::models::GenerationPolicy;

use crate::timezone::{detect_system_timezone, validate_timezone};

#[derive(Deserialize, Debug, Default)]
pub struct Config {
    /// Location of the JSON task file
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Assignee used by `add` when none is given
    #[serde(default)]
    pub default_assignee: Option<String>,
    /// IANA timezone that decides what "today" is
    #[serde(default)]
    pub default_timezone: Option<String>,
    #[serde(default)]
    pub recurrence: RecurrenceConfig,
}

/// Configuration for instance generation
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RecurrenceConfig {
    /// Days past a template's next occurrence to keep materialized
    pub lookahead_days: u32,
    /// Hard cap on occurrence steps per template and run
    pub max_steps: usize,
}

impl Default for RecurrenceConfig {
    fn default() -> Self {
        let policy = GenerationPolicy::default();
        Self {
            lookahead_days: policy.lookahead_days,
            max_steps: policy.max_steps,
        }
    }
}

impl Config {
    /// Loads `config.toml` from the user config dir and the working
    /// directory, then `TASKFLOW_*` environment variables. Nested keys use
    /// a double underscore: `TASKFLOW_RECURRENCE__LOOKAHEAD_DAYS=7`.
    pub fn new() -> Result<Self, figment::Error> {
        let mut figment = Figment::new();
        if let Some(dir) = dirs::config_dir() {
            figment = figment.merge(Toml::file(dir.join("taskflow").join("config.toml")));
        }

        Self::from_figment(
            figment
                .merge(Toml::file("config.toml"))
                .merge(Env::prefixed("TASKFLOW_").split("__")),
        )
    }

    pub fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.extract()
    }

    pub fn data_file(&self) -> PathBuf {
        self.data_file.clone().unwrap_or_else(default_data_file)
    }

    pub fn generation_policy(&self) -> GenerationPolicy {
        GenerationPolicy {
            lookahead_days: self.recurrence.lookahead_days,
            max_steps: self.recurrence.max_steps,
        }
    }

    /// The configured timezone, or the system one when unset.
    pub fn timezone(&self) -> anyhow::Result<Tz> {
        match &self.default_timezone {
            Some(name) => validate_timezone(name),
            None => validate_timezone(&detect_system_timezone()),
        }
    }

    pub fn default_assignee(&self) -> Option<&str> {
        self.default_assignee
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
    }
}

fn default_data_file() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskflow")
        .join("tasks.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_figment(Figment::new()).unwrap();

        assert_eq!(config.generation_policy(), GenerationPolicy::default());
        assert_eq!(config.generation_policy().lookahead_days, 5);
        assert_eq!(config.generation_policy().max_steps, 10);
        assert!(config.data_file().ends_with("taskflow/tasks.json"));
        assert!(config.default_assignee().is_none());
    }

    #[test]
    fn test_toml_values() {
        let toml = r#"
            data_file = "/tmp/tasks.json"
            default_assignee = "sam"
            default_timezone = "Europe/Berlin"

            [recurrence]
            lookahead_days = 14
        "#;
        let config = Config::from_figment(Figment::from(Toml::string(toml))).unwrap();

        assert_eq!(config.data_file(), PathBuf::from("/tmp/tasks.json"));
        assert_eq!(config.default_assignee(), Some("sam"));
        assert_eq!(config.timezone().unwrap(), chrono_tz::Europe::Berlin);
        assert_eq!(config.recurrence.lookahead_days, 14);
        assert_eq!(config.recurrence.max_steps, 10);
    }

    #[test]
    fn test_invalid_timezone() {
        let config = Config {
            default_timezone: Some("Mars/Olympus".to_string()),
            ..Default::default()
        };
        assert!(config.timezone().is_err());
    }
}
