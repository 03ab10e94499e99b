//! # TaskFlow Core Library
//!
//! Task tracking with recurring templates. A template carries a weekly,
//! monthly or yearly rule with any number of day selectors; the engine
//! expands active templates into dated instances for a short look-ahead
//! window without ever duplicating an instance.
//!
//! ## Core Modules
//!
//! - [`models`]: Tasks, recurrence rules and transfer objects
//! - [`recurrence`]: The next-occurrence calculator
//! - [`generator`]: Pure, idempotent instance generation
//! - [`repository`]: Task store with cascade delete, generation and import/export
//! - [`storage`]: JSON file persistence
//! - [`validation`]: Checks for user-entered rules and tasks
//! - [`error`]: Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use taskflow_core::generator::generate_instances;
//! use taskflow_core::models::{RecurrenceRule, Task, TaskStatus};
//!
//! let template: Task = serde_json::from_str(r#"{
//!     "id": "standup",
//!     "subject": "Weekly planning",
//!     "assignee": "sam",
//!     "dueDate": "2024-01-01",
//!     "status": "assigned",
//!     "recurrence": { "type": "weekly", "weekDays": [1] }
//! }"#).unwrap();
//! assert_eq!(template.recurrence, Some(RecurrenceRule::weekly([1])));
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();
//! let created = generate_instances(&[template], today);
//!
//! assert_eq!(created.len(), 1);
//! assert_eq!(created[0].due_date, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
//! assert_eq!(created[0].status, TaskStatus::Assigned);
//! ```

pub mod error;
pub mod generator;
pub mod models;
pub mod recurrence;
pub mod repository;
pub mod storage;
pub mod validation;
