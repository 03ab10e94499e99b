use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Assigned,
    InProgress,
    Closed,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Assigned => write!(f, "assigned"),
            TaskStatus::InProgress => write!(f, "in-progress"),
            TaskStatus::Closed => write!(f, "closed"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid task status: {0}")]
pub struct ParseTaskStatusError(String);

impl FromStr for TaskStatus {
    type Err = ParseTaskStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assigned" | "open" => Ok(TaskStatus::Assigned),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "closed" | "done" => Ok(TaskStatus::Closed),
            _ => Err(ParseTaskStatusError(s.to_string())),
        }
    }
}

/// Whether a template keeps spawning instances. Absent on disk means active.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TemplateStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TemplateStatus::Active => write!(f, "active"),
            TemplateStatus::Inactive => write!(f, "inactive"),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid template status: {0}")]
pub struct ParseTemplateStatusError(String);

impl FromStr for TemplateStatus {
    type Err = ParseTemplateStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(TemplateStatus::Active),
            "inactive" | "paused" => Ok(TemplateStatus::Inactive),
            _ => Err(ParseTemplateStatusError(s.to_string())),
        }
    }
}

// ============================================================================
// Recurrence Rules
// ============================================================================

/// A calendar date inside a year. `month` is zero-based (0 = January).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MonthDay {
    pub month: u8,
    pub day: u8,
}

impl MonthDay {
    pub fn new(month: u8, day: u8) -> Self {
        Self { month, day }
    }
}

/// Recurrence rule carried by a template. Every variant holds a set of
/// selectors; the next occurrence is the earliest date any selector yields.
///
/// Serialized as a discriminated union keyed by `type`:
/// `{"type":"weekly","weekDays":[1,5]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecurrenceRule {
    /// Days of the week, 0 = Sunday through 6 = Saturday.
    Weekly {
        #[serde(rename = "weekDays", default)]
        week_days: BTreeSet<u8>,
    },
    /// Days of the month, 1 through 31.
    Monthly {
        #[serde(rename = "monthDays", default)]
        month_days: BTreeSet<u8>,
    },
    /// Dates of the year.
    Yearly {
        #[serde(rename = "yearDates", default)]
        year_dates: BTreeSet<MonthDay>,
    },
    /// Any `type` this build does not know. Never produces occurrences.
    #[serde(other)]
    Unsupported,
}

impl RecurrenceRule {
    pub fn weekly(days: impl IntoIterator<Item = u8>) -> Self {
        RecurrenceRule::Weekly { week_days: days.into_iter().collect() }
    }

    pub fn monthly(days: impl IntoIterator<Item = u8>) -> Self {
        RecurrenceRule::Monthly { month_days: days.into_iter().collect() }
    }

    pub fn yearly(dates: impl IntoIterator<Item = MonthDay>) -> Self {
        RecurrenceRule::Yearly { year_dates: dates.into_iter().collect() }
    }

    /// Short name of the variant, as written in the `type` field.
    pub fn kind(&self) -> &'static str {
        match self {
            RecurrenceRule::Weekly { .. } => "weekly",
            RecurrenceRule::Monthly { .. } => "monthly",
            RecurrenceRule::Yearly { .. } => "yearly",
            RecurrenceRule::Unsupported => "unsupported",
        }
    }

    /// True when the rule has no selectors and can never fire.
    pub fn is_empty(&self) -> bool {
        match self {
            RecurrenceRule::Weekly { week_days } => week_days.is_empty(),
            RecurrenceRule::Monthly { month_days } => month_days.is_empty(),
            RecurrenceRule::Yearly { year_dates } => year_dates.is_empty(),
            RecurrenceRule::Unsupported => true,
        }
    }
}

impl std::fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        const MONTHS: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];

        match self {
            RecurrenceRule::Weekly { week_days } => {
                let days: Vec<String> = week_days
                    .iter()
                    .map(|d| WEEKDAYS.get(*d as usize).map_or_else(|| d.to_string(), |s| s.to_string()))
                    .collect();
                write!(f, "weekly on {}", days.join(", "))
            }
            RecurrenceRule::Monthly { month_days } => {
                let days: Vec<String> = month_days.iter().map(|d| d.to_string()).collect();
                write!(f, "monthly on day {}", days.join(", "))
            }
            RecurrenceRule::Yearly { year_dates } => {
                let dates: Vec<String> = year_dates
                    .iter()
                    .map(|md| match MONTHS.get(md.month as usize) {
                        Some(name) => format!("{} {}", name, md.day),
                        None => format!("{}/{}", md.month, md.day),
                    })
                    .collect();
                write!(f, "yearly on {}", dates.join(", "))
            }
            RecurrenceRule::Unsupported => write!(f, "unsupported"),
        }
    }
}

// ============================================================================
// Tasks
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub file_name: String,
    pub file_size: u64,
    pub mime_type: String,
    pub url: String,
    pub uploaded_at: String,
}

/// A task record. Templates carry `recurrence`, instances carry
/// `recurrence_template_id`, plain tasks carry neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub subject: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub assignee: String,
    pub due_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub due_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    pub reminder_time: Option<NaiveTime>,
    pub status: TaskStatus,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub is_full_day: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_rule::deserialize")]
    pub recurrence: Option<RecurrenceRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_status: Option<TemplateStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_template_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Template,
    Instance,
    Plain,
}

impl Task {
    pub fn kind(&self) -> TaskKind {
        if self.recurrence.is_some() {
            TaskKind::Template
        } else if self.recurrence_template_id.is_some() {
            TaskKind::Instance
        } else {
            TaskKind::Plain
        }
    }

    pub fn is_template(&self) -> bool {
        self.recurrence.is_some()
    }

    /// Template status with the "absent means active" default applied.
    pub fn template_status(&self) -> TemplateStatus {
        self.template_status.unwrap_or_default()
    }

    /// Templates the generator should expand.
    pub fn is_active_template(&self) -> bool {
        self.is_template() && self.template_status() != TemplateStatus::Inactive
    }

    /// True if this task was spawned by the given template.
    pub fn is_instance_of(&self, template_id: &str) -> bool {
        self.recurrence_template_id.as_deref() == Some(template_id)
    }
}

/// Reads a stored rule without failing the record: a rule object that does
/// not parse (missing `type`, selectors out of range) becomes `Unsupported`.
mod lenient_rule {
    use super::RecurrenceRule;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;
    use tracing::warn;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<RecurrenceRule>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<Value>::deserialize(deserializer)? else {
            return Ok(None);
        };
        match serde_json::from_value(raw) {
            Ok(rule) => Ok(Some(rule)),
            Err(e) => {
                warn!(error = %e, "malformed recurrence rule, treating as unsupported");
                Ok(Some(RecurrenceRule::Unsupported))
            }
        }
    }
}

/// `HH:MM` encoding for optional times of day.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

// ============================================================================
// Data Transfer Objects
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct NewTaskData {
    pub subject: String,
    pub details: Option<String>,
    pub assignee: String,
    pub due_date: NaiveDate,
    pub due_time: Option<NaiveTime>,
    pub reminder_time: Option<NaiveTime>,
    pub is_full_day: bool,
    pub labels: Vec<String>,
    pub url: Option<String>,
    /// When present the task becomes a recurring template.
    pub recurrence: Option<RecurrenceRule>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateTaskData {
    pub subject: Option<String>,
    pub details: Option<Option<String>>,
    pub assignee: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub due_time: Option<Option<NaiveTime>>,
    pub reminder_time: Option<Option<NaiveTime>>,
    pub status: Option<TaskStatus>,
    pub labels: Option<Vec<String>>,
    pub url: Option<Option<String>>,
}

/// Result of deleting a task; templates take their instances with them.
#[derive(Debug, Clone)]
pub struct DeletionSummary {
    pub deleted: Task,
    pub cascaded: Vec<String>,
}

// ============================================================================
// Filtering
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueDate {
    Today,
    Tomorrow,
    Overdue,
    On(NaiveDate),
    Before(NaiveDate),
    After(NaiveDate),
}

/// Filter for listing tasks. Date conditions are evaluated against the
/// `today` passed to [`TaskFilter::matches`].
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub due: Option<DueDate>,
    pub kind: Option<TaskKind>,
    pub template_status: Option<TemplateStatus>,
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }

        if let Some(kind) = self.kind {
            if task.kind() != kind {
                return false;
            }
        }

        if let Some(template_status) = self.template_status {
            if !task.is_template() || task.template_status() != template_status {
                return false;
            }
        }

        if let Some(due) = self.due {
            let matched = match due {
                DueDate::Today => task.due_date == today,
                DueDate::Tomorrow => today.succ_opt() == Some(task.due_date),
                DueDate::Overdue => task.due_date < today && task.status != TaskStatus::Closed,
                DueDate::On(date) => task.due_date == date,
                DueDate::Before(date) => task.due_date < date,
                DueDate::After(date) => task.due_date > date,
            };
            if !matched {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let haystack = [
                Some(task.subject.as_str()),
                task.details.as_deref(),
                Some(task.assignee.as_str()),
            ];
            let in_text = haystack.iter().flatten().any(|s| s.to_lowercase().contains(&needle));
            let in_labels = task.labels.iter().any(|l| l.to_lowercase().contains(&needle));
            if !in_text && !in_labels {
                return false;
            }
        }

        true
    }
}

/// How far ahead each active template is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationPolicy {
    /// Days past a template's next occurrence that must be covered by instances
    pub lookahead_days: u32,
    /// Hard cap on occurrence steps per template and run
    pub max_steps: usize,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            lookahead_days: 5,
            max_steps: 10,
        }
    }
}

/// Outcome of one compute-and-append generation step in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializationSummary {
    /// Active templates considered
    pub templates_processed: usize,
    /// Active templates skipped because their rule yields nothing
    pub templates_skipped: usize,
    /// IDs of the instances appended to the collection
    pub created: Vec<String>,
}

impl MaterializationSummary {
    pub fn instances_created(&self) -> usize {
        self.created.len()
    }
}

/// A template after an edit, with the generation run the edit triggered.
#[derive(Debug, Clone)]
pub struct TemplateUpdate {
    pub template: Task,
    pub summary: MaterializationSummary,
}

/// Dashboard counters over non-template tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub closed: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub active_templates: usize,
    pub inactive_templates: usize,
    /// Open tasks per due date
    pub pending_by_date: std::collections::BTreeMap<NaiveDate, usize>,
}
