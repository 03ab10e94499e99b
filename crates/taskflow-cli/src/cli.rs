use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// TaskFlow: a task tracker with weekly, monthly and yearly recurring templates
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Treat this date (YYYY-MM-DD) as today instead of the clock
    #[arg(long, global = true, value_name = "DATE")]
    pub today: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Add a task, or a recurring template with --weekly/--monthly/--yearly
    Add(AddCommand),
    /// List tasks
    List(ListCommand),
    /// Show one task in detail
    Show(IdCommand),
    /// Edit a task or a template's recurrence
    Edit(EditCommand),
    /// Mark a task as closed
    Done(IdCommand),
    /// Mark a task as in progress
    Start(IdCommand),
    /// Mark a task as assigned again
    Reopen(IdCommand),
    /// Stop a template from generating instances
    Pause(IdCommand),
    /// Let a paused template generate instances again
    Resume(IdCommand),
    /// Delete a task; deleting a template deletes its instances
    Delete(DeleteCommand),
    /// Generate due instances for all active templates
    Generate,
    /// Show the next occurrences of a template
    Preview(PreviewCommand),
    /// Show task counters
    Stats,
    /// Write all tasks as JSON
    Export(ExportCommand),
    /// Replace all tasks with the contents of a JSON file
    Import(ImportCommand),
}

/// Recurrence options shared by `add` and `edit`.
#[derive(Args, Debug, Clone, Default)]
#[group(multiple = false)]
pub struct RecurrenceArgs {
    /// Repeat weekly on these days (e.g. "mon,fri" or "1,5")
    #[arg(long, value_name = "DAYS")]
    pub weekly: Option<String>,
    /// Repeat monthly on these days of the month (e.g. "1,15,31")
    #[arg(long, value_name = "DAYS")]
    pub monthly: Option<String>,
    /// Repeat yearly on these dates (e.g. "12-25,02-29")
    #[arg(long, value_name = "DATES")]
    pub yearly: Option<String>,
}

impl RecurrenceArgs {
    pub fn is_set(&self) -> bool {
        self.weekly.is_some() || self.monthly.is_some() || self.yearly.is_some()
    }
}

#[derive(Parser, Debug, Clone)]
pub struct AddCommand {
    /// The subject of the task
    pub subject: String,
    /// Longer description
    #[arg(short, long)]
    pub details: Option<String>,
    /// Who the task is assigned to
    #[arg(short, long)]
    pub assignee: Option<String>,
    /// The due date (e.g. "2024-03-01", "tomorrow"); defaults to today
    #[arg(long)]
    pub due: Option<String>,
    /// Time of day, HH:MM
    #[arg(long)]
    pub time: Option<String>,
    /// Reminder time, HH:MM
    #[arg(long)]
    pub reminder: Option<String>,
    /// Labels to add to the task
    #[arg(short, long = "label")]
    pub labels: Vec<String>,
    /// A link attached to the task
    #[arg(long)]
    pub url: Option<String>,
    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct EditCommand {
    /// The ID of the task to edit
    pub id: String,

    #[arg(long)]
    pub subject: Option<String>,

    #[arg(long)]
    pub details: Option<String>,
    #[arg(long, conflicts_with = "details")]
    pub details_clear: bool,

    #[arg(long)]
    pub assignee: Option<String>,

    #[arg(long)]
    pub due: Option<String>,

    #[arg(long)]
    pub time: Option<String>,
    #[arg(long, conflicts_with = "time")]
    pub time_clear: bool,

    /// Add labels to the task
    #[arg(long)]
    pub add_label: Vec<String>,

    /// Remove labels from the task
    #[arg(long)]
    pub remove_label: Vec<String>,

    #[command(flatten)]
    pub recurrence: RecurrenceArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct IdCommand {
    /// Task ID, unique prefix, or <template>@YYYY-MM-DD
    pub id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct DeleteCommand {
    /// The ID of the task to delete
    pub id: String,
    /// Force deletion without confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Parser, Debug, Clone, Default)]
pub struct ListCommand {
    /// Only tasks with this status (assigned, in-progress, closed)
    #[arg(short, long)]
    pub status: Option<String>,
    /// today, tomorrow, overdue, before:DATE, after:DATE or a date
    #[arg(long)]
    pub due: Option<String>,
    /// Only recurring templates
    #[arg(long, conflicts_with = "instances")]
    pub templates: bool,
    /// Only generated instances
    #[arg(long)]
    pub instances: bool,
    /// Only paused templates
    #[arg(long, conflicts_with = "instances")]
    pub paused: bool,
    /// Text to look for in subject, details, assignee and labels
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    /// The template ID
    pub id: String,
    /// How many occurrences to show
    #[arg(short = 'n', long, default_value_t = 5)]
    pub count: usize,
}

#[derive(Parser, Debug, Clone)]
pub struct ExportCommand {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct ImportCommand {
    /// JSON file holding an array of tasks
    pub file: PathBuf,
    /// Replace without confirmation
    #[arg(short, long)]
    pub force: bool,
}
