use crate::error::CoreError;
use crate::generator::InstanceGenerator;
use crate::models::{
    DeletionSummary, MaterializationSummary, NewTaskData, RecurrenceRule, Task, TaskCounts,
    TaskFilter, TaskStatus, TemplateStatus, TemplateUpdate, UpdateTaskData,
};
use crate::storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

// Re-export domain modules
pub mod tasks;
pub mod templates;
pub mod materialization;
pub mod transfer;

// Traits are defined in this module and implemented in respective domain modules

/// Domain-specific trait for task operations
#[async_trait]
pub trait TaskRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError>;
    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>, CoreError>;
    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError>;
    async fn list_tasks(&self, filter: &TaskFilter, today: NaiveDate) -> Result<Vec<Task>, CoreError>;
    async fn update_task(&self, id: &str, data: UpdateTaskData) -> Result<Task, CoreError>;
    async fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, CoreError>;
    async fn delete_task(&self, id: &str) -> Result<DeletionSummary, CoreError>;
    async fn task_counts(&self, today: NaiveDate) -> Result<TaskCounts, CoreError>;
}

/// Domain-specific trait for recurring template operations.
///
/// Every edit that can change what a template generates runs the
/// generator in the same write step.
#[async_trait]
pub trait TemplateRepository {
    async fn add_template(&self, data: NewTaskData, today: NaiveDate) -> Result<TemplateUpdate, CoreError>;
    async fn find_templates(&self) -> Result<Vec<Task>, CoreError>;
    async fn find_instances(&self, template_id: &str) -> Result<Vec<Task>, CoreError>;
    async fn set_template_status(&self, id: &str, status: TemplateStatus, today: NaiveDate) -> Result<TemplateUpdate, CoreError>;
    async fn update_recurrence(&self, id: &str, rule: RecurrenceRule, today: NaiveDate) -> Result<TemplateUpdate, CoreError>;
}

/// Domain-specific trait for instance generation
#[async_trait]
pub trait MaterializationRepository {
    async fn materialize(&self, today: NaiveDate) -> Result<MaterializationSummary, CoreError>;
}

/// Domain-specific trait for JSON import and export
#[async_trait]
pub trait TransferRepository {
    async fn export_tasks(&self) -> Result<String, CoreError>;
    async fn import_tasks(&self, json: &str) -> Result<usize, CoreError>;
}

/// Main repository trait that composes all domain traits
pub trait Repository:
    TaskRepository +
    TemplateRepository +
    MaterializationRepository +
    TransferRepository +
    Send +
    Sync
{
    // This trait automatically composes all domain-specific repositories
}

/// JSON-file implementation of the repository pattern.
///
/// The whole collection lives in memory behind one async mutex. Every write
/// runs against a copy, is persisted, and only then replaces the live
/// collection, so a generation run and its append are a single step and two
/// concurrent runs can never both insert the same occurrence.
pub struct JsonRepository {
    tasks: Mutex<Vec<Task>>,
    path: Option<PathBuf>,
    generator: InstanceGenerator,
}

impl JsonRepository {
    /// Opens the collection stored at `path`, creating it on first write.
    pub async fn open(path: impl Into<PathBuf>, generator: InstanceGenerator) -> Result<Self, CoreError> {
        let path = path.into();
        let tasks = storage::load_tasks(&path).await?;
        Ok(Self {
            tasks: Mutex::new(tasks),
            path: Some(path),
            generator,
        })
    }

    /// A repository that never touches the filesystem.
    pub fn in_memory(generator: InstanceGenerator) -> Self {
        Self::with_tasks(Vec::new(), generator)
    }

    /// An in-memory repository seeded with `tasks`.
    pub fn with_tasks(tasks: Vec<Task>, generator: InstanceGenerator) -> Self {
        Self {
            tasks: Mutex::new(tasks),
            path: None,
            generator,
        }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Copy of the current collection.
    pub async fn snapshot(&self) -> Vec<Task> {
        self.tasks.lock().await.clone()
    }

    pub(crate) fn generator(&self) -> &InstanceGenerator {
        &self.generator
    }

    /// Runs `f` against the collection as one serialized write.
    pub(crate) async fn mutate<R, F>(&self, f: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<R, CoreError> + Send,
        R: Send,
    {
        self.mutate_if_changed(|tasks| f(tasks).map(|result| (result, true)))
            .await
    }

    /// Like [`Self::mutate`], but `f` reports whether it changed anything;
    /// unchanged collections are not written back.
    pub(crate) async fn mutate_if_changed<R, F>(&self, f: F) -> Result<R, CoreError>
    where
        F: FnOnce(&mut Vec<Task>) -> Result<(R, bool), CoreError> + Send,
        R: Send,
    {
        let mut guard = self.tasks.lock().await;
        let mut working = guard.clone();
        let (result, changed) = f(&mut working)?;
        if !changed {
            return Ok(result);
        }

        if let Some(path) = &self.path {
            storage::save_tasks(path, &working).await?;
        }

        *guard = working;
        Ok(result)
    }

    /// Runs `f` against a read-only view of the collection.
    pub(crate) async fn read<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&[Task]) -> R + Send,
    {
        let guard = self.tasks.lock().await;
        f(&guard)
    }
}

impl Repository for JsonRepository {}

/// Position of the task with `id`, or `NotFound`.
pub(crate) fn position_of(tasks: &[Task], id: &str) -> Result<usize, CoreError> {
    tasks
        .iter()
        .position(|t| t.id == id)
        .ok_or_else(|| CoreError::NotFound(format!("Task with id {} not found", id)))
}
