use crate::error::CoreError;
use crate::models::Task;
use crate::repository::JsonRepository;
use crate::validation::validate_imported_task;
use async_trait::async_trait;
use std::collections::HashSet;
use tracing::info;

#[async_trait]
impl super::TransferRepository for JsonRepository {
    async fn export_tasks(&self) -> Result<String, CoreError> {
        let json = self.read(|tasks| serde_json::to_string_pretty(tasks)).await?;
        Ok(json)
    }

    /// Replaces the whole collection with the tasks in `json`.
    ///
    /// Nothing is changed unless every record passes validation.
    async fn import_tasks(&self, json: &str) -> Result<usize, CoreError> {
        let imported = parse_import(json)?;
        let count = imported.len();

        self.mutate(move |tasks| {
            *tasks = imported;
            Ok(())
        })
        .await?;

        info!(count, "imported tasks");
        Ok(count)
    }
}

fn parse_import(json: &str) -> Result<Vec<Task>, CoreError> {
    let tasks: Vec<Task> =
        serde_json::from_str(json).map_err(|e| CoreError::InvalidImport(format!("Invalid task structure in JSON file: {e}")))?;

    let mut seen = HashSet::with_capacity(tasks.len());
    for task in &tasks {
        validate_imported_task(task)?;
        if !seen.insert(task.id.as_str()) {
            return Err(CoreError::InvalidImport(format!("duplicate task id '{}'", task.id)));
        }
    }

    Ok(tasks)
}
