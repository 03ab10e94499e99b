use crate::error::CoreError;
use crate::models::{NewTaskData, RecurrenceRule, Task, TemplateStatus, TemplateUpdate};
use crate::repository::materialization::append_generated;
use crate::repository::tasks::insert_new_task;
use crate::repository::{position_of, JsonRepository};
use crate::validation::{validate_new_task, validate_rule};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tracing::info;

#[async_trait]
impl super::TemplateRepository for JsonRepository {
    async fn add_template(&self, data: NewTaskData, today: NaiveDate) -> Result<TemplateUpdate, CoreError> {
        if data.recurrence.is_none() {
            return Err(CoreError::InvalidInput(
                "Please set the recurrence rules for the template.".to_string(),
            ));
        }
        validate_new_task(&data)?;

        let generator = self.generator();
        let now = Utc::now();
        let update = self
            .mutate(|tasks| {
                let template = insert_new_task(tasks, data, now);
                let summary = append_generated(generator, tasks, today, now);
                Ok(TemplateUpdate { template, summary })
            })
            .await?;

        info!(template_id = %update.template.id, created = update.summary.instances_created(), "created template");
        Ok(update)
    }

    async fn find_templates(&self) -> Result<Vec<Task>, CoreError> {
        Ok(self
            .read(|tasks| tasks.iter().filter(|t| t.is_template()).cloned().collect())
            .await)
    }

    async fn find_instances(&self, template_id: &str) -> Result<Vec<Task>, CoreError> {
        let mut instances: Vec<Task> = self
            .read(|tasks| {
                tasks
                    .iter()
                    .filter(|t| t.is_instance_of(template_id))
                    .cloned()
                    .collect()
            })
            .await;
        instances.sort_by_key(|t| t.due_date);
        Ok(instances)
    }

    async fn set_template_status(
        &self,
        id: &str,
        status: TemplateStatus,
        today: NaiveDate,
    ) -> Result<TemplateUpdate, CoreError> {
        self.edit_template(id, today, |template| {
            template.template_status = Some(status);
            Ok(())
        })
        .await
    }

    async fn update_recurrence(
        &self,
        id: &str,
        rule: RecurrenceRule,
        today: NaiveDate,
    ) -> Result<TemplateUpdate, CoreError> {
        validate_rule(&rule)?;
        // Instances already generated under the old rule stay as they are
        self.edit_template(id, today, |template| {
            template.recurrence = Some(rule);
            Ok(())
        })
        .await
    }
}

impl JsonRepository {
    /// Applies `edit` to template `id`, then regenerates in the same write.
    async fn edit_template<F>(&self, id: &str, today: NaiveDate, edit: F) -> Result<TemplateUpdate, CoreError>
    where
        F: FnOnce(&mut Task) -> Result<(), CoreError> + Send,
    {
        let generator = self.generator();
        let now = Utc::now();

        self.mutate(|tasks| {
            let index = position_of(tasks, id)?;
            let template = &mut tasks[index];
            if !template.is_template() {
                return Err(CoreError::NotATemplate(id.to_string()));
            }

            edit(template)?;
            template.updated_at = Some(now);
            let template = template.clone();

            let summary = append_generated(generator, tasks, today, now);
            Ok(TemplateUpdate { template, summary })
        })
        .await
    }
}
