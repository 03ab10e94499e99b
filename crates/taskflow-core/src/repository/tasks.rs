use crate::error::CoreError;
use crate::models::{
    DeletionSummary, NewTaskData, Task, TaskCounts, TaskFilter, TaskKind, TaskStatus,
    TemplateStatus, UpdateTaskData,
};
use crate::repository::{position_of, JsonRepository};
use crate::validation::validate_new_task;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

#[async_trait]
impl super::TaskRepository for JsonRepository {
    async fn add_task(&self, data: NewTaskData) -> Result<Task, CoreError> {
        validate_new_task(&data)?;
        let now = Utc::now();
        self.mutate(|tasks| Ok(insert_new_task(tasks, data, now))).await
    }

    async fn find_task_by_id(&self, id: &str) -> Result<Option<Task>, CoreError> {
        Ok(self.read(|tasks| tasks.iter().find(|t| t.id == id).cloned()).await)
    }

    async fn find_tasks_by_id_prefix(&self, prefix: &str) -> Result<Vec<Task>, CoreError> {
        Ok(self
            .read(|tasks| {
                tasks
                    .iter()
                    .filter(|t| t.id.starts_with(prefix))
                    .cloned()
                    .collect()
            })
            .await)
    }

    async fn list_tasks(&self, filter: &TaskFilter, today: NaiveDate) -> Result<Vec<Task>, CoreError> {
        let mut tasks: Vec<Task> = self
            .read(|tasks| {
                tasks
                    .iter()
                    .filter(|t| filter.matches(t, today))
                    .cloned()
                    .collect()
            })
            .await;

        tasks.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then_with(|| a.due_time.cmp(&b.due_time))
                .then_with(|| a.subject.cmp(&b.subject))
        });
        Ok(tasks)
    }

    async fn update_task(&self, id: &str, data: UpdateTaskData) -> Result<Task, CoreError> {
        if let Some(subject) = &data.subject {
            if subject.trim().is_empty() {
                return Err(CoreError::InvalidInput("Subject is required.".to_string()));
            }
        }
        if let Some(assignee) = &data.assignee {
            if assignee.trim().is_empty() {
                return Err(CoreError::InvalidInput("Assignee is required.".to_string()));
            }
        }

        let now = Utc::now();
        self.mutate(|tasks| {
            let index = position_of(tasks, id)?;
            let task = &mut tasks[index];

            if data.status.is_some() && task.is_template() {
                return Err(CoreError::InvalidInput(
                    "Templates have no status of their own; pause or resume them instead".to_string(),
                ));
            }

            if let Some(subject) = data.subject {
                task.subject = subject;
            }
            if let Some(details) = data.details {
                task.details = details;
            }
            if let Some(assignee) = data.assignee {
                task.assignee = assignee;
            }
            if let Some(due_date) = data.due_date {
                task.due_date = due_date;
            }
            if let Some(due_time) = data.due_time {
                task.due_time = due_time;
            }
            if let Some(reminder_time) = data.reminder_time {
                task.reminder_time = reminder_time;
            }
            if let Some(status) = data.status {
                task.status = status;
            }
            if let Some(labels) = data.labels {
                task.labels = labels;
            }
            if let Some(url) = data.url {
                task.url = url;
            }
            task.updated_at = Some(now);

            Ok(task.clone())
        })
        .await
    }

    async fn set_task_status(&self, id: &str, status: TaskStatus) -> Result<Task, CoreError> {
        self.update_task(
            id,
            UpdateTaskData {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    async fn delete_task(&self, id: &str) -> Result<DeletionSummary, CoreError> {
        self.mutate(|tasks| {
            let index = position_of(tasks, id)?;
            let deleted = tasks.remove(index);

            let mut cascaded = Vec::new();
            if deleted.is_template() {
                tasks.retain(|t| {
                    if t.is_instance_of(&deleted.id) {
                        cascaded.push(t.id.clone());
                        false
                    } else {
                        true
                    }
                });
            }

            debug!(task_id = %deleted.id, cascaded = cascaded.len(), "deleted task");
            Ok(DeletionSummary { deleted, cascaded })
        })
        .await
    }

    async fn task_counts(&self, today: NaiveDate) -> Result<TaskCounts, CoreError> {
        Ok(self.read(|tasks| count_tasks(tasks, today)).await)
    }
}

/// Builds a task from `data` and pushes it onto `tasks`.
pub(crate) fn insert_new_task(tasks: &mut Vec<Task>, data: NewTaskData, now: DateTime<Utc>) -> Task {
    let template_status = data.recurrence.as_ref().map(|_| TemplateStatus::Active);

    let task = Task {
        id: Uuid::new_v4().to_string(),
        subject: data.subject.trim().to_string(),
        details: data.details.filter(|d| !d.trim().is_empty()),
        assignee: data.assignee.trim().to_string(),
        due_date: data.due_date,
        due_time: data.due_time,
        reminder_time: data.reminder_time,
        status: TaskStatus::Assigned,
        labels: data.labels,
        is_full_day: data.is_full_day,
        url: data.url.filter(|u| !u.trim().is_empty()),
        attachments: Vec::new(),
        recurrence: data.recurrence,
        template_status,
        recurrence_template_id: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    tasks.push(task.clone());
    task
}

fn count_tasks(tasks: &[Task], today: NaiveDate) -> TaskCounts {
    let mut counts = TaskCounts::default();

    for task in tasks {
        if task.kind() == TaskKind::Template {
            match task.template_status() {
                TemplateStatus::Active => counts.active_templates += 1,
                TemplateStatus::Inactive => counts.inactive_templates += 1,
            }
            continue;
        }

        counts.total += 1;
        match task.status {
            TaskStatus::Closed => {
                counts.closed += 1;
                continue;
            }
            TaskStatus::InProgress => counts.in_progress += 1,
            TaskStatus::Assigned => {}
        }

        counts.pending += 1;
        *counts.pending_by_date.entry(task.due_date).or_insert(0) += 1;
        if task.due_date < today {
            counts.overdue += 1;
        } else if task.due_date == today {
            counts.due_today += 1;
        }
    }

    counts
}
