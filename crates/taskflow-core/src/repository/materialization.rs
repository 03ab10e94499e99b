use crate::error::CoreError;
use crate::generator::InstanceGenerator;
use crate::models::{MaterializationSummary, Task};
use crate::repository::JsonRepository;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tracing::info;

#[async_trait]
impl super::MaterializationRepository for JsonRepository {
    async fn materialize(&self, today: NaiveDate) -> Result<MaterializationSummary, CoreError> {
        let generator = self.generator();
        let now = Utc::now();

        let summary = self
            .mutate_if_changed(|tasks| {
                let summary = append_generated(generator, tasks, today, now);
                let changed = summary.instances_created() > 0;
                Ok((summary, changed))
            })
            .await?;

        if summary.instances_created() > 0 {
            info!(
                %today,
                templates = summary.templates_processed,
                created = summary.instances_created(),
                "generated recurring task instances"
            );
        }

        Ok(summary)
    }
}

/// Runs the generator over `tasks` and appends what it returns.
///
/// Instances are stamped with `now` here rather than in the generator, which
/// never reads the clock.
pub(crate) fn append_generated(
    generator: &InstanceGenerator,
    tasks: &mut Vec<Task>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> MaterializationSummary {
    let report = generator.generate_with_report(tasks, today);
    let created = report.instances.iter().map(|t| t.id.clone()).collect();

    tasks.extend(report.instances.into_iter().map(|mut instance| {
        instance.created_at = Some(now);
        instance.updated_at = Some(now);
        instance
    }));

    MaterializationSummary {
        templates_processed: report.templates_processed,
        templates_skipped: report.templates_skipped,
        created,
    }
}
