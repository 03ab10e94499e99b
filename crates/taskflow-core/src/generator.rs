use chrono::{Days, NaiveDate};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use crate::models::{GenerationPolicy, RecurrenceRule, Task, TaskStatus};
use crate::recurrence::{CalendarCalculator, OccurrenceCalculator};

/// Computes the instances to append to `all_tasks` so that every active
/// template is covered for the look-ahead window, using the default policy.
///
/// Pure: the caller owns the merge and any persistence.
pub fn generate_instances(all_tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    InstanceGenerator::with_defaults().generate(all_tasks, today)
}

/// Deterministic ID for the instance of `template_id` due on `due_date`.
///
/// Derived from the template ID and the occurrence timestamp (UTC midnight,
/// epoch milliseconds) so repeated runs name the same occurrence identically.
pub fn instance_id(template_id: &str, due_date: NaiveDate) -> String {
    let millis = due_date
        .and_hms_opt(0, 0, 0)
        .map_or(0, |midnight| midnight.and_utc().timestamp_millis());
    format!("{template_id}-recur-{millis}")
}

/// What a generation run produced, plus counters for logging and reporting.
#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// New instances, in template order then date order
    pub instances: Vec<Task>,
    /// Active templates that were considered
    pub templates_processed: usize,
    /// Active templates whose rule produced no occurrence
    pub templates_skipped: usize,
}

/// Existing instances grouped by template, plus every id in the collection.
struct InstanceIndex<'a> {
    by_template: HashMap<&'a str, TemplateInstances>,
    ids: HashSet<&'a str>,
}

#[derive(Default)]
struct TemplateInstances {
    latest: Option<NaiveDate>,
    dates: HashSet<NaiveDate>,
}

impl<'a> InstanceIndex<'a> {
    fn build(all_tasks: &'a [Task]) -> Self {
        let mut by_template: HashMap<&'a str, TemplateInstances> = HashMap::new();
        let mut ids = HashSet::new();

        for task in all_tasks {
            ids.insert(task.id.as_str());
            if let Some(template_id) = task.recurrence_template_id.as_deref() {
                let entry = by_template.entry(template_id).or_default();
                entry.latest = entry.latest.max(Some(task.due_date));
                entry.dates.insert(task.due_date);
            }
        }

        Self { by_template, ids }
    }

    fn latest_due(&self, template_id: &str) -> Option<NaiveDate> {
        self.by_template.get(template_id).and_then(|t| t.latest)
    }

    /// An occurrence is covered when an instance is due on it, or when its
    /// derived id is taken (the instance was rescheduled to another date).
    fn contains(&self, template_id: &str, date: NaiveDate) -> bool {
        self.by_template
            .get(template_id)
            .is_some_and(|t| t.dates.contains(&date))
            || self.ids.contains(instance_id(template_id, date).as_str())
    }
}

/// InstanceGenerator: turns active templates into dated instances.
///
/// Responsibilities:
/// 1. Pick the generation anchor per template (latest instance, never before today)
/// 2. Walk occurrences up to the look-ahead window end
/// 3. Skip dates that already have an instance for the template
/// 4. Bound every walk by `max_steps` and stop on non-advancing occurrences
#[derive(Debug, Clone)]
pub struct InstanceGenerator<C = CalendarCalculator> {
    policy: GenerationPolicy,
    calculator: C,
}

impl InstanceGenerator {
    /// Creates a generator over the Gregorian calendar.
    pub fn new(policy: GenerationPolicy) -> Self {
        Self::with_calculator(policy, CalendarCalculator)
    }

    /// Creates a generator with the default look-ahead policy.
    pub fn with_defaults() -> Self {
        Self::new(GenerationPolicy::default())
    }
}

impl<C: OccurrenceCalculator> InstanceGenerator<C> {
    pub fn with_calculator(policy: GenerationPolicy, calculator: C) -> Self {
        Self { policy, calculator }
    }

    pub fn policy(&self) -> &GenerationPolicy {
        &self.policy
    }

    /// Returns the new instances for `all_tasks` as of `today`.
    pub fn generate(&self, all_tasks: &[Task], today: NaiveDate) -> Vec<Task> {
        self.generate_with_report(all_tasks, today).instances
    }

    /// Like [`generate`](Self::generate) but also reports per-run counters.
    pub fn generate_with_report(&self, all_tasks: &[Task], today: NaiveDate) -> GenerationReport {
        let index = InstanceIndex::build(all_tasks);
        let mut report = GenerationReport::default();

        for template in all_tasks.iter().filter(|t| t.is_active_template()) {
            let Some(rule) = template.recurrence.as_ref() else {
                continue;
            };
            report.templates_processed += 1;

            match self.expand_template(template, rule, &index, today) {
                Some(instances) => report.instances.extend(instances),
                None => report.templates_skipped += 1,
            }
        }

        report
    }

    /// Instances for one template, or `None` when its rule yields no occurrence.
    fn expand_template(
        &self,
        template: &Task,
        rule: &RecurrenceRule,
        index: &InstanceIndex<'_>,
        today: NaiveDate,
    ) -> Option<Vec<Task>> {
        let anchor = index
            .latest_due(&template.id)
            .map_or(today, |latest| latest.max(today));

        let Some(first) = self.calculator.next_occurrence(rule, anchor) else {
            debug!(template_id = %template.id, rule = %rule, "rule yields no occurrence, skipping template");
            return None;
        };

        // The window hangs off today's next occurrence, not the anchor, so a
        // run over already merged output is a no-op.
        let horizon_start = if anchor == today {
            first
        } else {
            self.calculator.next_occurrence(rule, today)?
        };
        let window_end = horizon_start
            .checked_add_days(Days::new(u64::from(self.policy.lookahead_days)))
            .unwrap_or(NaiveDate::MAX);

        let mut instances = Vec::new();
        let mut cursor = anchor;
        let mut next = Some(first);

        for _ in 0..self.policy.max_steps {
            let Some(occurrence) = next else {
                break;
            };
            if occurrence <= cursor {
                warn!(
                    template_id = %template.id,
                    %cursor,
                    %occurrence,
                    "occurrence did not advance, aborting walk"
                );
                break;
            }
            if occurrence > window_end {
                break;
            }

            if !index.contains(&template.id, occurrence) {
                instances.push(instantiate(template, occurrence));
            }

            cursor = occurrence;
            next = self.calculator.next_occurrence(rule, cursor);
        }

        debug!(
            template_id = %template.id,
            %anchor,
            %window_end,
            created = instances.len(),
            "expanded template"
        );

        Some(instances)
    }
}

/// Builds the instance of `template` for `due_date`.
fn instantiate(template: &Task, due_date: NaiveDate) -> Task {
    Task {
        id: instance_id(&template.id, due_date),
        due_date,
        status: TaskStatus::Assigned,
        recurrence: None,
        template_status: None,
        recurrence_template_id: Some(template.id.clone()),
        ..template.clone()
    }
}
