use anyhow::Result;
use chrono::NaiveDate;
use taskflow_core::repository::Repository;

use crate::views::table::display_counts;

pub async fn show_stats(repo: &impl Repository, today: NaiveDate) -> Result<()> {
    let counts = repo.task_counts(today).await?;
    display_counts(&counts, today);
    Ok(())
}
