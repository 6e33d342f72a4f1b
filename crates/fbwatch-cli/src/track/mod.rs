//! The tracking pipeline: resolve → fetch → filter → store.

use chrono::Utc;
use sqlx::SqlitePool;

use fbwatch_db::InsertOutcome;
use fbwatch_wb::{filter_feedbacks, normalize_feedback, WbClient};

/// Terminal counts for one tracking run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub fetched: usize,
    pub retained: usize,
    pub stored: usize,
    pub duplicates: usize,
    pub failed: usize,
}

/// Runs the full tracking pipeline for one product.
///
/// Resets the store first — each run replaces the previous snapshot
/// wholesale; that is deliberate, not missing cross-run dedup — then resolves
/// the feedback group, fetches the raw collection, filters it, and inserts
/// the survivors in order. Per-record store failures are logged and counted
/// rather than propagated, so one bad record never aborts the batch.
///
/// # Errors
///
/// Resolution, fetch, and schema failures propagate unmodified and abort
/// the run.
pub(crate) async fn run_tracking(
    pool: &SqlitePool,
    client: &WbClient,
    product_id: i64,
    rating_ceiling: i32,
    min_age_days: i64,
) -> anyhow::Result<RunSummary> {
    fbwatch_db::reset_schema(pool).await?;

    let group_id = client.resolve_group_id(product_id).await?;
    let raw = client.fetch_raw_feedbacks(group_id).await?;

    let mut summary = RunSummary {
        fetched: raw.len(),
        ..RunSummary::default()
    };

    let retained = filter_feedbacks(raw, rating_ceiling, min_age_days, Utc::now());
    summary.retained = retained.len();

    for feedback in &retained {
        let record = normalize_feedback(feedback);
        match fbwatch_db::insert_feedback_if_absent(pool, &record).await {
            Ok(InsertOutcome::Inserted) => summary.stored += 1,
            Ok(InsertOutcome::Duplicate) => summary.duplicates += 1,
            Err(e) => {
                tracing::error!(id = %record.id, error = %e, "failed to store feedback");
                summary.failed += 1;
            }
        }
    }

    tracing::info!(
        product_id,
        fetched = summary.fetched,
        retained = summary.retained,
        stored = summary.stored,
        duplicates = summary.duplicates,
        failed = summary.failed,
        "tracking run complete"
    );
    Ok(summary)
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
