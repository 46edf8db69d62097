//! Background job scheduler.
//!
//! Registers the recurring diagnostic refresh at server startup.

use std::sync::Arc;

use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::api::AppState;

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive
/// for the lifetime of the process. Dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// the cron expression is invalid, or the scheduler fails to start.
pub async fn build_scheduler(
    state: AppState,
    refresh_cron: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_refresh_job(&scheduler, state, refresh_cron).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the diagnostic refresh job on `cron` (default weekly, Sunday 03:00 UTC).
async fn register_refresh_job(
    scheduler: &JobScheduler,
    state: AppState,
    cron: &str,
) -> Result<(), JobSchedulerError> {
    let state = Arc::new(state);

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let state = Arc::clone(&state);

        Box::pin(async move {
            tracing::info!("scheduler: starting diagnostic refresh run");
            let summary = run_refresh_job(&state).await;
            tracing::info!(
                refreshed = summary.refreshed,
                failed = summary.failed,
                skipped = summary.skipped,
                "scheduler: diagnostic refresh run complete"
            );
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: diagnostic refresh registered");
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Refresh every active brand that already has a diagnostic, one at a time.
///
/// A failure for one brand is logged and counted; the batch continues.
pub(crate) async fn run_refresh_job(state: &AppState) -> RefreshSummary {
    let mut summary = RefreshSummary::default();

    let brand_ids = match brandmirror_db::list_brand_ids_with_diagnostics(&state.pool).await {
        Ok(ids) => ids,
        Err(e) => {
            tracing::error!(error = %e, "scheduler: failed to list brands with diagnostics");
            return summary;
        }
    };

    if brand_ids.is_empty() {
        tracing::info!("scheduler: no diagnostics to refresh; skipping");
        return summary;
    }

    for brand_id in brand_ids {
        let brand = match brandmirror_db::get_brand_by_id(&state.pool, brand_id).await {
            Ok(Some(brand)) => brand,
            Ok(None) => {
                tracing::warn!(brand_id, "scheduler: brand vanished before refresh");
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(brand_id, error = %e, "scheduler: failed to load brand");
                summary.failed += 1;
                continue;
            }
        };

        match state
            .orchestrator
            .refresh_diagnostic(brand.id, &brand.brand_data())
            .await
        {
            Ok(_) => summary.refreshed += 1,
            Err(e) => {
                tracing::warn!(brand_id, error = %e, "scheduler: diagnostic refresh failed");
                summary.failed += 1;
            }
        }
    }

    summary
}
