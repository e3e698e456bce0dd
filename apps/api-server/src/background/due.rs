//! Due-post scan: announces scheduled posts whose time has come so the
//! external publisher can pick them up.

use cadence_core::PostRegistry;
use tokio_cron_scheduler::JobSchedulerError;

use super::Scheduler;

/// Register the scan on `scheduler` using its configured cron expression.
pub async fn register_due_scan(
    scheduler: &Scheduler,
    registry: PostRegistry,
) -> Result<uuid::Uuid, JobSchedulerError> {
    let schedule = scheduler.config().due_scan_cron.clone();

    scheduler
        .add_cron(&schedule, move || {
            let registry = registry.clone();
            async move {
                match registry.announce_due().await {
                    Ok(0) => tracing::trace!("No posts due"),
                    Ok(count) => tracing::debug!(count, "Due scan complete"),
                    Err(e) => tracing::error!(error = %e, "Due scan failed"),
                }
            }
        })
        .await
}
