//! Cron scheduler for the stale-session sweep.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job as CronJob, JobScheduler};

use dirguard_auth::session::SessionCleanup;
use dirguard_core::error::AppError;

/// Runs [`SessionCleanup::sweep`] on a cron schedule.
pub struct SweepScheduler {
    /// The underlying job scheduler
    scheduler: JobScheduler,
    /// Sweep implementation
    cleanup: Arc<SessionCleanup>,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler").finish()
    }
}

impl SweepScheduler {
    /// Create a new scheduler
    pub async fn new(cleanup: Arc<SessionCleanup>) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {e}")))?;

        Ok(Self { scheduler, cleanup })
    }

    /// Register the sweep on `cron` (six fields, seconds first)
    pub async fn register(&self, cron: &str) -> Result<(), AppError> {
        let cleanup = Arc::clone(&self.cleanup);
        let job = CronJob::new_async(cron, move |_uuid, _lock| {
            let cleanup = Arc::clone(&cleanup);
            Box::pin(async move {
                tracing::debug!("Running scheduled session sweep");
                if let Err(e) = cleanup.sweep(Utc::now()).await {
                    tracing::error!(error = %e, "Scheduled session sweep failed");
                }
            })
        })
        .map_err(|e| {
            AppError::configuration(format!("Invalid session sweep schedule '{cron}': {e}"))
        })?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add session sweep: {e}")))?;

        tracing::info!(cron = %cron, "Registered: session_sweep");
        Ok(())
    }

    /// Start the scheduler
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {e}")))?;

        tracing::info!("Sweep scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {e}")))?;

        tracing::info!("Sweep scheduler shut down");
        Ok(())
    }
}
