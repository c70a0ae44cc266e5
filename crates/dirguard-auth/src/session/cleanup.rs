//! Stale and inactive session cleanup.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use dirguard_core::config::SessionConfig;
use dirguard_core::result::AppResult;
use dirguard_core::types::UserId;

use super::store::SessionStore;

/// Hard-deletes sessions that have gone quiet.
#[derive(Debug, Clone)]
pub struct SessionCleanup {
    /// Session store for deleting rows.
    store: Arc<SessionStore>,
    /// Staleness threshold.
    config: SessionConfig,
}

impl SessionCleanup {
    /// Creates a new session cleanup handler.
    pub fn new(store: Arc<SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Deletes every session, Active or Inactive, not seen for the
    /// configured staleness window before `now`.
    ///
    /// Returns the number of sessions removed. A window too large to
    /// subtract from `now` leaves nothing stale.
    pub async fn sweep(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let Some(cutoff) = self.config.stale_cutoff(now) else {
            warn!(
                stale_after_hours = self.config.stale_after_hours,
                "Staleness window out of range, skipping sweep"
            );
            return Ok(0);
        };
        self.sweep_before(cutoff).await
    }

    /// Deletes every session whose `last_active` is strictly before `cutoff`.
    pub async fn sweep_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let removed = self.store.delete_sessions_before(cutoff).await?;
        if removed > 0 {
            info!(removed = removed, cutoff = %cutoff, "Swept stale sessions");
        }
        Ok(removed)
    }

    /// Deletes Inactive sessions, for one user or everyone.
    pub async fn purge_inactive(&self, user_id: Option<UserId>) -> AppResult<u64> {
        let removed = self.store.delete_inactive_sessions(user_id).await?;
        match user_id {
            Some(user_id) => info!(user_id = %user_id, removed = removed, "Purged inactive sessions"),
            None => info!(removed = removed, "Purged inactive sessions"),
        }
        Ok(removed)
    }
}
