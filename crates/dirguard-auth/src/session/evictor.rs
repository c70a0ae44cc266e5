//! Login-time session cap enforcement and explicit evictions.
//!
//! Login sequence:
//!
//! 1. Optionally sweep stale sessions.
//! 2. If the device already holds an Active row, just refresh it.
//! 3. Otherwise count the user's Active sessions; at or above the cap,
//!    either reject the login or mark the least recently active one
//!    Inactive, depending on the overflow strategy.
//! 4. Upsert the device's row as Active.
//!
//! Count-then-evict is not locked per user. Two concurrent logins can both
//! see a count below the cap and both succeed; the next login for that user
//! evicts again and the bound holds once contention settles.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use dirguard_core::config::{OverflowStrategy, SessionConfig};
use dirguard_core::error::{AppError, ErrorKind};
use dirguard_core::result::AppResult;
use dirguard_core::types::UserId;
use dirguard_entity::session::{DeviceKey, Session, SessionStatus};

use super::store::SessionStore;

/// Drives session state transitions for logins, heartbeats, and evictions.
#[derive(Debug, Clone)]
pub struct SessionEvictor {
    /// Session persistence.
    store: Arc<SessionStore>,
    /// Session configuration.
    config: SessionConfig,
}

impl SessionEvictor {
    /// Creates a new evictor.
    pub fn new(store: Arc<SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Records a successful login from `device_key`, enforcing the cap.
    pub async fn login(
        &self,
        user_id: UserId,
        device_key: DeviceKey,
        user_agent: &str,
        ip: &str,
    ) -> AppResult<Session> {
        let now = Utc::now();

        if self.config.sweep_on_login {
            if let Some(cutoff) = self.config.stale_cutoff(now) {
                let removed = self.store.delete_sessions_before(cutoff).await?;
                if removed > 0 {
                    debug!(removed = removed, "Swept stale sessions during login");
                }
            }
        }

        let refreshing = self
            .store
            .find_session(user_id, &device_key)
            .await?
            .is_some_and(|existing| existing.is_active());

        if !refreshing {
            self.enforce_cap(user_id).await?;
        }

        let session = Session::new_active(user_id, device_key, user_agent, ip, now);
        self.store.upsert_session(&session).await?;

        info!(
            user_id = %user_id,
            device_key = %session.device_key,
            refreshed = refreshing,
            "Session opened"
        );

        Ok(session)
    }

    /// Refreshes `last_active` for a request made with an Active session.
    pub async fn heartbeat(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<Session> {
        let mut session = self
            .store
            .find_session(user_id, device_key)
            .await?
            .ok_or_else(|| AppError::authentication("Session not found"))?;

        if session.status == SessionStatus::Inactive {
            return Err(AppError::authentication("Session is inactive"));
        }

        let now = Utc::now();
        self.store
            .update_last_active(user_id, device_key, now)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError::authentication("Session not found"),
                _ => e,
            })?;

        session.last_active = now;
        Ok(session)
    }

    /// Ends the caller's own session.
    pub async fn logout(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<()> {
        self.store.mark_inactive_for_user(user_id, device_key).await?;
        info!(user_id = %user_id, device_key = %device_key, "Session logged out");
        Ok(())
    }

    /// Lets a user end one of their other sessions.
    pub async fn evict_own(
        &self,
        user_id: UserId,
        current: &DeviceKey,
        target: &DeviceKey,
    ) -> AppResult<()> {
        if current == target {
            return Err(AppError::validation(
                "Cannot evict the current session; log out instead",
            ));
        }

        self.store.mark_inactive_for_user(user_id, target).await?;

        info!(user_id = %user_id, device_key = %target, "Session evicted by owner");
        Ok(())
    }

    /// Administrative eviction of any session by device key.
    pub async fn evict_any(&self, device_key: &DeviceKey) -> AppResult<()> {
        self.store.mark_inactive(device_key).await?;
        info!(device_key = %device_key, "Session evicted by administrator");
        Ok(())
    }

    /// Active sessions of one user.
    pub async fn list_own(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        self.store.list_sessions_by_user(user_id).await
    }

    /// Active sessions system-wide.
    pub async fn list_all(&self) -> AppResult<Vec<Session>> {
        self.store.list_sessions().await
    }

    async fn enforce_cap(&self, user_id: UserId) -> AppResult<()> {
        let Some(cap) = self.config.session_cap() else {
            return Ok(());
        };

        let active = self.store.count_active_by_user(user_id).await?;
        if active < u64::from(cap) {
            return Ok(());
        }

        match self.config.overflow_strategy {
            OverflowStrategy::Deny => {
                warn!(user_id = %user_id, active = active, cap = cap, "Login denied: session cap reached");
                Err(AppError::conflict(format!(
                    "Maximum concurrent sessions ({cap}) reached. Log out of another device first."
                )))
            }
            OverflowStrategy::EvictOldest => {
                let Some(oldest) = self.store.oldest_active_by_user(user_id).await? else {
                    return Ok(());
                };

                match self
                    .store
                    .mark_inactive_for_user(user_id, &oldest.device_key)
                    .await
                {
                    Ok(()) => {
                        info!(
                            user_id = %user_id,
                            device_key = %oldest.device_key,
                            last_active = %oldest.last_active,
                            "Evicted oldest session: session cap reached"
                        );
                        Ok(())
                    }
                    // Swept or evicted concurrently; nothing left to do.
                    Err(e) if e.kind == ErrorKind::NotFound => Ok(()),
                    Err(e) => Err(e),
                }
            }
        }
    }
}
