//! Session storage operations wrapping the repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use dirguard_core::error::AppError;
use dirguard_core::result::AppResult;
use dirguard_core::types::UserId;
use dirguard_database::repositories::SessionRepository;
use dirguard_entity::session::{DeviceKey, Session};

/// Session CRUD over the persisted collection.
///
/// Operations aimed at one specific row report `NotFound` when it does not
/// exist; repository failures pass through untouched.
#[derive(Clone)]
pub struct SessionStore {
    /// Session repository.
    repo: Arc<dyn SessionRepository>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").finish()
    }
}

impl SessionStore {
    /// Creates a new session store.
    pub fn new(repo: Arc<dyn SessionRepository>) -> Self {
        Self { repo }
    }

    /// Inserts a new session row.
    pub async fn create_session(&self, session: &Session) -> AppResult<()> {
        self.repo.create_session(session).await
    }

    /// Inserts or replaces the (user, device) row atomically.
    pub async fn upsert_session(&self, session: &Session) -> AppResult<()> {
        self.repo.upsert_session(session).await
    }

    /// Looks up one session.
    pub async fn get_session(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<Session> {
        self.find_session(user_id, device_key)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Session '{device_key}' not found")))
    }

    /// Looks up one session, `None` if absent.
    pub async fn find_session(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<Option<Session>> {
        self.repo.get_session(user_id, device_key).await
    }

    /// Active sessions of one user.
    pub async fn list_sessions_by_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        self.repo.list_sessions_by_user(user_id).await
    }

    /// Active sessions of every user.
    pub async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        self.repo.list_sessions().await
    }

    /// Number of Active sessions of one user.
    pub async fn count_active_by_user(&self, user_id: UserId) -> AppResult<u64> {
        self.repo.count_active_by_user(user_id).await
    }

    /// The least recently active Active session of one user.
    pub async fn oldest_active_by_user(&self, user_id: UserId) -> AppResult<Option<Session>> {
        self.repo.oldest_active_by_user(user_id).await
    }

    /// Heartbeat: sets `last_active` on one row.
    pub async fn update_last_active(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
        at: DateTime<Utc>,
    ) -> AppResult<()> {
        let affected = self.repo.update_last_active(user_id, device_key, at).await?;
        require_row(affected, device_key)
    }

    /// Soft-deletes every row with this device key, across all users.
    pub async fn mark_inactive(&self, device_key: &DeviceKey) -> AppResult<()> {
        let affected = self.repo.mark_inactive(device_key).await?;
        require_row(affected, device_key)
    }

    /// Soft-deletes one user's row for this device.
    pub async fn mark_inactive_for_user(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<()> {
        let affected = self.repo.mark_inactive_for_user(user_id, device_key).await?;
        require_row(affected, device_key)
    }

    /// Hard-deletes one owned row.
    pub async fn delete_session(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<()> {
        let affected = self.repo.delete_session(user_id, device_key).await?;
        require_row(affected, device_key)
    }

    /// Hard-deletes every row, whatever its status, last active before `cutoff`.
    pub async fn delete_sessions_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        self.repo.delete_sessions_before(cutoff).await
    }

    /// Hard-deletes Inactive rows, optionally only one user's.
    pub async fn delete_inactive_sessions(&self, user_id: Option<UserId>) -> AppResult<u64> {
        self.repo.delete_inactive_sessions(user_id).await
    }

    /// Hard-deletes the row with this device key regardless of owner.
    pub async fn delete_session_by_id(&self, device_key: &DeviceKey) -> AppResult<()> {
        let affected = self.repo.delete_session_by_id(device_key).await?;
        require_row(affected, device_key)
    }
}

fn require_row(affected: u64, device_key: &DeviceKey) -> AppResult<()> {
    if affected == 0 {
        return Err(AppError::not_found(format!(
            "Session '{device_key}' not found"
        )));
    }
    Ok(())
}
