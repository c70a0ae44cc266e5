//! In-memory session repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use dirguard_core::error::AppError;
use dirguard_core::result::AppResult;
use dirguard_core::types::UserId;
use dirguard_entity::session::{DeviceKey, Session, SessionStatus};

use crate::repositories::SessionRepository;

type SessionKey = (UserId, DeviceKey);

/// Session repository backed by a map behind a Tokio `RwLock`.
///
/// Every method takes the lock once, so `upsert_session` is atomic like the
/// database's conflict-resolving insert.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionKey, Session>>>,
}

impl MemorySessionRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total rows of any status.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the repository holds no rows.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

fn key_of(session: &Session) -> SessionKey {
    (session.user_id, session.device_key.clone())
}

fn sorted_by_recency(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by(|a, b| b.last_active.cmp(&a.last_active));
    sessions
}

fn retain_counting(
    sessions: &mut HashMap<SessionKey, Session>,
    mut keep: impl FnMut(&Session) -> bool,
) -> u64 {
    let before = sessions.len();
    sessions.retain(|_, session| keep(session));
    (before - sessions.len()) as u64
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        let mut sessions = self.sessions.write().await;
        let key = key_of(session);
        if sessions.contains_key(&key) {
            return Err(AppError::conflict(format!(
                "Session for device '{}' already exists",
                session.device_key
            )));
        }
        sessions.insert(key, session.clone());
        Ok(())
    }

    async fn upsert_session(&self, session: &Session) -> AppResult<()> {
        self.sessions
            .write()
            .await
            .insert(key_of(session), session.clone());
        Ok(())
    }

    async fn get_session(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(&(user_id, device_key.clone())).cloned())
    }

    async fn list_sessions_by_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sorted_by_recency(
            sessions
                .values()
                .filter(|s| s.user_id == user_id && s.is_active())
                .cloned()
                .collect(),
        ))
    }

    async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sorted_by_recency(
            sessions.values().filter(|s| s.is_active()).cloned().collect(),
        ))
    }

    async fn count_active_by_user(&self, user_id: UserId) -> AppResult<u64> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .count() as u64)
    }

    async fn oldest_active_by_user(&self, user_id: UserId) -> AppResult<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active())
            .min_by_key(|s| s.last_active)
            .cloned())
    }

    async fn update_last_active(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&(user_id, device_key.clone())) {
            Some(session) => {
                session.last_active = at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn mark_inactive(&self, device_key: &DeviceKey) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        let mut affected = 0;
        for session in sessions.values_mut() {
            if &session.device_key == device_key {
                session.status = SessionStatus::Inactive;
                affected += 1;
            }
        }
        Ok(affected)
    }

    async fn mark_inactive_for_user(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(&(user_id, device_key.clone())) {
            Some(session) => {
                session.status = SessionStatus::Inactive;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_session(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions
            .remove(&(user_id, device_key.clone()))
            .map_or(0, |_| 1))
    }

    async fn delete_sessions_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        Ok(retain_counting(&mut sessions, |s| !s.is_stale(cutoff)))
    }

    async fn delete_inactive_sessions(&self, user_id: Option<UserId>) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        Ok(retain_counting(&mut sessions, |s| {
            let in_scope = user_id.is_none_or(|uid| s.user_id == uid);
            !(in_scope && s.status == SessionStatus::Inactive)
        }))
    }

    async fn delete_session_by_id(&self, device_key: &DeviceKey) -> AppResult<u64> {
        let mut sessions = self.sessions.write().await;
        Ok(retain_counting(&mut sessions, |s| &s.device_key != device_key))
    }
}
