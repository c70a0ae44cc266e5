//! Session repository trait and PostgreSQL implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use dirguard_core::result::AppResult;
use dirguard_core::types::UserId;
use dirguard_entity::session::{DeviceKey, Session, SessionStatus};

use super::db_error;

/// Persistence for device sessions keyed by (user, device).
///
/// Mutations report the number of affected rows so callers can tell a
/// missing session from a storage failure.
#[async_trait]
pub trait SessionRepository: Send + Sync + 'static {
    /// Insert a session. Fails if the (user, device) row already exists.
    async fn create_session(&self, session: &Session) -> AppResult<()>;

    /// Insert or replace the (user, device) row in one atomic write.
    async fn upsert_session(&self, session: &Session) -> AppResult<()>;

    /// Point lookup regardless of status.
    async fn get_session(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<Option<Session>>;

    /// Active sessions of one user, most recently active first.
    async fn list_sessions_by_user(&self, user_id: UserId) -> AppResult<Vec<Session>>;

    /// Active sessions of all users, most recently active first.
    async fn list_sessions(&self) -> AppResult<Vec<Session>>;

    /// Number of Active sessions of one user.
    async fn count_active_by_user(&self, user_id: UserId) -> AppResult<u64>;

    /// The Active session of one user with the smallest `last_active`.
    async fn oldest_active_by_user(&self, user_id: UserId) -> AppResult<Option<Session>>;

    /// Set `last_active` on one row.
    async fn update_last_active(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
        at: DateTime<Utc>,
    ) -> AppResult<u64>;

    /// Flip every row with this device key to Inactive, whoever owns it.
    async fn mark_inactive(&self, device_key: &DeviceKey) -> AppResult<u64>;

    /// Flip one user's row for this device to Inactive.
    async fn mark_inactive_for_user(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<u64>;

    /// Hard-delete one owned row.
    async fn delete_session(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<u64>;

    /// Hard-delete every row, whatever its status, with `last_active < cutoff`.
    async fn delete_sessions_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;

    /// Hard-delete Inactive rows, optionally only those of one user.
    async fn delete_inactive_sessions(&self, user_id: Option<UserId>) -> AppResult<u64>;

    /// Hard-delete every row with this device key, whoever owns it.
    async fn delete_session_by_id(&self, device_key: &DeviceKey) -> AppResult<u64>;
}

const SELECT_SESSION: &str =
    "SELECT user_id, device_key, last_active, status, user_agent, ip FROM sessions";

/// PostgreSQL-backed session repository.
#[derive(Debug, Clone)]
pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    /// Create a new session repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn create_session(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (user_id, device_key, last_active, status, user_agent, ip) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.user_id)
        .bind(&session.device_key)
        .bind(session.last_active)
        .bind(session.status)
        .bind(&session.user_agent)
        .bind(&session.ip)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create session", e))?;
        Ok(())
    }

    async fn upsert_session(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO sessions (user_id, device_key, last_active, status, user_agent, ip) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (user_id, device_key) DO UPDATE SET \
             last_active = EXCLUDED.last_active, status = EXCLUDED.status, \
             user_agent = EXCLUDED.user_agent, ip = EXCLUDED.ip",
        )
        .bind(session.user_id)
        .bind(&session.device_key)
        .bind(session.last_active)
        .bind(session.status)
        .bind(&session.user_agent)
        .bind(&session.ip)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to upsert session", e))?;
        Ok(())
    }

    async fn get_session(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "{SELECT_SESSION} WHERE user_id = $1 AND device_key = $2"
        ))
        .bind(user_id)
        .bind(device_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find session", e))
    }

    async fn list_sessions_by_user(&self, user_id: UserId) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "{SELECT_SESSION} WHERE user_id = $1 AND status = $2 ORDER BY last_active DESC"
        ))
        .bind(user_id)
        .bind(SessionStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list user sessions", e))
    }

    async fn list_sessions(&self) -> AppResult<Vec<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "{SELECT_SESSION} WHERE status = $1 ORDER BY last_active DESC"
        ))
        .bind(SessionStatus::Active)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("Failed to list sessions", e))
    }

    async fn count_active_by_user(&self, user_id: UserId) -> AppResult<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND status = $2")
                .bind(user_id)
                .bind(SessionStatus::Active)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| db_error("Failed to count active sessions", e))?;
        Ok(count.max(0) as u64)
    }

    async fn oldest_active_by_user(&self, user_id: UserId) -> AppResult<Option<Session>> {
        sqlx::query_as::<_, Session>(&format!(
            "{SELECT_SESSION} WHERE user_id = $1 AND status = $2 \
             ORDER BY last_active ASC LIMIT 1"
        ))
        .bind(user_id)
        .bind(SessionStatus::Active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("Failed to find oldest active session", e))
    }

    async fn update_last_active(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
        at: DateTime<Utc>,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET last_active = $3 WHERE user_id = $1 AND device_key = $2",
        )
        .bind(user_id)
        .bind(device_key)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update last activity", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_inactive(&self, device_key: &DeviceKey) -> AppResult<u64> {
        let result = sqlx::query("UPDATE sessions SET status = $2 WHERE device_key = $1")
            .bind(device_key)
            .bind(SessionStatus::Inactive)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to mark session inactive", e))?;
        Ok(result.rows_affected())
    }

    async fn mark_inactive_for_user(
        &self,
        user_id: UserId,
        device_key: &DeviceKey,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE sessions SET status = $3 WHERE user_id = $1 AND device_key = $2",
        )
        .bind(user_id)
        .bind(device_key)
        .bind(SessionStatus::Inactive)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to mark session inactive", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_session(&self, user_id: UserId, device_key: &DeviceKey) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND device_key = $2")
            .bind(user_id)
            .bind(device_key)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete session", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_sessions_before(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE last_active < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete stale sessions", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_inactive_sessions(&self, user_id: Option<UserId>) -> AppResult<u64> {
        let result = match user_id {
            Some(user_id) => {
                sqlx::query("DELETE FROM sessions WHERE status = $1 AND user_id = $2")
                    .bind(SessionStatus::Inactive)
                    .bind(user_id)
                    .execute(&self.pool)
                    .await
            }
            None => {
                sqlx::query("DELETE FROM sessions WHERE status = $1")
                    .bind(SessionStatus::Inactive)
                    .execute(&self.pool)
                    .await
            }
        }
        .map_err(|e| db_error("Failed to delete inactive sessions", e))?;
        Ok(result.rows_affected())
    }

    async fn delete_session_by_id(&self, device_key: &DeviceKey) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE device_key = $1")
            .bind(device_key)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete session", e))?;
        Ok(result.rows_affected())
    }
}
