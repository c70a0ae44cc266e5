//! Device session entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dirguard_core::types::UserId;

/// Opaque identifier of one logged-in device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct DeviceKey(pub String);

impl DeviceKey {
    /// Wraps a raw device key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the raw key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DeviceKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

/// Stored session status.
///
/// A deleted session has no row; there is no way back from `Inactive`
/// except a fresh login that overwrites the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "session_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Counts toward the per-user cap.
    Active,
    /// Logged out or evicted, kept until swept.
    Inactive,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// One row per (user, device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Session {
    /// Owning user.
    pub user_id: UserId,
    /// Device the session belongs to; unique per user.
    pub device_key: DeviceKey,
    /// Last login or heartbeat.
    pub last_active: DateTime<Utc>,
    /// Current status.
    pub status: SessionStatus,
    /// User-Agent header at login.
    pub user_agent: String,
    /// Client IP at login.
    pub ip: String,
}

impl Session {
    /// Builds a fresh Active session.
    pub fn new_active(
        user_id: UserId,
        device_key: DeviceKey,
        user_agent: impl Into<String>,
        ip: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            device_key,
            last_active: now,
            status: SessionStatus::Active,
            user_agent: user_agent.into(),
            ip: ip.into(),
        }
    }

    /// Whether the session counts toward the per-user cap.
    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Whether the session's last activity is strictly before `cutoff`.
    pub fn is_stale(&self, cutoff: DateTime<Utc>) -> bool {
        self.last_active < cutoff
    }
}
