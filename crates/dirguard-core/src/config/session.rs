//! Session lifecycle configuration.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Session lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Maximum number of Active sessions per user. `0` disables the cap.
    #[serde(default)]
    pub max_active_sessions: u32,
    /// What happens when a login would exceed the cap.
    #[serde(default)]
    pub overflow_strategy: OverflowStrategy,
    /// Sessions whose last activity is older than this are swept.
    #[serde(default = "default_stale_after_hours")]
    pub stale_after_hours: u64,
    /// Six-field cron expression for the scheduled sweep.
    #[serde(default = "default_sweep_cron")]
    pub sweep_cron: String,
    /// Also sweep stale sessions at the start of every login.
    #[serde(default)]
    pub sweep_on_login: bool,
}

impl SessionConfig {
    /// The configured cap, or `None` when unlimited.
    pub fn session_cap(&self) -> Option<u32> {
        (self.max_active_sessions > 0).then_some(self.max_active_sessions)
    }

    /// The staleness window, or `None` if it does not fit a [`TimeDelta`].
    pub fn stale_after(&self) -> Option<TimeDelta> {
        let seconds = i64::try_from(self.stale_after_hours.checked_mul(3600)?).ok()?;
        TimeDelta::try_seconds(seconds)
    }

    /// Sessions last active strictly before this instant are stale.
    ///
    /// `None` when the window reaches past the earliest representable time,
    /// in which case nothing is stale.
    pub fn stale_cutoff(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        now.checked_sub_signed(self.stale_after()?)
    }

    /// Rejects values that cannot be turned into a staleness window.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.stale_after().is_none() {
            return Err(AppError::configuration(format!(
                "session.stale_after_hours is out of range: {}",
                self.stale_after_hours
            )));
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_active_sessions: 0,
            overflow_strategy: OverflowStrategy::default(),
            stale_after_hours: default_stale_after_hours(),
            sweep_cron: default_sweep_cron(),
            sweep_on_login: false,
        }
    }
}

/// Strategy applied when a login would exceed the per-user session cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowStrategy {
    /// Reject the new login.
    Deny,
    /// Mark the least recently active session Inactive to make room.
    #[default]
    EvictOldest,
}

impl std::fmt::Display for OverflowStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OverflowStrategy::Deny => write!(f, "deny"),
            OverflowStrategy::EvictOldest => write!(f, "evict_oldest"),
        }
    }
}

fn default_stale_after_hours() -> u64 {
    24
}

fn default_sweep_cron() -> String {
    "0 */15 * * * *".to_string()
}
