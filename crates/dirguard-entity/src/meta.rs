//! Per-directory policy record.

use serde::{Deserialize, Serialize};

/// Hiding and password policy attached to a directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Directory the policy is configured on.
    pub path: String,
    /// Newline-separated regex patterns matched against entry names.
    #[serde(default)]
    pub hide: String,
    /// Whether `hide` also governs every directory below `path`.
    #[serde(default)]
    pub h_sub: bool,
    /// Access password; empty means no password.
    #[serde(default)]
    pub password: String,
    /// Whether `password` also gates every path below `path`.
    #[serde(default)]
    pub p_sub: bool,
}

impl Meta {
    /// Iterates the hide patterns, skipping blank lines.
    pub fn hide_patterns(&self) -> impl Iterator<Item = &str> {
        self.hide
            .split('\n')
            .map(|pattern| pattern.trim_end_matches('\r'))
            .filter(|pattern| !pattern.trim().is_empty())
    }
}
