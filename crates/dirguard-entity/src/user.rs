//! User snapshot consumed by the permission engine.

use serde::{Deserialize, Serialize};

use dirguard_core::types::{RoleId, UserId};

use crate::permission::Permission;

/// An authenticated user as seen by access checks.
///
/// Users are owned by an external account service; only the fields that
/// feed permission evaluation are modelled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Direct grant.
    pub permission: Permission,
    /// Assigned role ids. Order is irrelevant and duplicates are tolerated.
    #[serde(default)]
    pub roles: Vec<RoleId>,
}
