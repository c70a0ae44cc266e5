//! Role entity: a named permission template bound to users by id.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use dirguard_core::path::is_sub_path;
use dirguard_core::types::RoleId;

use crate::permission::Permission;

/// A permission template that users reference by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Role {
    /// Unique role identifier.
    pub id: RoleId,
    /// Globally unique role name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Path prefixes the role is scoped to when [`Permission::PATH_LIMIT`] is set.
    pub base_paths: Vec<String>,
    /// Granted capabilities, including the path-limit toggle.
    #[sqlx(try_from = "i32")]
    pub permission: Permission,
}

impl Role {
    /// Whether the role is scoped to its base paths.
    pub fn check_path_limit(&self) -> bool {
        self.permission.contains(Permission::PATH_LIMIT)
    }

    /// Whether the role's grant applies to `path`.
    ///
    /// Unscoped roles apply everywhere. Scoped roles apply only at or below
    /// one of their base paths.
    pub fn applies_to(&self, path: &str) -> bool {
        !self.check_path_limit() || self.base_paths.iter().any(|base| is_sub_path(base, path))
    }
}

/// Data required to create a new role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRole {
    /// Role name, unique across all roles.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Path prefixes for scoped roles.
    pub base_paths: Vec<String>,
    /// Granted capabilities.
    pub permission: Permission,
}

impl CreateRole {
    /// Materializes the role with a fresh id.
    pub fn into_role(self) -> Role {
        Role {
            id: RoleId::new(),
            name: self.name,
            description: self.description,
            base_paths: self.base_paths,
            permission: self.permission,
        }
    }
}
