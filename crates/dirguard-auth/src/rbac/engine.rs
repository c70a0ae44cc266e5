//! Effective permission computation.
//!
//! A user's effective permission for a path is their direct grant OR-ed with
//! the grant of every assigned role that applies to that path. A role
//! applies everywhere unless it carries [`Permission::PATH_LIMIT`], in which
//! case it applies only at or below one of its base paths.
//!
//! The merge is a fold of `|` over the applicable roles, so it is
//! commutative, associative, and idempotent: reordering or repeating role
//! ids never changes the result.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, warn};

use dirguard_core::result::AppResult;
use dirguard_core::types::RoleId;
use dirguard_database::repositories::RoleRepository;
use dirguard_entity::permission::Permission;
use dirguard_entity::role::Role;
use dirguard_entity::user::User;

/// Merges a direct grant with the roles that apply to `path`.
pub fn merge_permissions<'a>(
    direct: Permission,
    roles: impl IntoIterator<Item = &'a Role>,
    path: &str,
) -> Permission {
    roles
        .into_iter()
        .filter(|role| role.applies_to(path))
        .fold(direct, |acc, role| acc | role.permission)
}

/// Resolves a user's role ids and merges their grants.
#[derive(Clone)]
pub struct PermissionEngine {
    /// Role lookup.
    roles: Arc<dyn RoleRepository>,
}

impl std::fmt::Debug for PermissionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionEngine").finish()
    }
}

impl PermissionEngine {
    /// Creates an engine that resolves roles through `roles`.
    pub fn new(roles: Arc<dyn RoleRepository>) -> Self {
        Self { roles }
    }

    /// Computes the user's effective permission for `path`.
    ///
    /// Never fails: a role id that does not resolve, whether missing or
    /// because the lookup errored, contributes nothing.
    pub async fn compute_effective_permission(&self, user: &User, path: &str) -> Permission {
        let roles = self.resolve_roles(user).await;
        let effective = merge_permissions(user.permission, &roles, path);

        debug!(
            user_id = %user.id,
            path = %path,
            permission = effective.bits(),
            "Computed effective permission"
        );

        effective
    }

    /// Returns the user's role ids that no longer resolve to a role.
    ///
    /// Unlike [`compute_effective_permission`](Self::compute_effective_permission),
    /// storage failures are reported, since a diagnostic must not guess.
    pub async fn dangling_roles(&self, user: &User) -> AppResult<Vec<RoleId>> {
        let mut dangling = Vec::new();
        for id in unique_ids(user) {
            if self.roles.get_role(id).await?.is_none() {
                dangling.push(id);
            }
        }
        Ok(dangling)
    }

    async fn resolve_roles(&self, user: &User) -> Vec<Role> {
        let mut resolved = Vec::with_capacity(user.roles.len());

        for id in unique_ids(user) {
            match self.roles.get_role(id).await {
                Ok(Some(role)) => resolved.push(role),
                Ok(None) => {
                    warn!(user_id = %user.id, role_id = %id, "Skipping dangling role reference");
                }
                Err(e) => {
                    warn!(
                        user_id = %user.id,
                        role_id = %id,
                        error = %e,
                        "Role lookup failed, skipping role"
                    );
                }
            }
        }

        resolved
    }
}

/// Role ids with duplicates removed; the merge is idempotent so each role
/// only needs one lookup.
fn unique_ids(user: &User) -> BTreeSet<RoleId> {
    user.roles.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirguard_core::types::UserId;
    use dirguard_entity::role::CreateRole;

    fn role(permission: Permission, base_paths: &[&str]) -> Role {
        CreateRole {
            name: format!("role-{}", permission.bits()),
            description: String::new(),
            base_paths: base_paths.iter().map(|p| p.to_string()).collect(),
            permission,
        }
        .into_role()
    }

    #[test]
    fn test_merge_arithmetic() {
        let editor = role(Permission::WRITE, &["/"]);
        let merged = merge_permissions(Permission::ACCESS_WITHOUT_PASSWORD, [&editor], "/any");
        assert_eq!(merged, Permission::ACCESS_WITHOUT_PASSWORD | Permission::WRITE);
    }

    #[test]
    fn test_merge_without_roles_is_direct_grant() {
        let merged = merge_permissions(Permission::COPY, std::iter::empty(), "/");
        assert_eq!(merged, Permission::COPY);
    }

    #[test]
    fn test_scoped_role_contributes_only_inside_base_paths() {
        let scoped = role(Permission::WRITE | Permission::PATH_LIMIT, &["/shared"]);

        let inside = merge_permissions(Permission::empty(), [&scoped], "/shared/x");
        assert!(inside.contains(Permission::WRITE));

        for outside in ["/shared2/x", "/private/x"] {
            let merged = merge_permissions(Permission::empty(), [&scoped], outside);
            assert_eq!(merged, Permission::empty(), "{outside}");
        }
    }

    #[test]
    fn test_merge_is_order_independent_and_idempotent() {
        let a = role(Permission::WRITE, &["/"]);
        let b = role(Permission::REMOVE | Permission::PATH_LIMIT, &["/docs"]);
        let c = role(Permission::WEBDAV_READ, &["/"]);

        let forward = merge_permissions(Permission::empty(), [&a, &b, &c], "/docs/x");
        let backward = merge_permissions(Permission::empty(), [&c, &b, &a], "/docs/x");
        let repeated = merge_permissions(Permission::empty(), [&a, &a, &b, &c, &c], "/docs/x");

        assert_eq!(forward, backward);
        assert_eq!(forward, repeated);
    }

    #[test]
    fn test_unique_ids_collapses_duplicates() {
        let id = RoleId::new();
        let user = User {
            id: UserId::new(),
            username: "alice".to_string(),
            permission: Permission::empty(),
            roles: vec![id, id, id],
        };
        assert_eq!(unique_ids(&user).len(), 1);
    }
}
