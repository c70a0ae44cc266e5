//! Combined listing and access decision for one request.

use std::sync::Arc;

use tracing::debug;

use dirguard_entity::meta::Meta;
use dirguard_entity::permission::Permission;
use dirguard_entity::user::User;

use crate::rbac::PermissionEngine;

use super::password::can_access;
use super::visibility::VisibilityFilter;

/// Answers "may this user see and open this path" in one call.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    /// Effective permission computation.
    engine: Arc<PermissionEngine>,
    /// Hide pattern evaluation.
    visibility: Arc<VisibilityFilter>,
}

impl AccessGuard {
    /// Creates a guard from its collaborators.
    pub fn new(engine: Arc<PermissionEngine>, visibility: Arc<VisibilityFilter>) -> Self {
        Self { engine, visibility }
    }

    /// The user's effective permission for `path`.
    pub async fn effective_permission(&self, user: &User, path: &str) -> Permission {
        self.engine.compute_effective_permission(user, path).await
    }

    /// Whether `path` is listed for `user` under `meta`.
    pub async fn is_visible(&self, user: &User, meta: Option<&Meta>, path: &str) -> bool {
        let perm = self.effective_permission(user, path).await;
        self.visibility.is_visible(meta, path, perm)
    }

    /// Whether `user` may open `path`: it must not be hidden from them, and
    /// any Meta password guarding it must match `password`.
    pub async fn can_access(
        &self,
        user: &User,
        meta: Option<&Meta>,
        path: &str,
        password: &str,
    ) -> bool {
        let perm = self.effective_permission(user, path).await;

        if !self.visibility.is_visible(meta, path, perm) {
            debug!(user_id = %user.id, path = %path, "Access denied: entry is hidden");
            return false;
        }

        let allowed = can_access(meta, path, password, perm);
        if !allowed {
            debug!(user_id = %user.id, path = %path, "Access denied: password mismatch");
        }
        allowed
    }
}
