//! Shared fixtures for auth integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use dirguard_auth::rbac::PermissionEngine;
use dirguard_auth::{AccessGuard, SessionCleanup, SessionEvictor, SessionStore, VisibilityFilter};
use dirguard_core::config::{OverflowStrategy, SessionConfig};
use dirguard_core::types::{RoleId, UserId};
use dirguard_database::{MemoryRoleRepository, MemorySessionRepository};
use dirguard_entity::{CreateRole, Permission, Role, Session, User};

/// Session services wired to an in-memory repository.
pub struct SessionHarness {
    pub repo: MemorySessionRepository,
    pub store: Arc<SessionStore>,
    pub evictor: SessionEvictor,
    pub cleanup: SessionCleanup,
}

impl SessionHarness {
    pub fn new(max_active_sessions: u32, overflow_strategy: OverflowStrategy) -> Self {
        Self::with_config(SessionConfig {
            max_active_sessions,
            overflow_strategy,
            ..SessionConfig::default()
        })
    }

    pub fn with_config(config: SessionConfig) -> Self {
        let repo = MemorySessionRepository::new();
        let store = Arc::new(SessionStore::new(Arc::new(repo.clone())));
        Self {
            evictor: SessionEvictor::new(Arc::clone(&store), config.clone()),
            cleanup: SessionCleanup::new(Arc::clone(&store), config),
            repo,
            store,
        }
    }

    /// Seeds an Active session with a fixed `last_active`.
    pub async fn seed(&self, user_id: UserId, key: &str, last_active: i64) {
        let session = Session::new_active(user_id, key.into(), "seed-agent", "127.0.0.1", at(last_active));
        self.store.upsert_session(&session).await.unwrap();
    }

    /// Device keys of the user's Active sessions, sorted.
    pub async fn active_keys(&self, user_id: UserId) -> Vec<String> {
        let mut keys: Vec<String> = self
            .store
            .list_sessions_by_user(user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.device_key.0)
            .collect();
        keys.sort();
        keys
    }
}

/// Access services over an in-memory role repository.
pub struct AccessHarness {
    pub engine: Arc<PermissionEngine>,
    pub guard: AccessGuard,
}

impl AccessHarness {
    pub fn new(roles: Vec<Role>) -> Self {
        let repo = Arc::new(MemoryRoleRepository::with_roles(roles));
        let engine = Arc::new(PermissionEngine::new(repo));
        let guard = AccessGuard::new(Arc::clone(&engine), Arc::new(VisibilityFilter::default()));
        Self { engine, guard }
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn role(name: &str, permission: Permission, base_paths: &[&str]) -> Role {
    CreateRole {
        name: name.to_string(),
        description: String::new(),
        base_paths: base_paths.iter().map(|p| p.to_string()).collect(),
        permission,
    }
    .into_role()
}

pub fn user(permission: Permission, roles: &[RoleId]) -> User {
    User {
        id: UserId::new(),
        username: "alice".to_string(),
        permission,
        roles: roles.to_vec(),
    }
}
