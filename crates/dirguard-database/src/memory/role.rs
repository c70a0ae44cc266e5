//! In-memory role repository.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use dirguard_core::error::AppError;
use dirguard_core::result::AppResult;
use dirguard_core::types::RoleId;
use dirguard_entity::role::Role;

use crate::repositories::RoleRepository;

/// Role repository backed by a map behind a Tokio `RwLock`.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoleRepository {
    roles: Arc<RwLock<HashMap<RoleId, Role>>>,
}

impl MemoryRoleRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-populated with `roles`.
    pub fn with_roles(roles: impl IntoIterator<Item = Role>) -> Self {
        let map = roles.into_iter().map(|role| (role.id, role)).collect();
        Self {
            roles: Arc::new(RwLock::new(map)),
        }
    }
}

fn name_taken(roles: &HashMap<RoleId, Role>, name: &str, except: RoleId) -> bool {
    roles
        .values()
        .any(|existing| existing.name == name && existing.id != except)
}

#[async_trait]
impl RoleRepository for MemoryRoleRepository {
    async fn get_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        Ok(self.roles.read().await.get(&id).cloned())
    }

    async fn get_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let roles = self.roles.read().await;
        Ok(roles.values().find(|role| role.name == name).cloned())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.read().await.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn create_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if roles.contains_key(&role.id) {
            return Err(AppError::conflict(format!("Role {} already exists", role.id)));
        }
        if name_taken(&roles, &role.name, role.id) {
            return Err(AppError::conflict(format!(
                "Role name '{}' already exists",
                role.name
            )));
        }
        roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let mut roles = self.roles.write().await;
        if !roles.contains_key(&role.id) {
            return Err(AppError::not_found(format!("Role {} not found", role.id)));
        }
        if name_taken(&roles, &role.name, role.id) {
            return Err(AppError::conflict(format!(
                "Role name '{}' already exists",
                role.name
            )));
        }
        roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        Ok(self.roles.write().await.remove(&id).is_some())
    }
}
