//! Caching decorator for role lookups.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::debug;

use dirguard_core::config::RoleCacheConfig;
use dirguard_core::result::AppResult;
use dirguard_core::types::RoleId;
use dirguard_database::repositories::RoleRepository;
use dirguard_entity::role::Role;

/// Wraps a [`RoleRepository`] with a moka cache keyed by role id.
///
/// Only found roles are cached, so a role created after a miss becomes
/// visible on the next lookup. Writes made through this wrapper invalidate
/// the affected entry; writes made elsewhere need [`invalidate`](Self::invalidate)
/// or expire with the configured TTL.
#[derive(Clone)]
pub struct CachedRoleRepository {
    /// The repository being cached.
    inner: Arc<dyn RoleRepository>,
    /// Roles by id.
    cache: Cache<RoleId, Role>,
}

impl std::fmt::Debug for CachedRoleRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedRoleRepository")
            .field("entries", &self.cache.entry_count())
            .finish()
    }
}

impl CachedRoleRepository {
    /// Creates a cache in front of `inner`.
    pub fn new(inner: Arc<dyn RoleRepository>, config: &RoleCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(Duration::from_secs(config.time_to_live_seconds))
            .build();

        Self { inner, cache }
    }

    /// Drops the cached copy of one role.
    pub async fn invalidate(&self, id: RoleId) {
        self.cache.invalidate(&id).await;
    }

    /// Drops every cached role.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }
}

#[async_trait]
impl RoleRepository for CachedRoleRepository {
    async fn get_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        if let Some(role) = self.cache.get(&id).await {
            debug!(role_id = %id, "Role cache hit");
            return Ok(Some(role));
        }

        let role = self.inner.get_role(id).await?;
        if let Some(ref role) = role {
            self.cache.insert(id, role.clone()).await;
        }
        Ok(role)
    }

    async fn get_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let role = self.inner.get_role_by_name(name).await?;
        if let Some(ref role) = role {
            self.cache.insert(role.id, role.clone()).await;
        }
        Ok(role)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.inner.list_roles().await
    }

    async fn create_role(&self, role: &Role) -> AppResult<()> {
        self.inner.create_role(role).await?;
        // The id may still hold a copy of a role deleted behind the cache.
        self.cache.invalidate(&role.id).await;
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        self.inner.update_role(role).await?;
        self.cache.invalidate(&role.id).await;
        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let deleted = self.inner.delete_role(id).await?;
        self.cache.invalidate(&id).await;
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dirguard_database::memory::MemoryRoleRepository;
    use dirguard_entity::permission::Permission;
    use dirguard_entity::role::CreateRole;

    fn editor() -> Role {
        CreateRole {
            name: "editor".to_string(),
            description: String::new(),
            base_paths: vec!["/".to_string()],
            permission: Permission::WRITE,
        }
        .into_role()
    }

    #[tokio::test]
    async fn test_serves_stale_copy_until_invalidated() {
        let backing = Arc::new(MemoryRoleRepository::new());
        let role = editor();
        backing.create_role(&role).await.unwrap();

        let cached = CachedRoleRepository::new(backing.clone(), &RoleCacheConfig::default());
        assert!(cached.get_role(role.id).await.unwrap().is_some());

        // Deleted behind the cache's back.
        backing.delete_role(role.id).await.unwrap();
        assert!(cached.get_role(role.id).await.unwrap().is_some());

        cached.invalidate(role.id).await;
        assert!(cached.get_role(role.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_misses_are_not_cached() {
        let backing = Arc::new(MemoryRoleRepository::new());
        let cached = CachedRoleRepository::new(backing.clone(), &RoleCacheConfig::default());
        let role = editor();

        assert!(cached.get_role(role.id).await.unwrap().is_none());
        backing.create_role(&role).await.unwrap();
        assert!(cached.get_role(role.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_through_cache_replaces_stale_copy() {
        let backing = Arc::new(MemoryRoleRepository::new());
        let cached = CachedRoleRepository::new(backing.clone(), &RoleCacheConfig::default());
        let role = editor();
        backing.create_role(&role).await.unwrap();
        cached.get_role(role.id).await.unwrap();

        backing.delete_role(role.id).await.unwrap();
        let recreated = Role {
            name: "reviewer".to_string(),
            ..role.clone()
        };
        cached.create_role(&recreated).await.unwrap();

        let fetched = cached.get_role(role.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "reviewer");
    }

    #[tokio::test]
    async fn test_update_through_cache_invalidates() {
        let backing = Arc::new(MemoryRoleRepository::new());
        let cached = CachedRoleRepository::new(backing, &RoleCacheConfig::default());
        let mut role = editor();
        cached.create_role(&role).await.unwrap();
        cached.get_role(role.id).await.unwrap();

        role.permission = Permission::WRITE | Permission::REMOVE;
        cached.update_role(&role).await.unwrap();

        let fetched = cached.get_role(role.id).await.unwrap().unwrap();
        assert!(fetched.permission.contains(Permission::REMOVE));
    }
}
