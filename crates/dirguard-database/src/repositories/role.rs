//! Role repository trait and PostgreSQL implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use dirguard_core::error::AppError;
use dirguard_core::result::AppResult;
use dirguard_core::types::RoleId;
use dirguard_entity::role::Role;

use super::db_error;

/// Lookup and administrative access to roles.
///
/// Lookups return `Ok(None)` for a missing role; `Err` is reserved for
/// storage failures.
#[async_trait]
pub trait RoleRepository: Send + Sync + 'static {
    /// Find a role by id.
    async fn get_role(&self, id: RoleId) -> AppResult<Option<Role>>;

    /// Find a role by its unique name.
    async fn get_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// List all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Insert a role. A duplicate name fails with `Conflict`.
    async fn create_role(&self, role: &Role) -> AppResult<()>;

    /// Replace an existing role. Fails with `NotFound` if the id is unknown
    /// and `Conflict` if the new name is taken.
    async fn update_role(&self, role: &Role) -> AppResult<()>;

    /// Delete a role. Returns `true` if a row was removed.
    ///
    /// Users referencing the role keep the dangling id; permission merging
    /// skips it.
    async fn delete_role(&self, id: RoleId) -> AppResult<bool>;
}

const SELECT_ROLE: &str = "SELECT id, name, description, base_paths, permission FROM roles";

/// PostgreSQL-backed role repository.
#[derive(Debug, Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new role repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    async fn get_role(&self, id: RoleId) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get role", e))
    }

    async fn get_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| db_error("Failed to get role by name", e))
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        sqlx::query_as::<_, Role>(&format!("{SELECT_ROLE} ORDER BY name"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| db_error("Failed to list roles", e))
    }

    async fn create_role(&self, role: &Role) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO roles (id, name, description, base_paths, permission) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.base_paths)
        .bind(i32::from(role.permission))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to create role", e))?;
        Ok(())
    }

    async fn update_role(&self, role: &Role) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE roles SET name = $2, description = $3, base_paths = $4, permission = $5 \
             WHERE id = $1",
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(&role.base_paths)
        .bind(i32::from(role.permission))
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("Failed to update role", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Role {} not found", role.id)));
        }
        Ok(())
    }

    async fn delete_role(&self, id: RoleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("Failed to delete role", e))?;
        Ok(result.rows_affected() > 0)
    }
}
