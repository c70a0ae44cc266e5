//! Built-in roles created on first start.

use tracing::{debug, info};

use dirguard_core::error::ErrorKind;
use dirguard_core::result::AppResult;
use dirguard_database::repositories::RoleRepository;
use dirguard_entity::permission::Permission;
use dirguard_entity::role::{CreateRole, Role};

/// Name of the built-in administrator role.
pub const ADMIN_ROLE: &str = "admin";

/// Name of the built-in guest role.
pub const GUEST_ROLE: &str = "guest";

/// Capabilities of the built-in admin role: bits 0 through 7 plus archive
/// reading and decompression.
const ADMIN_PERMISSION: u32 = 0x30FF;

/// The roles every installation starts with.
pub fn default_roles() -> Vec<CreateRole> {
    vec![
        CreateRole {
            name: ADMIN_ROLE.to_string(),
            description: "Administrator".to_string(),
            base_paths: vec!["/".to_string()],
            permission: Permission::from_bits_retain(ADMIN_PERMISSION),
        },
        CreateRole {
            name: GUEST_ROLE.to_string(),
            description: "Guest".to_string(),
            base_paths: vec!["/".to_string()],
            permission: Permission::empty(),
        },
    ]
}

/// Creates any missing built-in role and returns the ones it created.
///
/// Safe to run concurrently on several nodes: losing the race on the unique
/// name counts as already present.
pub async fn ensure_default_roles(repo: &dyn RoleRepository) -> AppResult<Vec<Role>> {
    let mut created = Vec::new();

    for template in default_roles() {
        if repo.get_role_by_name(&template.name).await?.is_some() {
            debug!(role = %template.name, "Default role already present");
            continue;
        }

        let role = template.into_role();
        match repo.create_role(&role).await {
            Ok(()) => {
                info!(role = %role.name, role_id = %role.id, "Created default role");
                created.push(role);
            }
            Err(e) if e.kind == ErrorKind::Conflict => {
                debug!(role = %role.name, "Default role created concurrently");
            }
            Err(e) => return Err(e),
        }
    }

    Ok(created)
}
