//! Role-based permission merging.

pub mod cache;
pub mod defaults;
pub mod engine;

pub use cache::CachedRoleRepository;
pub use defaults::{ADMIN_ROLE, GUEST_ROLE, default_roles, ensure_default_roles};
pub use engine::{PermissionEngine, merge_permissions};
