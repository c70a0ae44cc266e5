//! # dirguard-auth
//!
//! Access decisions and device session lifecycle for Dirguard.
//!
//! ## Modules
//!
//! - `rbac` — effective permission merging over roles, role lookup cache, default roles
//! - `acl` — per-directory visibility and password checks
//! - `session` — device session storage, login cap enforcement, stale-session sweeps
//!
//! Authentication itself (credentials, tokens) happens upstream; everything
//! here starts from an already-authenticated [`User`](dirguard_entity::User).

pub mod acl;
pub mod rbac;
pub mod session;

pub use acl::{AccessGuard, VisibilityFilter, can_access};
pub use rbac::{CachedRoleRepository, PermissionEngine, ensure_default_roles, merge_permissions};
pub use session::{SessionCleanup, SessionEvictor, SessionStore};
