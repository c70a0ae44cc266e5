//! Per-directory access checks driven by [`Meta`](dirguard_entity::Meta) records.

pub mod guard;
pub mod password;
pub mod visibility;

pub use guard::AccessGuard;
pub use password::{can_access, requires_password};
pub use visibility::VisibilityFilter;
