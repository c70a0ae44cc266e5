//! # dirguard-entity
//!
//! Domain entity models for Dirguard. Roles and sessions are database rows
//! and derive `sqlx::FromRow`; users and per-directory metas are snapshots
//! handed in by the caller.

pub mod meta;
pub mod permission;
pub mod role;
pub mod session;
pub mod user;

pub use meta::Meta;
pub use permission::{Permission, has_permission};
pub use role::{CreateRole, Role};
pub use session::{DeviceKey, Session, SessionStatus};
pub use user::User;
