//! # dirguard-database
//!
//! Repository traits for roles and sessions, their PostgreSQL
//! implementations, and in-memory implementations with identical semantics
//! for single-node deployments and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
pub use memory::{MemoryRoleRepository, MemorySessionRepository};
pub use repositories::{PgRoleRepository, PgSessionRepository, RoleRepository, SessionRepository};
