//! In-memory repositories guarded by Tokio locks.
//!
//! Suitable for single-node deployments and tests. Semantics match the
//! PostgreSQL repositories, including name uniqueness for roles and
//! (user, device) uniqueness for sessions.

pub mod role;
pub mod session;

pub use role::MemoryRoleRepository;
pub use session::MemorySessionRepository;
