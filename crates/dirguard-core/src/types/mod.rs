//! Shared value types used across crate boundaries.

pub mod id;

pub use id::{RoleId, UserId};
