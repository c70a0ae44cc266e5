//! # dirguard-core
//!
//! Core crate for Dirguard. Contains configuration schemas, typed
//! identifiers, slash-separated path algebra, and the unified error system.
//!
//! This crate has **no** internal dependencies on other Dirguard crates.

pub mod config;
pub mod error;
pub mod path;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
