//! Device session lifecycle: storage, login cap enforcement, and sweeps.

pub mod cleanup;
pub mod evictor;
pub mod store;

pub use cleanup::SessionCleanup;
pub use evictor::SessionEvictor;
pub use store::SessionStore;
