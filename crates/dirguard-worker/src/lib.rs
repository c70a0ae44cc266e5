//! Scheduled maintenance for Dirguard.
//!
//! Currently a single cron job: the stale-session sweep.

pub mod scheduler;

pub use scheduler::SweepScheduler;
