//! Request quota tracking for AI calls
//!
//! Sliding per-minute and per-hour windows gate how many generation
//! requests the service issues against the provider, independent of the
//! provider's own limits.

pub mod monitor;
pub mod types;

#[cfg(test)]
mod tests;

pub use monitor::QuotaMonitor;
pub use types::QuotaStats;
