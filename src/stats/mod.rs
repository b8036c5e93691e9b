//! Relay statistics
//!
//! Passive counters updated by the broadcast relay. No exporter; callers
//! read them through the registry.

pub mod metrics;

pub use metrics::{RelayStats, RelayStatsSnapshot};
