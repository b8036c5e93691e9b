//! Counters for relay traffic

use std::sync::atomic::{AtomicU64, Ordering};

/// Relay-level counters
///
/// Updated by the broadcast relay, shared through the registry. All loads
/// and stores are relaxed; these are informational counters, not
/// synchronization points.
#[derive(Debug, Default)]
pub struct RelayStats {
    /// Payloads relayed (one per broadcast call)
    payloads_relayed: AtomicU64,
    /// Total payload bytes relayed
    bytes_relayed: AtomicU64,
    /// Per-recipient delivery failures skipped by the relay
    delivery_failures: AtomicU64,
}

impl RelayStats {
    /// Create a new counter set
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one relayed payload of `bytes` length
    pub(crate) fn record_relay(&self, bytes: u64) {
        self.payloads_relayed.fetch_add(1, Ordering::Relaxed);
        self.bytes_relayed.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Record one skipped recipient
    pub(crate) fn record_delivery_failure(&self) {
        self.delivery_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Payloads relayed so far
    pub fn payloads_relayed(&self) -> u64 {
        self.payloads_relayed.load(Ordering::Relaxed)
    }

    /// Payload bytes relayed so far
    pub fn bytes_relayed(&self) -> u64 {
        self.bytes_relayed.load(Ordering::Relaxed)
    }

    /// Delivery failures so far
    pub fn delivery_failures(&self) -> u64 {
        self.delivery_failures.load(Ordering::Relaxed)
    }

    /// Read all counters at once
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            payloads_relayed: self.payloads_relayed(),
            bytes_relayed: self.bytes_relayed(),
            delivery_failures: self.delivery_failures(),
        }
    }
}

/// Point-in-time copy of the relay counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayStatsSnapshot {
    /// Payloads relayed
    pub payloads_relayed: u64,
    /// Payload bytes relayed
    pub bytes_relayed: u64,
    /// Per-recipient delivery failures
    pub delivery_failures: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = RelayStats::new();

        stats.record_relay(6);
        stats.record_relay(3);
        stats.record_delivery_failure();

        assert_eq!(stats.payloads_relayed(), 2);
        assert_eq!(stats.bytes_relayed(), 9);
        assert_eq!(stats.delivery_failures(), 1);
    }

    #[test]
    fn test_snapshot_copies_all_counters() {
        let stats = RelayStats::new();
        stats.record_relay(10);

        let snapshot = stats.snapshot();

        assert_eq!(
            snapshot,
            RelayStatsSnapshot {
                payloads_relayed: 1,
                bytes_relayed: 10,
                delivery_failures: 0,
            }
        );
    }
}
