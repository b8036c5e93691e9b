//! Peer registry implementation
//!
//! The central registry that tracks all live connections and relays each
//! sender's bytes to every other peer.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use crate::stats::RelayStats;

use super::config::RegistryConfig;
use super::entry::{PeerEntry, PeerWriter};
use super::error::RegistryError;
use super::payload::{Payload, PeerId};

/// Central registry for all live peer connections
///
/// Thread-safe via `RwLock`. Mutations and snapshots serialize against each
/// other; the guard is released before any delivery I/O starts.
pub struct PeerRegistry {
    /// Map of peer id to entry
    peers: RwLock<HashMap<PeerId, PeerEntry>>,

    /// Next identifier to hand out; ids are never reused
    next_peer_id: AtomicU64,

    /// Configuration
    config: RegistryConfig,

    /// Relay counters
    stats: RelayStats,
}

impl PeerRegistry {
    /// Create a new peer registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new peer registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            peers: RwLock::new(HashMap::new()),
            next_peer_id: AtomicU64::new(1),
            config,
            stats: RelayStats::new(),
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Get the relay counters
    pub fn stats(&self) -> &RelayStats {
        &self.stats
    }

    /// Register a new connection
    ///
    /// Takes ownership of the connection's write half, allocates the next
    /// identifier, and inserts the entry under the write guard. Returns the
    /// inserted entry; the caller hands it to the connection's worker, which
    /// uses it for teardown.
    ///
    /// Fails with `CapacityExceeded` when a bound is configured and reached.
    /// The rejected write half is dropped here, closing that direction, and
    /// the caller is expected to drop the read half as well.
    pub async fn register(
        &self,
        writer: PeerWriter,
        peer_addr: Option<SocketAddr>,
    ) -> Result<PeerEntry, RegistryError> {
        let mut peers = self.peers.write().await;

        let max = self.config.max_peers;
        if max > 0 && peers.len() >= max {
            return Err(RegistryError::CapacityExceeded { max });
        }

        let id = self.next_peer_id.fetch_add(1, Ordering::Relaxed);
        let entry = PeerEntry::new(id, writer, peer_addr);
        peers.insert(id, entry.clone());

        tracing::info!(
            peer_id = id,
            peer = ?peer_addr,
            peers = peers.len(),
            "Peer registered"
        );

        Ok(entry)
    }

    /// Unregister a connection
    ///
    /// Idempotent: unregistering an identifier that is already absent is a
    /// no-op. Only the connection's owning worker calls this, after it has
    /// shut the stream down.
    pub async fn unregister(&self, id: PeerId) {
        let mut peers = self.peers.write().await;

        if peers.remove(&id).is_some() {
            tracing::info!(peer_id = id, peers = peers.len(), "Peer unregistered");
        }
    }

    /// Snapshot the current peers in ascending id order
    ///
    /// Taken under the guard; the returned entries are used for broadcast
    /// iteration after the guard is released. Sorting makes fan-out order
    /// deterministic.
    pub async fn snapshot(&self) -> Vec<PeerEntry> {
        let peers = self.peers.read().await;

        let mut entries: Vec<PeerEntry> = peers.values().cloned().collect();
        entries.sort_unstable_by_key(|entry| entry.id);
        entries
    }

    /// Number of currently registered peers
    pub async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }

    /// Relay a payload to every registered peer except its sender
    ///
    /// Best-effort, at-most-once per recipient: a failed write is logged,
    /// counted, and skipped; the recipient's own worker notices the broken
    /// connection on its next read and unregisters itself. No queueing, no
    /// retries. Returns the number of successful deliveries.
    pub async fn broadcast(&self, payload: Payload) -> usize {
        // Snapshot under the guard, deliver outside it. Holding the guard
        // across a write would let one unresponsive peer stall every
        // register/unregister on the server.
        let peers = self.snapshot().await;

        let mut delivered = 0;
        for entry in &peers {
            if entry.id == payload.sender {
                continue;
            }

            match entry.send(&payload.data).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    self.stats.record_delivery_failure();
                    tracing::debug!(
                        peer_id = entry.id,
                        sender = payload.sender,
                        error = %e,
                        "Broadcast delivery failed"
                    );
                }
            }
        }

        self.stats.record_relay(payload.len() as u64);

        tracing::trace!(
            sender = payload.sender,
            bytes = payload.len(),
            delivered = delivered,
            "Payload relayed"
        );

        delivered
    }
}

impl Default for PeerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use bytes::Bytes;
    use tokio::io::{AsyncReadExt, DuplexStream};

    use super::*;

    /// Register an in-memory peer, returning its entry and the remote end
    /// that observes what the peer would receive.
    async fn add_peer(registry: &PeerRegistry) -> (PeerEntry, DuplexStream) {
        let (local, remote) = tokio::io::duplex(1024);
        let entry = registry.register(Box::new(local), None).await.unwrap();
        (entry, remote)
    }

    async fn read_chunk(stream: &mut DuplexStream, len: usize) -> Vec<u8> {
        let mut buf = vec![0u8; len];
        stream.read_exact(&mut buf).await.unwrap();
        buf
    }

    #[tokio::test]
    async fn test_register_assigns_unique_ids() {
        let registry = PeerRegistry::new();

        let (a, _ra) = add_peer(&registry).await;
        let (b, _rb) = add_peer(&registry).await;

        assert_ne!(a.id, b.id);
        assert_eq!(registry.peer_count().await, 2);
    }

    #[tokio::test]
    async fn test_unregister_is_idempotent() {
        let registry = PeerRegistry::new();
        let (entry, _remote) = add_peer(&registry).await;

        registry.unregister(entry.id).await;
        assert_eq!(registry.peer_count().await, 0);

        // Absent id: no-op, no panic
        registry.unregister(entry.id).await;
        registry.unregister(9999).await;
        assert_eq!(registry.peer_count().await, 0);
    }

    #[tokio::test]
    async fn test_capacity_bound_rejects_excess() {
        let registry = PeerRegistry::with_config(RegistryConfig::default().max_peers(2));

        let (_a, _ra) = add_peer(&registry).await;
        let (_b, _rb) = add_peer(&registry).await;

        let (local, _remote) = tokio::io::duplex(64);
        let result = registry.register(Box::new(local), None).await;

        assert_eq!(result.unwrap_err(), RegistryError::CapacityExceeded { max: 2 });
        assert_eq!(registry.peer_count().await, 2);
    }

    #[tokio::test]
    async fn test_broadcast_skips_sender() {
        let registry = PeerRegistry::new();

        let (c1, mut r1) = add_peer(&registry).await;
        let (_c2, mut r2) = add_peer(&registry).await;
        let (_c3, mut r3) = add_peer(&registry).await;

        let delivered = registry
            .broadcast(Payload::new(c1.id, Bytes::from_static(b"hello\n")))
            .await;
        assert_eq!(delivered, 2);

        assert_eq!(read_chunk(&mut r2, 6).await, b"hello\n");
        assert_eq!(read_chunk(&mut r3, 6).await, b"hello\n");

        // The sender must not see its own bytes
        let mut buf = [0u8; 1];
        let echo = tokio::time::timeout(Duration::from_millis(50), r1.read(&mut buf)).await;
        assert!(echo.is_err(), "sender received its own broadcast");
    }

    #[tokio::test]
    async fn test_broken_recipient_does_not_block_others() {
        let registry = PeerRegistry::new();

        let (sender, _rs) = add_peer(&registry).await;
        let (_broken, broken_remote) = add_peer(&registry).await;
        let (_healthy, mut healthy_remote) = add_peer(&registry).await;

        // Simulate a recipient whose connection died out from under it
        drop(broken_remote);

        let delivered = registry
            .broadcast(Payload::new(sender.id, Bytes::from_static(b"ping\n")))
            .await;

        assert_eq!(delivered, 1);
        assert_eq!(read_chunk(&mut healthy_remote, 5).await, b"ping\n");
        assert_eq!(registry.stats().delivery_failures(), 1);
    }

    #[tokio::test]
    async fn test_unregistered_peer_gets_no_further_deliveries() {
        let registry = PeerRegistry::new();

        let (sender, _rs) = add_peer(&registry).await;
        let (gone, mut gone_remote) = add_peer(&registry).await;
        let (_stays, mut stays_remote) = add_peer(&registry).await;

        registry.unregister(gone.id).await;
        assert_eq!(registry.peer_count().await, 2);

        let delivered = registry
            .broadcast(Payload::new(sender.id, Bytes::from_static(b"x")))
            .await;
        assert_eq!(delivered, 1);
        assert_eq!(read_chunk(&mut stays_remote, 1).await, b"x");

        let mut buf = [0u8; 1];
        let leak = tokio::time::timeout(Duration::from_millis(50), gone_remote.read(&mut buf)).await;
        assert!(leak.is_err(), "unregistered peer still received a broadcast");
    }

    #[tokio::test]
    async fn test_snapshot_is_id_ordered() {
        let registry = PeerRegistry::new();

        let mut remotes = Vec::new();
        for _ in 0..5 {
            let (_entry, remote) = add_peer(&registry).await;
            remotes.push(remote);
        }

        let snapshot = registry.snapshot().await;
        let ids: Vec<PeerId> = snapshot.iter().map(|e| e.id).collect();
        let mut sorted = ids.clone();
        sorted.sort_unstable();

        assert_eq!(ids, sorted);
        assert_eq!(ids.len(), 5);
    }

    #[tokio::test]
    async fn test_concurrent_register_unregister() {
        let registry = Arc::new(PeerRegistry::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let registry = Arc::clone(&registry);
            handles.push(tokio::spawn(async move {
                let (local, remote) = tokio::io::duplex(64);
                let entry = registry.register(Box::new(local), None).await.unwrap();
                // Half the peers churn straight back out
                if i % 2 == 0 {
                    registry.unregister(entry.id).await;
                    None
                } else {
                    Some((entry.id, remote))
                }
            }));
        }

        let mut ids = HashSet::new();
        let mut remotes = Vec::new();
        for handle in handles {
            if let Some((id, remote)) = handle.await.unwrap() {
                assert!(ids.insert(id), "duplicate peer id handed out");
                remotes.push(remote);
            }
        }

        assert_eq!(registry.peer_count().await, remotes.len());

        // Every snapshot entry must still be writable (no dangling peers)
        for entry in registry.snapshot().await {
            entry.send(&Bytes::from_static(b".")).await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_stats_reflect_relayed_traffic() {
        let registry = PeerRegistry::new();

        let (sender, _rs) = add_peer(&registry).await;
        let (_peer, mut remote) = add_peer(&registry).await;

        registry
            .broadcast(Payload::new(sender.id, Bytes::from_static(b"hello\n")))
            .await;
        registry
            .broadcast(Payload::new(sender.id, Bytes::from_static(b"hi\n")))
            .await;

        assert_eq!(read_chunk(&mut remote, 9).await, b"hello\nhi\n");
        assert_eq!(registry.stats().payloads_relayed(), 2);
        assert_eq!(registry.stats().bytes_relayed(), 9);
        assert_eq!(registry.stats().delivery_failures(), 0);
    }
}
