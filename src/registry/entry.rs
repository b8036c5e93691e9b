//! Peer entry type
//!
//! This module defines the per-connection handle stored in the registry.
//!
//! Ownership is split at accept time: the connection's read half is moved
//! into its worker, which owns it exclusively; the write half lands here,
//! shared between the worker (for teardown) and the broadcast relay (for
//! delivery).

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::payload::PeerId;

/// Write half of a registered connection
///
/// Boxed so the registry can hold TCP write halves in production and
/// in-memory transports in tests.
pub type PeerWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Entry for a single live connection in the registry
///
/// Cloning is cheap; clones share the same underlying write half.
#[derive(Clone)]
pub struct PeerEntry {
    /// Unique connection identifier
    pub id: PeerId,

    /// Remote peer address, when the transport has one
    pub peer_addr: Option<SocketAddr>,

    /// When the connection was registered
    pub registered_at: Instant,

    /// Shared write half, locked per delivery
    writer: Arc<Mutex<PeerWriter>>,
}

impl PeerEntry {
    /// Create a new entry taking ownership of the connection's write half
    pub(super) fn new(id: PeerId, writer: PeerWriter, peer_addr: Option<SocketAddr>) -> Self {
        Self {
            id,
            peer_addr,
            registered_at: Instant::now(),
            writer: Arc::new(Mutex::new(writer)),
        }
    }

    /// Write one chunk to this peer
    ///
    /// Holds only this peer's writer lock, never the registry guard, so a
    /// slow or dead recipient cannot stall anyone else.
    pub async fn send(&self, data: &Bytes) -> std::io::Result<()> {
        let mut writer = self.writer.lock().await;
        writer.write_all(data).await?;
        writer.flush().await
    }

    /// Shut down the write half
    ///
    /// Called by the owning worker on teardown, before the entry is
    /// unregistered.
    pub async fn shutdown(&self) -> std::io::Result<()> {
        self.writer.lock().await.shutdown().await
    }
}

impl std::fmt::Debug for PeerEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerEntry")
            .field("id", &self.id)
            .field("peer_addr", &self.peer_addr)
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}
