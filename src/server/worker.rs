//! Per-connection worker
//!
//! Each accepted connection gets exactly one worker task. The worker owns
//! the connection's read half, loops reading inbound chunks, and requests
//! one broadcast per successful read. Reads and relay calls are strictly
//! sequential within one worker; there is no pipelining for a single
//! connection.
//!
//! Teardown is the worker's job alone: on end-of-stream or read error it
//! shuts the stream down, removes its own registry entry, and terminates.
//! No other task ever removes a live worker's entry.

use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::registry::{Payload, PeerEntry, PeerRegistry};

/// Connection lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerState {
    /// Registered, worker reading
    Active,
    /// Stream ended or errored, removal in progress
    Closing,
    /// Removed from the registry, resources released
    Closed,
}

/// Worker driving one connection's receive loop
pub struct ConnectionWorker<R> {
    /// Registry entry for this connection; also the teardown handle for
    /// the shared write half
    entry: PeerEntry,

    /// Exclusively owned read half
    reader: R,

    /// Shared registry, used for broadcast and self-removal
    registry: Arc<PeerRegistry>,

    /// Lifecycle state
    state: PeerState,

    /// Capacity hint for each read
    read_buffer_size: usize,
}

impl<R: AsyncRead + Unpin> ConnectionWorker<R> {
    /// Create a worker for a freshly registered connection
    ///
    /// The read half is moved into the worker's exclusive ownership here;
    /// the entry's write half stays shared with the broadcast relay.
    pub fn new(
        entry: PeerEntry,
        reader: R,
        registry: Arc<PeerRegistry>,
        read_buffer_size: usize,
    ) -> Self {
        Self {
            entry,
            reader,
            registry,
            state: PeerState::Active,
            read_buffer_size,
        }
    }

    /// Current lifecycle state
    pub fn state(&self) -> PeerState {
        self.state
    }

    /// Identifier of the connection this worker drives
    pub fn peer_id(&self) -> crate::registry::PeerId {
        self.entry.id
    }

    /// Run the receive loop until the connection ends, then tear down
    ///
    /// Never returns an error: every failure on this connection is
    /// absorbed here and ends only this worker.
    pub async fn run(&mut self) {
        let mut buf = BytesMut::with_capacity(self.read_buffer_size);

        while self.state == PeerState::Active {
            match self.reader.read_buf(&mut buf).await {
                Ok(0) => {
                    tracing::debug!(peer_id = self.entry.id, "Peer closed connection");
                    self.state = PeerState::Closing;
                }
                Ok(n) => {
                    let chunk = buf.split().freeze();
                    tracing::trace!(peer_id = self.entry.id, bytes = n, "Chunk received");

                    // Exactly one relay call per successful read, completed
                    // before the next read is issued
                    self.registry
                        .broadcast(Payload::new(self.entry.id, chunk))
                        .await;
                }
                Err(e) => {
                    tracing::debug!(peer_id = self.entry.id, error = %e, "Read failed");
                    self.state = PeerState::Closing;
                }
            }
        }

        self.close().await;
    }

    /// Close the stream, unregister, and reach the terminal state
    async fn close(&mut self) {
        debug_assert_eq!(self.state, PeerState::Closing);

        // The stream may already be dead; a failed shutdown changes nothing
        if let Err(e) = self.entry.shutdown().await {
            tracing::trace!(peer_id = self.entry.id, error = %e, "Shutdown failed");
        }

        self.registry.unregister(self.entry.id).await;
        self.state = PeerState::Closed;

        tracing::debug!(peer_id = self.entry.id, "Worker terminated");
    }
}
