//! Relay server listener
//!
//! Handles the TCP accept loop: admission through the registry, then one
//! spawned worker per connection.
//!
//! There is no idle timeout or liveness probe. A peer that stops reading
//! but keeps its connection open retains its registry slot until either
//! endpoint closes the stream; that is a documented property of the
//! protocol, not an oversight.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};

use crate::error::Result;
use crate::registry::PeerRegistry;
use crate::server::config::ServerConfig;
use crate::server::worker::ConnectionWorker;

/// Broadcast relay server
pub struct RelayServer {
    config: ServerConfig,
    registry: Arc<PeerRegistry>,
}

impl RelayServer {
    /// Create a new server with the given configuration
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(PeerRegistry::with_config(config.registry_config()));
        Self { config, registry }
    }

    /// Get a reference to the peer registry
    pub fn registry(&self) -> &Arc<PeerRegistry> {
        &self.registry
    }

    /// Get the configured bind address
    pub fn bind_addr(&self) -> SocketAddr {
        self.config.bind_addr
    }

    /// Run the server
    ///
    /// Binds the listening socket and accepts until an unrecoverable
    /// listener failure. A bind failure is fatal and returned immediately.
    pub async fn run(&self) -> Result<()> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Relay server listening");

        self.accept_loop(&listener).await
    }

    /// Run the server with graceful shutdown
    ///
    /// Accepts until the `shutdown` future completes or the listener fails.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        tracing::info!(addr = %self.config.bind_addr, "Relay server listening");

        tokio::select! {
            _ = shutdown => {
                tracing::info!("Shutdown signal received");
                Ok(())
            }
            result = self.accept_loop(&listener) => result,
        }
    }

    async fn accept_loop(&self, listener: &TcpListener) -> Result<()> {
        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    self.handle_connection(socket, peer_addr).await;
                }
                Err(e) if is_transient_accept_error(&e) => {
                    tracing::error!(error = %e, "Failed to accept connection");
                }
                Err(e) => {
                    // The listening socket itself is broken
                    tracing::error!(error = %e, "Listener failed");
                    return Err(e.into());
                }
            }
        }
    }

    async fn handle_connection(&self, socket: TcpStream, peer_addr: SocketAddr) {
        if self.config.tcp_nodelay {
            if let Err(e) = socket.set_nodelay(true) {
                tracing::debug!(peer = %peer_addr, error = %e, "Failed to set TCP_NODELAY");
            }
        }

        // The worker takes the read half; the registry holds the write half
        let (reader, writer) = socket.into_split();

        let entry = match self.registry.register(Box::new(writer), Some(peer_addr)).await {
            Ok(entry) => entry,
            Err(e) => {
                // Dropping both halves closes the rejected connection; the
                // acceptor itself keeps going
                tracing::warn!(peer = %peer_addr, error = %e, "Connection rejected");
                return;
            }
        };

        tracing::debug!(peer_id = entry.id, peer = %peer_addr, "New connection");

        let registry = Arc::clone(&self.registry);
        let read_buffer_size = self.config.read_buffer_size;

        tokio::spawn(async move {
            let mut worker = ConnectionWorker::new(entry, reader, registry, read_buffer_size);
            worker.run().await;
        });
    }
}

/// Whether an accept error concerns only the connection being accepted,
/// as opposed to the listening socket itself
fn is_transient_accept_error(e: &std::io::Error) -> bool {
    matches!(
        e.kind(),
        std::io::ErrorKind::ConnectionAborted
            | std::io::ErrorKind::ConnectionReset
            | std::io::ErrorKind::Interrupted
            | std::io::ErrorKind::WouldBlock
    )
}
