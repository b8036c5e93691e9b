//! # relay-rs
//!
//! A real-time TCP broadcast relay: the server fans every byte chunk
//! received from one connection out to all other currently connected
//! peers, and the client pairs an interactive send flow with a receive
//! flow over one connection.
//!
//! The wire format is an unstructured byte stream. There is no length
//! prefix, delimiter requirement, or envelope; TCP may re-chunk payloads
//! in transit, so receivers must not assume message boundaries survive.
//! Per-sender byte order is preserved end-to-end; nothing is guaranteed
//! about interleaving between senders.
//!
//! # Server
//!
//! ```no_run
//! use relay_rs::{RelayServer, ServerConfig};
//!
//! # async fn example() -> relay_rs::Result<()> {
//! let config = ServerConfig::default().max_peers(64);
//! let server = RelayServer::new(config);
//! server.run().await
//! # }
//! ```
//!
//! # Client
//!
//! ```no_run
//! use relay_rs::{ClientConfig, ClientSession};
//!
//! # async fn example() -> relay_rs::Result<()> {
//! let session = ClientSession::connect(ClientConfig::default()).await?;
//! let input = tokio::io::BufReader::new(tokio::io::stdin());
//! session.run(input, tokio::io::stdout()).await
//! # }
//! ```

pub mod client;
pub mod error;
pub mod registry;
pub mod server;
pub mod stats;

pub use client::{ClientConfig, ClientSession};
pub use error::{Error, Result};
pub use registry::{Payload, PeerEntry, PeerId, PeerRegistry, RegistryConfig, RegistryError};
pub use server::{ConnectionWorker, PeerState, RelayServer, ServerConfig};
pub use stats::{RelayStats, RelayStatsSnapshot};

/// Well-known relay service port
pub const DEFAULT_PORT: u16 = 12345;
