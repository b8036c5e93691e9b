//! Peer registry and broadcast relay
//!
//! The registry is the authoritative, synchronized set of currently live
//! connections. It is the only shared mutable state in the server; every
//! other piece of per-connection state is exclusively owned by that
//! connection's worker.
//!
//! # Architecture
//!
//! ```text
//!                       Arc<PeerRegistry>
//!                  ┌─────────────────────────┐
//!                  │ peers: HashMap<PeerId,  │
//!                  │   PeerEntry {           │
//!                  │     writer: Arc<Mutex>, │
//!                  │   }                     │
//!                  │ >                       │
//!                  └───────────┬─────────────┘
//!                              │
//!        ┌─────────────────────┼─────────────────────┐
//!        │                     │                     │
//!        ▼                     ▼                     ▼
//!    [Worker 1]            [Worker 2]            [Worker 3]
//!    read() loop           read() loop           read() loop
//!        │
//!        └──► registry.broadcast() ──► entry.send() ──► peers 2 and 3
//! ```
//!
//! # Zero-Copy Fan-Out
//!
//! Payload data is `bytes::Bytes`, which is reference counted. Delivering
//! one chunk to N peers clones the handle, not the bytes.
//!
//! # Locking
//!
//! The peer map guard is held only for register / unregister / snapshot,
//! never across a network write. Each peer's write half carries its own
//! mutex, so one slow recipient can stall neither registry operations nor
//! deliveries to other peers.

pub mod config;
pub mod entry;
pub mod error;
pub mod payload;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{PeerEntry, PeerWriter};
pub use error::RegistryError;
pub use payload::{Payload, PeerId};
pub use store::PeerRegistry;
