//! Broadcast relay server
//!
//! The server binds a listening socket, accepts connections indefinitely,
//! registers each accepted peer, and spawns one worker task per connection.
//! Workers read inbound bytes and hand them to the registry's broadcast
//! relay; on end-of-stream they tear their own entry down.

pub mod config;
pub mod listener;
pub mod worker;

pub use config::ServerConfig;
pub use listener::RelayServer;
pub use worker::{ConnectionWorker, PeerState};
