//! Relay client
//!
//! Connects to a relay server and runs two concurrent flows over the one
//! connection: an interactive sender (local input → socket) and a receiver
//! (socket → local output). Disconnection observed by the receiver ends
//! the whole session.

pub mod config;
pub mod session;

pub use config::ClientConfig;
pub use session::ClientSession;
