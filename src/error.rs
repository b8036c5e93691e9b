//! Crate error types
//!
//! Fatal errors surface here; failures that a smaller unit can absorb
//! (one accept attempt, one worker, one broadcast recipient) are handled
//! where they occur and never reach this type.

use std::net::SocketAddr;

use crate::registry::RegistryError;

/// Crate-level result alias
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Debug)]
pub enum Error {
    /// I/O error (bind, listen, or an unrecoverable accept failure)
    Io(std::io::Error),
    /// Registry operation failed
    Registry(RegistryError),
    /// Could not connect to the relay server
    Connect {
        /// Address the client tried to reach
        addr: SocketAddr,
        /// Underlying connect error
        source: std::io::Error,
    },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Registry(e) => write!(f, "Registry error: {}", e),
            Error::Connect { addr, source } => {
                write!(f, "Failed to connect to {}: {}", addr, source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Registry(e) => Some(e),
            Error::Connect { source, .. } => Some(source),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<RegistryError> for Error {
    fn from(e: RegistryError) -> Self {
        Error::Registry(e)
    }
}
