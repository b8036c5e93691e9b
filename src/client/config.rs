//! Client configuration

use std::net::SocketAddr;

use crate::DEFAULT_PORT;

/// Client configuration options
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server address to connect to
    pub addr: SocketAddr,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Create a new config with a custom server address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            addr,
            ..Default::default()
        }
    }

    /// Set the server address
    pub fn addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_targets_loopback() {
        let config = ClientConfig::default();

        assert!(config.addr.ip().is_loopback());
        assert_eq!(config.addr.port(), DEFAULT_PORT);
        assert!(config.tcp_nodelay);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "192.168.1.10:12345".parse().unwrap();
        let config = ClientConfig::default().addr(addr).tcp_nodelay(false);

        assert_eq!(config.addr, addr);
        assert!(!config.tcp_nodelay);
    }
}
