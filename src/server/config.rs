//! Server configuration

use std::net::SocketAddr;

use crate::registry::RegistryConfig;
use crate::DEFAULT_PORT;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent peers (0 = unlimited)
    ///
    /// Enforced by the registry at registration time; connections beyond
    /// the bound are rejected and closed, existing sessions are untouched.
    pub max_peers: usize,

    /// Enable TCP_NODELAY (disable Nagle's algorithm)
    pub tcp_nodelay: bool,

    /// Per-connection read buffer size
    pub read_buffer_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            max_peers: 0, // Unlimited
            tcp_nodelay: true, // Important for interactive latency
            read_buffer_size: 1024,
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum concurrent peers
    pub fn max_peers(mut self, max: usize) -> Self {
        self.max_peers = max;
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn tcp_nodelay(mut self, enabled: bool) -> Self {
        self.tcp_nodelay = enabled;
        self
    }

    /// Set the per-connection read buffer size
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size.max(1);
        self
    }

    /// Derive the registry configuration from this server config
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig::default().max_peers(self.max_peers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), DEFAULT_PORT);
        assert_eq!(config.max_peers, 0);
        assert!(config.tcp_nodelay);
        assert_eq!(config.read_buffer_size, 1024);
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:9000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_peers, 0);
    }

    #[test]
    fn test_builder_read_buffer_floor() {
        // A zero-sized read buffer would make read_buf spin
        let config = ServerConfig::default().read_buffer_size(0);

        assert_eq!(config.read_buffer_size, 1);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:12346".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .max_peers(50)
            .tcp_nodelay(false)
            .read_buffer_size(4096);

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_peers, 50);
        assert!(!config.tcp_nodelay);
        assert_eq!(config.read_buffer_size, 4096);
    }

    #[test]
    fn test_registry_config_carries_bound() {
        let config = ServerConfig::default().max_peers(7);

        assert_eq!(config.registry_config().max_peers, 7);
    }
}
