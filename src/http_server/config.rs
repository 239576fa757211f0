//! HTTP Server Configuration
//!
//! Listen settings for the gateway: bind host, port, and the CORS origin
//! list. An empty origin list means any origin may call, which is the
//! default posture for this service.

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Bind host (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Listen port (default: 3000, overridable via `PORT`)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Allowed CORS origins; empty permits any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Default settings with a specific port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// The `host:port` pair to bind
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: defaults bind everywhere on 3000 with an open origin list
    #[test]
    fn test_defaults() {
        let config = HttpServerConfig::default();
        assert_eq!(config.socket_addr(), "0.0.0.0:3000");
        assert!(config.cors_origins.is_empty());
    }

    /// Test: a port override leaves the other defaults alone
    #[test]
    fn test_with_port() {
        let config = HttpServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.cors_origins.is_empty());
    }

    /// Test: missing fields deserialize to the defaults
    #[test]
    fn test_serde_defaults() {
        let config: HttpServerConfig = serde_json::from_str("{\"port\": 9000}").unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "0.0.0.0");
        assert!(config.cors_origins.is_empty());
    }
}
