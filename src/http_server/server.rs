//! # HTTP Server
//!
//! Main HTTP server combining the gateway routes and the health check,
//! with CORS and per-request tracing layered on top.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use super::config::HttpServerConfig;
use super::gateway_routes::{gateway_routes, GatewayState};
use super::observability_routes::health_routes;

/// Server startup failures
#[derive(Debug, Error)]
pub enum HttpServerError {
    #[error("invalid listen address \"{addr}\": {source}")]
    InvalidAddress {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// HTTP server for the gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over the given gateway state
    pub fn new(config: HttpServerConfig, state: GatewayState) -> Self {
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router
    fn build_router(config: &HttpServerConfig, state: GatewayState) -> Router {
        // Configure CORS from config
        let cors = if config.cors_origins.is_empty() {
            // No origins configured: any origin may call
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<HeaderValue> = config
                .cors_origins
                .iter()
                .filter_map(|origin| match origin.parse() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(%origin, "ignoring unparseable CORS origin");
                        None
                    }
                })
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            // Health check at root level
            .merge(health_routes())
            // Resource routes at root level
            .merge(gateway_routes(state))
            // Per-request tracing, then CORS outermost
            .layer(TraceLayer::new_for_http())
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), HttpServerError> {
        let addr: SocketAddr =
            self.config
                .socket_addr()
                .parse()
                .map_err(|source| HttpServerError::InvalidAddress {
                    addr: self.config.socket_addr(),
                    source,
                })?;

        info!(%addr, "gateway listening");
        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;

        Ok(())
    }
}
