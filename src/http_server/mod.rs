//! # HTTP Server Module
//!
//! Axum server exposing the gateway: the two resource route groups, a
//! health check, CORS, and request tracing.
//!
//! # Endpoints
//!
//! - `/clientes`, `/clientes/:id` - customer CRUD
//! - `/produtos`, `/produtos/:id` - product CRUD
//! - `/health` - health check

pub mod config;
pub mod gateway_routes;
pub mod observability_routes;
pub mod server;

pub use config::HttpServerConfig;
pub use gateway_routes::{gateway_routes, GatewayState};
pub use server::{HttpServer, HttpServerError};
