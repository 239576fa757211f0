//! vitrine - HTTP-to-SQL gateway for a store's customer and product tables
//!
//! Exposes CRUD routes over the `clientes` and `produtos` tables of a
//! MySQL database. Requests are validated against a per-resource column
//! schema, turned into parameterized statements and executed through a
//! bounded connection pool.

pub mod cli;
pub mod config;
pub mod db;
pub mod gateway;
pub mod http_server;
