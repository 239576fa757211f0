//! CLI module for the gateway
//!
//! Provides the command-line interface:
//! - serve: connect the pool and run the HTTP server
//! - check: verify configuration and database reachability

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{check, run, run_command, serve};
pub use errors::{CliError, CliResult};
