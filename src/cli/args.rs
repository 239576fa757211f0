//! CLI argument definitions using clap
//!
//! Commands:
//! - vitrine serve [--port <port>]
//! - vitrine check

use clap::{Parser, Subcommand};

/// Vitrine - HTTP-to-SQL gateway for the store's customer and product tables
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Connect to the database and run the HTTP server
    Serve {
        /// Listen port, overrides the PORT environment variable
        #[arg(long)]
        port: Option<u16>,
    },

    /// Verify configuration and database reachability, then exit
    Check,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
