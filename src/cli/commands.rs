//! CLI command implementations
//!
//! Both commands load configuration from the environment first. `serve`
//! keeps running until the process is stopped; `check` exits after one
//! round-trip to the database.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::db::{pool, MySqlExecutor};
use crate::gateway::Gateway;
use crate::http_server::{GatewayState, HttpServer};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Initializes logging, parses arguments and dispatches to the
/// appropriate command. This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    init_tracing();
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { port } => serve(port),
        Command::Check => check(),
    }
}

/// Connect the pool and run the HTTP server
///
/// Startup sequence:
/// 1. Load configuration from the environment
/// 2. Open the bounded connection pool, retrying with backoff
/// 3. Build the gateway over the pooled executor
/// 4. Serve HTTP until the process is stopped
pub fn serve(port: Option<u16>) -> CliResult<()> {
    let mut config = AppConfig::from_env()?;
    if let Some(port) = port {
        config.http.port = port;
    }

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let db_pool = pool::connect(&config.database).await?;
        let executor = Arc::new(MySqlExecutor::new(db_pool));
        let state = GatewayState::new(Gateway::new(executor));

        info!(
            addr = %config.http.socket_addr(),
            database = %config.database.database,
            "starting gateway"
        );

        let server = HttpServer::new(config.http.clone(), state);
        server.start().await?;
        Ok(())
    })
}

/// Verify configuration and database reachability, then exit
///
/// Loads the same configuration `serve` would use, opens the pool and
/// runs a ping. Any failure surfaces as a non-zero exit.
pub fn check() -> CliResult<()> {
    let config = AppConfig::from_env()?;

    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let db_pool = pool::connect(&config.database).await?;
        let executor = MySqlExecutor::new(db_pool);
        executor.ping().await?;
        Ok::<(), CliError>(())
    })?;

    println!("configuration ok, database reachable");
    Ok(())
}

/// Install the global tracing subscriber.
///
/// Honors RUST_LOG when set, otherwise logs at info level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
