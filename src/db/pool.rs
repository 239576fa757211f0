//! # Connection Pool
//!
//! Bounded MySQL pool construction with retry at startup. The pool is
//! created once and injected into the gateway; a mid-request connection
//! loss fails that request only and the pool reconnects on later acquires.

use std::time::Duration;

use rand::Rng;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::{info, warn};

use crate::config::DatabaseConfig;

use super::DbError;

/// Connection attempts before giving up
const CONNECT_ATTEMPTS: u32 = 5;
/// First retry delay; doubles per attempt
const BASE_DELAY: Duration = Duration::from_millis(250);
/// Ceiling for the backoff delay
const MAX_DELAY: Duration = Duration::from_secs(4);
/// How long a request may wait for a pooled connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(8);

/// Open a bounded pool, retrying with exponential backoff.
pub async fn connect(config: &DatabaseConfig) -> Result<MySqlPool, DbError> {
    let options = MySqlConnectOptions::new()
        .host(&config.host)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    let mut delay = BASE_DELAY;
    let mut attempt = 1;
    loop {
        match MySqlPoolOptions::new()
            .max_connections(config.pool_size)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options.clone())
            .await
        {
            Ok(pool) => {
                info!(
                    host = %config.host,
                    database = %config.database,
                    pool_size = config.pool_size,
                    "database connection established"
                );
                return Ok(pool);
            }
            Err(source) if attempt >= CONNECT_ATTEMPTS => {
                return Err(DbError::Unreachable {
                    attempts: attempt,
                    source,
                });
            }
            Err(error) => {
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %error,
                    "database connection failed, retrying"
                );
                tokio::time::sleep(with_jitter(delay)).await;
                delay = (delay * 2).min(MAX_DELAY);
                attempt += 1;
            }
        }
    }
}

/// Up to 25% random jitter on top of the base delay.
fn with_jitter(delay: Duration) -> Duration {
    let ceiling = delay.as_millis() as u64 / 4;
    let jitter = rand::thread_rng().gen_range(0..=ceiling);
    delay + Duration::from_millis(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jitter_stays_within_a_quarter_of_the_delay() {
        let delay = Duration::from_millis(400);
        for _ in 0..50 {
            let jittered = with_jitter(delay);
            assert!(jittered >= delay);
            assert!(jittered <= delay + Duration::from_millis(100));
        }
    }

    #[test]
    fn test_jitter_handles_tiny_delays() {
        let delay = Duration::from_millis(1);
        assert_eq!(with_jitter(delay), delay);
    }
}
