//! Database connection with retry
//!
//! The pool is the only shared resource of the catalog service. Connecting
//! is retried with exponential backoff; nothing after startup retries.

use crate::config::DatabaseConfig;
use crate::{Error, Result};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Upper bound for the backoff between two attempts
const MAX_BACKOFF_MS: u64 = 10_000;

/// Build connect options from config (URL wins over discrete fields)
pub fn connect_options(config: &DatabaseConfig) -> Result<PgConnectOptions> {
    if let Some(url) = &config.url {
        return url
            .parse::<PgConnectOptions>()
            .map_err(|e| Error::Config(format!("invalid database URL: {}", e)));
    }

    Ok(PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.name))
}

/// Open the pool and verify it with a ping, retrying on failure
///
/// **Algorithm:**
/// 1. Connect and run `SELECT 1`, bounded by `connect_timeout_ms`
/// 2. On failure, wait `retry_delay_ms` (doubling, capped) and try again
/// 3. Give up after `attempts` tries and return the last error
pub async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    let options = connect_options(config)?;
    let attempts = config.attempts.max(1);
    let timeout = Duration::from_millis(config.connect_timeout_ms);
    let mut backoff_ms = config.retry_delay_ms;
    let start_time = Instant::now();

    let mut attempt = 0;
    loop {
        attempt += 1;
        info!(attempt, target = %config.display_target(), "database connection attempt");

        match try_connect(&options, config.max_connections, timeout).await {
            Ok(pool) => {
                info!(
                    attempt,
                    elapsed_ms = start_time.elapsed().as_millis() as u64,
                    "database connection established"
                );
                return Ok(pool);
            }
            Err(e) if attempt < attempts => {
                warn!(attempt, error = %e, backoff_ms, "database connection failed, retrying");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
            }
            Err(e) => {
                error!(attempt, error = %e, "failed to connect to database");
                return Err(e);
            }
        }
    }
}

async fn try_connect(
    options: &PgConnectOptions,
    max_connections: u32,
    timeout: Duration,
) -> Result<PgPool> {
    let connect = async {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .acquire_timeout(timeout)
            .connect_with(options.clone())
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;
        debug!("database ping succeeded");
        Ok::<_, Error>(pool)
    };

    tokio::time::timeout(timeout, connect)
        .await
        .map_err(|_| Error::Internal(format!("connection attempt timed out after {:?}", timeout)))?
}
