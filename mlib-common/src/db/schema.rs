//! Idempotent schema bootstrap
//!
//! Creates the `library` table if missing and records the schema version.
//! Safe to run from several service instances at once: the whole bootstrap
//! runs under a transaction-scoped advisory lock.

use crate::Result;
use sqlx::PgPool;
use tracing::{info, warn};

/// Current schema version
///
/// **IMPORTANT:** Increment this when adding a new bootstrap step
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Arbitrary key for `pg_advisory_xact_lock`
const SCHEMA_LOCK_KEY: i64 = 0x6d6c_6962;

/// Create tables if needed and record the schema version
pub async fn init_schema(pool: &PgPool) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(SCHEMA_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(&mut *tx)
    .await?;

    let current: Option<i32> = sqlx::query_scalar("SELECT max(version) FROM schema_version")
        .fetch_one(&mut *tx)
        .await?;
    let current = current.unwrap_or(0);

    if current > CURRENT_SCHEMA_VERSION {
        warn!(
            "Database schema version ({}) is newer than code version ({})",
            current, CURRENT_SCHEMA_VERSION
        );
    }

    if current < 1 {
        create_library_table(&mut tx).await?;
        sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
            .bind(1)
            .execute(&mut *tx)
            .await?;
        info!("Schema v1 applied: library table");
    } else {
        info!("Database schema is up to date (v{})", current);
    }

    tx.commit().await?;
    Ok(())
}

async fn create_library_table(conn: &mut sqlx::PgConnection) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS library (
            id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,
            group_name TEXT NOT NULL,
            song TEXT NOT NULL,
            release_date DATE,
            text TEXT,
            patronymic TEXT
        )
        "#,
    )
    .execute(&mut *conn)
    .await?;

    Ok(())
}
