//! SQLite client factory and migration tooling for libris.

use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub mod migrate;

pub use migrate::{migrate, Migration};

/// Shared connection pool handed to every module.
pub type Db = sqlx::SqlitePool;

/// Open a connection pool for the given `sqlite:` URL.
///
/// In-memory databases live only as long as their connection, so they are
/// pinned to a single connection that is never recycled.
pub async fn connect(url: &str, max_connections: u32) -> anyhow::Result<Db> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("invalid database url '{url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let in_memory = is_in_memory(url);
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections.max(1))
    };

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("failed to open sqlite database '{url}'"))?;

    tracing::info!(target: "libris-db", url, in_memory, "database pool ready");
    Ok(pool)
}

/// Round-trip a trivial statement to prove the pool is usable.
pub async fn ping(db: &Db) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(db).await?;
    Ok(())
}

/// Fresh, time-ordered record identifier.
pub fn new_id() -> String {
    uuid::Uuid::now_v7().to_string()
}

/// True when the error is a UNIQUE constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
