use std::str::FromStr;

use anyhow::Context;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Open a pool for `url` and bring the schema up to date.
///
/// `sqlite::memory:` gets a single, never-recycled connection: every new
/// connection to an in-memory database would see an empty schema.
pub async fn connect(url: &str) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(url)
        .with_context(|| format!("parse database url {url}"))?
        .foreign_keys(true);

    let in_memory = url.contains(":memory:");
    let pool = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
    } else {
        SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
    }
    .context("connect to database")?;

    MIGRATOR.run(&pool).await.context("run migrations")?;
    tracing::debug!(in_memory, "database ready");

    Ok(pool)
}
