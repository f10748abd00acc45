pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use sqlx::{sqlite::SqliteConnectOptions, SqlitePool};
use std::str::FromStr;

pub async fn create_connection(database_url: &str) -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePool::connect_with(connect_options).await?;

    // Run migrations
    migrations::run_migrations(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::SqlitePoolOptions;

    // A single connection keeps every test query on the same in-memory database
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(connect_options)
        .await
        .unwrap();

    migrations::run_migrations(&pool).await.unwrap();
    pool
}
