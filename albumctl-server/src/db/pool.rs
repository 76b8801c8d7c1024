//! Database connection pool management
//!
//! Uses sqlx PgPool with explicit connection limits.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::migrations;

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Create a PostgreSQL connection pool.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
///
/// # Errors
///
/// Returns an error if the connection fails.
///
/// # Example
///
/// ```ignore
/// let pool = create_pool("postgres://localhost/albums").await?;
/// ```
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    create_pool_with_options(database_url, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a PostgreSQL connection pool with custom options.
///
/// # Arguments
///
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Maximum number of connections in the pool
pub async fn create_pool_with_options(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Open the pool and, when `auto_migrate` is set, bring the schema up to date.
pub async fn open(
    database_url: &str,
    max_connections: u32,
    auto_migrate: bool,
) -> Result<PgPool, sqlx::Error> {
    let pool = create_pool_with_options(database_url, max_connections).await?;
    tracing::info!(max_connections, "Database pool opened");

    if auto_migrate {
        migrations::run(&pool).await?;
    } else {
        tracing::debug!("Auto-migration disabled");
    }

    Ok(pool)
}

/// Close the pool, waiting for checked-out connections to be returned.
pub async fn close_pool(pool: PgPool) {
    pool.close().await;
    tracing::info!("Database pool closed");
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p albumctl-server -- --ignored

    #[tokio::test]
    #[ignore = "requires database"]
    async fn pool_acquires_connection() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = create_pool(&url).await.expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
        close_pool(pool).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn open_with_migration_creates_album_table() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = open(&url, 2, true).await.expect("open failed");

        let exists: (bool,) = sqlx::query_as("SELECT to_regclass('public.album') IS NOT NULL")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert!(exists.0);
        close_pool(pool).await;
    }

    #[tokio::test]
    async fn bad_url_fails() {
        let result = create_pool("not-a-url").await;
        assert!(result.is_err());
    }
}
