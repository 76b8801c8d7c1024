//! Album repository
//!
//! `AlbumRepository` is the seam the use-case layer talks to. `PgAlbumRepo`
//! issues parameterized SQL against the `album` table:
//! - every call is bounded by a configurable timeout
//! - batch create runs in one transaction with a savepoint per row

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::{Acquire, PgPool};

use crate::config::QueryTimeouts;
use crate::models::{Album, AlbumInput, BatchReport};

const INSERT_ALBUM: &str = r#"
    INSERT INTO album (title, artist, price)
    VALUES ($1, $2, $3)
    RETURNING id
"#;

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[source] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("{operation} timed out after {}s", .after.as_secs_f64())]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl DbError {
    pub fn album_not_found(id: i64) -> Self {
        Self::NotFound {
            resource: "album",
            id: id.to_string(),
        }
    }
}

/// Refuse a row the `album` table would reject, before any SQL runs.
///
/// The table's `CHECK`s are a backstop; this check is what callers see.
pub fn check_row(input: &AlbumInput) -> Result<(), DbError> {
    input
        .validate()
        .map_err(|e| DbError::Constraint(e.to_string()))
}

impl From<sqlx::Error> for DbError {
    fn from(e: sqlx::Error) -> Self {
        let constraint = match &e {
            sqlx::Error::Database(db) => matches!(
                db.kind(),
                ErrorKind::CheckViolation
                    | ErrorKind::NotNullViolation
                    | ErrorKind::UniqueViolation
                    | ErrorKind::ForeignKeyViolation
            )
            .then(|| db.message().to_owned()),
            _ => None,
        };

        match constraint {
            Some(message) => Self::Constraint(message),
            None => Self::Sqlx(e),
        }
    }
}

/// Album data access
#[async_trait]
pub trait AlbumRepository: Send + Sync {
    /// Insert one row and return it with the generated id.
    async fn create(&self, input: AlbumInput) -> Result<Album, DbError>;

    /// Fetch one row, `DbError::NotFound` when no row matches.
    async fn get(&self, id: i64) -> Result<Album, DbError>;

    /// All rows ordered by id. Empty table yields an empty vec.
    async fn get_all(&self) -> Result<Vec<Album>, DbError>;

    /// Insert every row in one transaction, skipping rows that fail.
    /// Rows failing [`check_row`] are reported without touching the table.
    async fn batch_create(&self, inputs: Vec<AlbumInput>) -> Result<BatchReport, DbError>;

    /// Overwrite title, artist and price of row `id`.
    async fn update(&self, id: i64, input: AlbumInput) -> Result<(), DbError>;

    async fn delete(&self, id: i64) -> Result<(), DbError>;

    /// Cheap round trip to the store, used by the health endpoint.
    async fn ping(&self) -> Result<(), DbError>;
}

/// Run `fut` with a time limit.
pub async fn bounded<T, F>(operation: &'static str, limit: Duration, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, limit_secs = limit.as_secs_f64(), "Query timed out");
            Err(DbError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}

/// PostgreSQL album repository
#[derive(Clone)]
pub struct PgAlbumRepo {
    pool: PgPool,
    timeouts: QueryTimeouts,
}

impl PgAlbumRepo {
    pub fn new(pool: PgPool, timeouts: QueryTimeouts) -> Self {
        Self { pool, timeouts }
    }
}

#[async_trait]
impl AlbumRepository for PgAlbumRepo {
    async fn create(&self, input: AlbumInput) -> Result<Album, DbError> {
        check_row(&input)?;
        let id = bounded("create", self.timeouts.single_row(), async {
            let id: i64 = sqlx::query_scalar(INSERT_ALBUM)
                .bind(&input.title)
                .bind(&input.artist)
                .bind(input.price)
                .fetch_one(&self.pool)
                .await?;
            Ok(id)
        })
        .await?;

        tracing::debug!(id, "Album created");
        Ok(Album::from_input(id, input))
    }

    async fn get(&self, id: i64) -> Result<Album, DbError> {
        bounded("get", self.timeouts.single_row(), async {
            sqlx::query_as::<_, Album>(
                r#"
                SELECT id, title, artist, price
                FROM album
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::album_not_found(id))
        })
        .await
    }

    async fn get_all(&self) -> Result<Vec<Album>, DbError> {
        bounded("get_all", self.timeouts.full_scan(), async {
            let albums = sqlx::query_as::<_, Album>(
                r#"
                SELECT id, title, artist, price
                FROM album
                ORDER BY id
                "#,
            )
            .fetch_all(&self.pool)
            .await?;
            Ok(albums)
        })
        .await
    }

    async fn batch_create(&self, inputs: Vec<AlbumInput>) -> Result<BatchReport, DbError> {
        // Dropping the transaction on timeout or error rolls the whole batch back.
        bounded("batch_create", self.timeouts.single_row(), async {
            let mut tx = self.pool.begin().await?;
            let mut report = BatchReport::default();

            for (index, input) in inputs.into_iter().enumerate() {
                if let Err(error) = check_row(&input) {
                    report.reject(index, error);
                    continue;
                }

                let mut savepoint = tx.begin().await?;

                let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(INSERT_ALBUM)
                    .bind(&input.title)
                    .bind(&input.artist)
                    .bind(input.price)
                    .fetch_one(&mut *savepoint)
                    .await;

                match inserted {
                    Ok(id) => {
                        savepoint.commit().await?;
                        report.created.push(Album::from_input(id, input));
                    }
                    Err(e) => {
                        savepoint.rollback().await?;
                        report.reject(index, DbError::from(e));
                    }
                }
            }

            tx.commit().await?;
            tracing::info!(
                created = report.created.len(),
                failed = report.failed.len(),
                "Batch insert committed"
            );
            Ok(report)
        })
        .await
    }

    async fn update(&self, id: i64, input: AlbumInput) -> Result<(), DbError> {
        check_row(&input)?;
        let result = bounded("update", self.timeouts.single_row(), async {
            let result = sqlx::query(
                r#"
                UPDATE album
                SET title = $1, artist = $2, price = $3
                WHERE id = $4
                "#,
            )
            .bind(&input.title)
            .bind(&input.artist)
            .bind(input.price)
            .bind(id)
            .execute(&self.pool)
            .await?;
            Ok(result)
        })
        .await?;

        let rows = result.rows_affected();
        tracing::debug!(id, rows, "Album update affected rows");
        if rows == 0 {
            return Err(DbError::album_not_found(id));
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = bounded("delete", self.timeouts.single_row(), async {
            let result = sqlx::query("DELETE FROM album WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;
            Ok(result)
        })
        .await?;

        let rows = result.rows_affected();
        tracing::debug!(id, rows, "Album delete affected rows");
        if rows == 0 {
            return Err(DbError::album_not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), DbError> {
        bounded("ping", self.timeouts.single_row(), async {
            sqlx::query("SELECT 1").execute(&self.pool).await?;
            Ok(())
        })
        .await
    }
}
