//! Schema migration for the album table

use sqlx::PgPool;

/// Create the `album` table if it does not exist.
///
/// The column rules mirror `AlbumInput::validate`: at least one
/// non-whitespace character and at most 255 characters.
pub async fn run(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running album migrations...");

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS album (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL CHECK (title ~ '\S'),
            artist VARCHAR(255) NOT NULL CHECK (artist ~ '\S'),
            price DOUBLE PRECISION NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Album migrations complete");
    Ok(())
}
