//! Album records
//!
//! `Album` is a stored row. `AlbumInput` is what clients submit for create,
//! batch create and update; it never carries an id.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ValidationError;

/// Maximum length for title and artist, matching the `VARCHAR(255)` columns
pub const MAX_TEXT_LEN: usize = 255;

/// Album row from the `album` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Album {
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl Album {
    /// Attach a database-assigned id to submitted fields.
    pub fn from_input(id: i64, input: AlbumInput) -> Self {
        Self {
            id,
            title: input.title,
            artist: input.artist,
            price: input.price,
        }
    }
}

/// Album fields as submitted by a client.
///
/// An `id` in the request body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlbumInput {
    pub title: String,
    pub artist: String,
    pub price: f64,
}

impl AlbumInput {
    pub fn new(title: impl Into<String>, artist: impl Into<String>, price: f64) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            price,
        }
    }

    /// Check the same rules the `album` table enforces.
    ///
    /// # Rules
    /// - title and artist are not blank
    /// - title and artist are at most 255 characters
    ///
    /// # Example
    /// ```
    /// use albumctl_server::models::AlbumInput;
    ///
    /// assert!(AlbumInput::new("Blue Train", "John Coltrane", 56.99).validate().is_ok());
    /// assert!(AlbumInput::new("  ", "John Coltrane", 56.99).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_text("title", &self.title)?;
        check_text("artist", &self.artist)?;
        Ok(())
    }
}

fn check_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }

    if value.chars().count() > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
        });
    }

    Ok(())
}

/// Outcome of a batch insert.
///
/// Rows that failed are listed with their position in the submitted batch;
/// every other row was committed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub created: Vec<Album>,
    pub failed: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Record row `index` as rejected and log it.
    pub fn reject(&mut self, index: usize, error: impl std::fmt::Display) {
        tracing::warn!(index, error = %error, "Batch row rejected, skipping");
        self.failed.push(BatchFailure {
            index,
            error: error.to_string(),
        });
    }
}

/// A single rejected row in a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchFailure {
    pub index: usize,
    pub error: String,
}
