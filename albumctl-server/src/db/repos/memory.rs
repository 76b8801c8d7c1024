//! In-process album repository
//!
//! Applies the same [`check_row`] rules as `PgAlbumRepo` so handler and
//! use-case behavior can be exercised without PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::albums::{check_row, AlbumRepository, DbError};
use crate::models::{Album, AlbumInput, BatchReport};

#[derive(Default)]
struct Table {
    last_id: i64,
    rows: BTreeMap<i64, Album>,
}

/// Album repository backed by a `BTreeMap`
#[derive(Default)]
pub struct MemoryAlbumRepo {
    table: Mutex<Table>,
}

impl MemoryAlbumRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Table {
    fn insert(&mut self, input: AlbumInput) -> Album {
        self.last_id += 1;
        let album = Album::from_input(self.last_id, input);
        self.rows.insert(album.id, album.clone());
        album
    }
}

#[async_trait]
impl AlbumRepository for MemoryAlbumRepo {
    async fn create(&self, input: AlbumInput) -> Result<Album, DbError> {
        check_row(&input)?;
        Ok(self.table.lock().await.insert(input))
    }

    async fn get(&self, id: i64) -> Result<Album, DbError> {
        self.table
            .lock()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::album_not_found(id))
    }

    async fn get_all(&self) -> Result<Vec<Album>, DbError> {
        Ok(self.table.lock().await.rows.values().cloned().collect())
    }

    async fn batch_create(&self, inputs: Vec<AlbumInput>) -> Result<BatchReport, DbError> {
        let mut table = self.table.lock().await;
        let mut report = BatchReport::default();

        for (index, input) in inputs.into_iter().enumerate() {
            match check_row(&input) {
                Ok(()) => report.created.push(table.insert(input)),
                Err(error) => report.reject(index, error),
            }
        }

        Ok(report)
    }

    async fn update(&self, id: i64, input: AlbumInput) -> Result<(), DbError> {
        check_row(&input)?;
        let mut table = self.table.lock().await;
        let row = table
            .rows
            .get_mut(&id)
            .ok_or_else(|| DbError::album_not_found(id))?;
        *row = Album::from_input(id, input);
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.table
            .lock()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::album_not_found(id))
    }

    async fn ping(&self) -> Result<(), DbError> {
        Ok(())
    }
}
