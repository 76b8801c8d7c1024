//! Album use-case layer
//!
//! Sits between the HTTP handlers and the repository. It adds no rules of
//! its own; handlers depend on this type rather than on a concrete store.

use std::sync::Arc;

use crate::db::repos::{AlbumRepository, DbError};
use crate::models::{Album, AlbumInput, BatchReport};

#[derive(Clone)]
pub struct AlbumUsecase {
    repo: Arc<dyn AlbumRepository>,
}

impl AlbumUsecase {
    pub fn new(repo: Arc<dyn AlbumRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, input: AlbumInput) -> Result<Album, DbError> {
        self.repo.create(input).await
    }

    pub async fn get(&self, id: i64) -> Result<Album, DbError> {
        self.repo.get(id).await
    }

    pub async fn get_all(&self) -> Result<Vec<Album>, DbError> {
        self.repo.get_all().await
    }

    pub async fn batch_create(&self, inputs: Vec<AlbumInput>) -> Result<BatchReport, DbError> {
        self.repo.batch_create(inputs).await
    }

    pub async fn update(&self, id: i64, input: AlbumInput) -> Result<(), DbError> {
        self.repo.update(id, input).await
    }

    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        self.repo.delete(id).await
    }

    pub async fn ping(&self) -> Result<(), DbError> {
        self.repo.ping().await
    }
}
