//! Test utilities for the database crate.

use super::Database;
use crate::{BlobsRepository, DatabaseError};
use std::sync::atomic::{AtomicUsize, Ordering};

use blob_coordinator_migration::{Migrator, MigratorTrait};
use blob_coordinator_primitives::BlobRecord;
use sea_orm::{DbErr, RuntimeErr};

/// Instantiates a new in-memory database and runs the migrations
/// to set up the schema.
pub async fn setup_test_db() -> Database {
    let database_url = "sqlite::memory:";
    let connection = sea_orm::Database::connect(database_url).await.unwrap();
    Migrator::up(&connection, None).await.unwrap();

    Database::from(connection)
}

/// A [`BlobsRepository`] failing its first `failures` writes with a transient connection error
/// before delegating to the inner repository.
#[derive(Debug)]
pub struct FlakyBlobsRepository<R> {
    inner: R,
    failures: usize,
    save_attempts: AtomicUsize,
}

impl<R> FlakyBlobsRepository<R> {
    /// Returns a new [`FlakyBlobsRepository`].
    pub const fn new(inner: R, failures: usize) -> Self {
        Self { inner, failures, save_attempts: AtomicUsize::new(0) }
    }

    /// Returns the number of calls to [`BlobsRepository::save_new_blob`].
    pub fn save_attempts(&self) -> usize {
        self.save_attempts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl<R: BlobsRepository> BlobsRepository for FlakyBlobsRepository<R> {
    async fn save_new_blob(&self, record: BlobRecord) -> Result<(), DatabaseError> {
        if self.save_attempts.fetch_add(1, Ordering::SeqCst) < self.failures {
            return Err(DbErr::Conn(RuntimeErr::Internal("connection reset".into())).into());
        }
        self.inner.save_new_blob(record).await
    }

    async fn find_blob_by_start_block_number(
        &self,
        start_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        self.inner.find_blob_by_start_block_number(start_block_number).await
    }

    async fn find_blob_by_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        self.inner.find_blob_by_end_block_number(end_block_number).await
    }

    async fn get_latest_blob(&self) -> Result<Option<BlobRecord>, DatabaseError> {
        self.inner.get_latest_blob().await
    }

    async fn get_consecutive_blobs_from_block_number(
        &self,
        start_block_number: u64,
        limit: u64,
    ) -> Result<Vec<BlobRecord>, DatabaseError> {
        self.inner.get_consecutive_blobs_from_block_number(start_block_number, limit).await
    }

    async fn delete_blobs_up_to_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<u64, DatabaseError> {
        self.inner.delete_blobs_up_to_end_block_number(end_block_number).await
    }

    async fn delete_blobs_after_block_number(
        &self,
        block_number: u64,
    ) -> Result<u64, DatabaseError> {
        self.inner.delete_blobs_after_block_number(block_number).await
    }
}
