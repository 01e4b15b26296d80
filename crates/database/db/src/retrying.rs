use crate::{BlobsRepository, DatabaseError, PersistenceRetryer, RetryError};

use blob_coordinator_primitives::BlobRecord;

/// A [`BlobsRepository`] running every operation of the inner repository through a
/// [`PersistenceRetryer`].
#[derive(Debug, Clone)]
pub struct RetryingBlobsRepository<R> {
    /// The inner repository.
    inner: R,
    /// The retryer.
    retryer: PersistenceRetryer,
}

impl<R> RetryingBlobsRepository<R> {
    /// Returns a new [`RetryingBlobsRepository`].
    pub const fn new(inner: R, retryer: PersistenceRetryer) -> Self {
        Self { inner, retryer }
    }

    /// Returns a reference to the inner repository.
    pub const fn inner(&self) -> &R {
        &self.inner
    }
}

impl From<RetryError<DatabaseError>> for DatabaseError {
    fn from(error: RetryError<DatabaseError>) -> Self {
        match error {
            RetryError::TimedOut(timeout) => Self::Timeout(timeout),
            RetryError::Failed { source, .. } => source,
        }
    }
}

#[async_trait::async_trait]
impl<R: BlobsRepository> BlobsRepository for RetryingBlobsRepository<R> {
    async fn save_new_blob(&self, record: BlobRecord) -> Result<(), DatabaseError> {
        Ok(self.retryer.retry("save_new_blob", || self.inner.save_new_blob(record.clone())).await?)
    }

    async fn find_blob_by_start_block_number(
        &self,
        start_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        Ok(self
            .retryer
            .retry("find_blob_by_start_block_number", || {
                self.inner.find_blob_by_start_block_number(start_block_number)
            })
            .await?)
    }

    async fn find_blob_by_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        Ok(self
            .retryer
            .retry("find_blob_by_end_block_number", || {
                self.inner.find_blob_by_end_block_number(end_block_number)
            })
            .await?)
    }

    async fn get_latest_blob(&self) -> Result<Option<BlobRecord>, DatabaseError> {
        Ok(self.retryer.retry("get_latest_blob", || self.inner.get_latest_blob()).await?)
    }

    async fn get_consecutive_blobs_from_block_number(
        &self,
        start_block_number: u64,
        limit: u64,
    ) -> Result<Vec<BlobRecord>, DatabaseError> {
        Ok(self
            .retryer
            .retry("get_consecutive_blobs_from_block_number", || {
                self.inner.get_consecutive_blobs_from_block_number(start_block_number, limit)
            })
            .await?)
    }

    async fn delete_blobs_up_to_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<u64, DatabaseError> {
        Ok(self
            .retryer
            .retry("delete_blobs_up_to_end_block_number", || {
                self.inner.delete_blobs_up_to_end_block_number(end_block_number)
            })
            .await?)
    }

    async fn delete_blobs_after_block_number(
        &self,
        block_number: u64,
    ) -> Result<u64, DatabaseError> {
        Ok(self
            .retryer
            .retry("delete_blobs_after_block_number", || {
                self.inner.delete_blobs_after_block_number(block_number)
            })
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_utils::{setup_test_db, FlakyBlobsRepository},
        PersistenceRetryConfig,
    };
    use std::time::Duration;

    use alloy_primitives::B256;
    use blob_coordinator_primitives::BlobStatus;
    use sea_orm::DbErr;

    fn blob_record(start: u64, end: u64) -> BlobRecord {
        BlobRecord {
            start_block_number: start,
            end_block_number: end,
            blob_hash: B256::repeat_byte(1),
            start_block_time: 100,
            end_block_time: 200,
            batches_count: 1,
            status: BlobStatus::CompressionProven,
            expected_shnarf: B256::repeat_byte(2),
            blob_compression_proof: Default::default(),
        }
    }

    fn retryer(max_retries: usize) -> PersistenceRetryer {
        PersistenceRetryer::new(PersistenceRetryConfig {
            backoff_delay: Duration::from_millis(1),
            max_retries: Some(max_retries),
            timeout: Some(Duration::from_secs(5)),
        })
    }

    #[tokio::test]
    async fn test_retrying_repository_recovers_from_transient_failures() {
        let db = setup_test_db().await;
        let repository = RetryingBlobsRepository::new(FlakyBlobsRepository::new(db, 2), retryer(3));

        repository.save_new_blob(blob_record(1, 10)).await.unwrap();

        // the write happens once from the caller's perspective.
        assert_eq!(repository.inner().save_attempts(), 3);
        let blobs = repository.get_consecutive_blobs_from_block_number(1, 10).await.unwrap();
        assert_eq!(blobs, vec![blob_record(1, 10)]);
    }

    #[tokio::test]
    async fn test_retrying_repository_surfaces_last_error() {
        let db = setup_test_db().await;
        let repository = RetryingBlobsRepository::new(FlakyBlobsRepository::new(db, 5), retryer(2));

        let err = repository.save_new_blob(blob_record(1, 10)).await.unwrap_err();

        assert!(matches!(err, DatabaseError::DatabaseError(DbErr::Conn(_))));
        assert_eq!(repository.inner().save_attempts(), 3);
        assert_eq!(repository.get_latest_blob().await.unwrap(), None);
    }
}
