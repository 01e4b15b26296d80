use super::{models, DatabaseError};
use crate::Database;

use blob_coordinator_primitives::BlobRecord;
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// The [`BlobsRepository`] trait provides methods for persisting and querying proven blobs.
///
/// Blobs are keyed by their block interval: saving a blob whose interval is already persisted is
/// a no-op.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait BlobsRepository: Send + Sync {
    /// Insert a [`BlobRecord`] into the database, ignoring records already persisted for the same
    /// block interval.
    async fn save_new_blob(&self, record: BlobRecord) -> Result<(), DatabaseError>;

    /// Get the [`BlobRecord`] starting at the provided block number.
    async fn find_blob_by_start_block_number(
        &self,
        start_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError>;

    /// Get the [`BlobRecord`] ending at the provided block number.
    async fn find_blob_by_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError>;

    /// Get the [`BlobRecord`] with the highest end block number.
    async fn get_latest_blob(&self) -> Result<Option<BlobRecord>, DatabaseError>;

    /// Get at most `limit` consecutive [`BlobRecord`]s, the first one starting at
    /// `start_block_number`. The run stops at the first gap.
    async fn get_consecutive_blobs_from_block_number(
        &self,
        start_block_number: u64,
        limit: u64,
    ) -> Result<Vec<BlobRecord>, DatabaseError>;

    /// Delete all blobs ending at or before the provided block number, returning the number of
    /// deleted blobs.
    async fn delete_blobs_up_to_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<u64, DatabaseError>;

    /// Delete all blobs starting after the provided block number, returning the number of deleted
    /// blobs.
    async fn delete_blobs_after_block_number(&self, block_number: u64)
        -> Result<u64, DatabaseError>;
}

#[async_trait::async_trait]
impl BlobsRepository for Database {
    async fn save_new_blob(&self, record: BlobRecord) -> Result<(), DatabaseError> {
        tracing::trace!(
            target: "blob_coordinator::db",
            blob = %record.interval(),
            blob_hash = ?record.blob_hash,
            "Inserting blob into database."
        );
        let interval = record.interval();
        let blob: models::blob::ActiveModel = record.into();
        let inserted = models::blob::Entity::insert(blob)
            .on_conflict(
                OnConflict::columns([
                    models::blob::Column::StartBlockNumber,
                    models::blob::Column::EndBlockNumber,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(self.connection())
            .await?;
        if inserted == 0 {
            tracing::debug!(target: "blob_coordinator::db", blob = %interval, "Blob already persisted.");
        }

        Ok(())
    }

    async fn find_blob_by_start_block_number(
        &self,
        start_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        models::blob::Entity::find()
            .filter(models::blob::Column::StartBlockNumber.eq(start_block_number as i64))
            .order_by_desc(models::blob::Column::EndBlockNumber)
            .one(self.connection())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn find_blob_by_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<Option<BlobRecord>, DatabaseError> {
        models::blob::Entity::find()
            .filter(models::blob::Column::EndBlockNumber.eq(end_block_number as i64))
            .order_by_desc(models::blob::Column::StartBlockNumber)
            .one(self.connection())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_latest_blob(&self) -> Result<Option<BlobRecord>, DatabaseError> {
        models::blob::Entity::find()
            .order_by_desc(models::blob::Column::EndBlockNumber)
            .one(self.connection())
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_consecutive_blobs_from_block_number(
        &self,
        start_block_number: u64,
        limit: u64,
    ) -> Result<Vec<BlobRecord>, DatabaseError> {
        let candidates = models::blob::Entity::find()
            .filter(models::blob::Column::StartBlockNumber.gte(start_block_number as i64))
            .order_by_asc(models::blob::Column::StartBlockNumber)
            .order_by_asc(models::blob::Column::EndBlockNumber)
            .limit(limit)
            .all(self.connection())
            .await?;

        let mut blobs = Vec::with_capacity(candidates.len());
        let mut expected_start = start_block_number;
        for model in candidates {
            let record: BlobRecord = model.try_into()?;
            if record.start_block_number != expected_start {
                break;
            }
            expected_start = record.end_block_number + 1;
            blobs.push(record);
        }

        Ok(blobs)
    }

    async fn delete_blobs_up_to_end_block_number(
        &self,
        end_block_number: u64,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "blob_coordinator::db", end_block_number, "Deleting blobs up to end block number.");
        Ok(models::blob::Entity::delete_many()
            .filter(models::blob::Column::EndBlockNumber.lte(end_block_number as i64))
            .exec(self.connection())
            .await?
            .rows_affected)
    }

    async fn delete_blobs_after_block_number(
        &self,
        block_number: u64,
    ) -> Result<u64, DatabaseError> {
        tracing::trace!(target: "blob_coordinator::db", block_number, "Deleting blobs after block number.");
        Ok(models::blob::Entity::delete_many()
            .filter(models::blob::Column::StartBlockNumber.gt(block_number as i64))
            .exec(self.connection())
            .await?
            .rows_affected)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_utils::setup_test_db;

    use alloy_primitives::B256;
    use arbitrary::{Arbitrary, Unstructured};
    use rand::Rng;

    fn record(u: &mut Unstructured<'_>, start: u64, end: u64) -> BlobRecord {
        let mut record = BlobRecord::arbitrary(u).unwrap();
        record.start_block_number = start;
        record.end_block_number = end;
        record
    }

    fn unstructured_bytes() -> Vec<u8> {
        let mut bytes = vec![0u8; 4096];
        rand::rng().fill(bytes.as_mut_slice());
        bytes
    }

    #[tokio::test]
    async fn test_database_round_trip_blob() {
        // Set up the test database.
        let db = setup_test_db().await;

        // Generate unstructured bytes.
        let bytes = unstructured_bytes();
        let mut u = Unstructured::new(&bytes);

        // Round trip the BlobRecord through the database.
        let blob = record(&mut u, 1, 10);
        db.save_new_blob(blob.clone()).await.unwrap();

        assert_eq!(db.find_blob_by_start_block_number(1).await.unwrap(), Some(blob.clone()));
        assert_eq!(db.find_blob_by_end_block_number(10).await.unwrap(), Some(blob));
        assert_eq!(db.find_blob_by_start_block_number(2).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_new_blob_is_idempotent() {
        let db = setup_test_db().await;
        let bytes = unstructured_bytes();
        let mut u = Unstructured::new(&bytes);

        let blob = record(&mut u, 11, 20);
        db.save_new_blob(blob.clone()).await.unwrap();

        // a second write for the same interval is ignored, even with different content.
        let mut duplicate = blob.clone();
        duplicate.expected_shnarf = B256::repeat_byte(0xff);
        db.save_new_blob(duplicate).await.unwrap();

        let blobs = db.get_consecutive_blobs_from_block_number(11, 10).await.unwrap();
        assert_eq!(blobs, vec![blob]);
    }

    #[tokio::test]
    async fn test_get_latest_blob() {
        let db = setup_test_db().await;
        let bytes = unstructured_bytes();
        let mut u = Unstructured::new(&bytes);

        assert_eq!(db.get_latest_blob().await.unwrap(), None);

        let first = record(&mut u, 1, 10);
        let second = record(&mut u, 11, 20);
        db.save_new_blob(second.clone()).await.unwrap();
        db.save_new_blob(first).await.unwrap();

        assert_eq!(db.get_latest_blob().await.unwrap(), Some(second));
    }

    #[tokio::test]
    async fn test_get_consecutive_blobs_stops_at_gap() {
        let db = setup_test_db().await;
        let bytes = unstructured_bytes();
        let mut u = Unstructured::new(&bytes);

        let blobs: Vec<_> = [(1, 10), (11, 20), (21, 30), (41, 50)]
            .into_iter()
            .map(|(start, end)| record(&mut u, start, end))
            .collect();
        for blob in &blobs {
            db.save_new_blob(blob.clone()).await.unwrap();
        }

        let consecutive = db.get_consecutive_blobs_from_block_number(1, 10).await.unwrap();
        assert_eq!(consecutive, blobs[..3].to_vec());

        let limited = db.get_consecutive_blobs_from_block_number(11, 1).await.unwrap();
        assert_eq!(limited, blobs[1..2].to_vec());

        // no blob starts at block 5.
        assert!(db.get_consecutive_blobs_from_block_number(5, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_blobs() {
        let db = setup_test_db().await;
        let bytes = unstructured_bytes();
        let mut u = Unstructured::new(&bytes);

        for (start, end) in [(1, 10), (11, 20), (21, 30), (31, 40)] {
            db.save_new_blob(record(&mut u, start, end)).await.unwrap();
        }

        assert_eq!(db.delete_blobs_up_to_end_block_number(20).await.unwrap(), 2);
        assert_eq!(db.delete_blobs_after_block_number(30).await.unwrap(), 1);

        let remaining = db.get_consecutive_blobs_from_block_number(21, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].interval().to_string(), "[21..30]10");
    }
}
