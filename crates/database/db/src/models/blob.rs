use crate::DatabaseError;

use alloy_primitives::B256;
use blob_coordinator_primitives::{BlobCompressionProof, BlobRecord, BlobStatus};
use sea_orm::{entity::prelude::*, ActiveValue};

/// A database model that represents a proven blob.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blob")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    start_block_number: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    end_block_number: i64,
    start_block_time: i64,
    end_block_time: i64,
    batches_count: i32,
    status: i16,
    blob_hash: Vec<u8>,
    expected_shnarf: Vec<u8>,
    blob_compression_proof: Vec<u8>,
}

/// The relation for the blob model.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

/// The active model behavior for the blob model.
impl ActiveModelBehavior for ActiveModel {}

impl From<BlobRecord> for ActiveModel {
    fn from(record: BlobRecord) -> Self {
        Self {
            start_block_number: ActiveValue::Set(record.start_block_number as i64),
            end_block_number: ActiveValue::Set(record.end_block_number as i64),
            start_block_time: ActiveValue::Set(record.start_block_time as i64),
            end_block_time: ActiveValue::Set(record.end_block_time as i64),
            batches_count: ActiveValue::Set(record.batches_count as i32),
            status: ActiveValue::Set(record.status.as_i16()),
            blob_hash: ActiveValue::Set(record.blob_hash.to_vec()),
            expected_shnarf: ActiveValue::Set(record.expected_shnarf.to_vec()),
            blob_compression_proof: ActiveValue::Set(record.blob_compression_proof.0.to_vec()),
        }
    }
}

impl TryFrom<Model> for BlobRecord {
    type Error = DatabaseError;

    fn try_from(value: Model) -> Result<Self, Self::Error> {
        let hash = |bytes: &[u8], name: &str| {
            B256::try_from(bytes).map_err(|_| {
                DatabaseError::InvalidRecord(format!(
                    "{name} of blob [{}..{}] has {} bytes",
                    value.start_block_number,
                    value.end_block_number,
                    bytes.len()
                ))
            })
        };

        Ok(Self {
            start_block_number: value.start_block_number as u64,
            end_block_number: value.end_block_number as u64,
            blob_hash: hash(&value.blob_hash, "blob hash")?,
            start_block_time: value.start_block_time as u64,
            end_block_time: value.end_block_time as u64,
            batches_count: value.batches_count as u32,
            status: BlobStatus::from_i16(value.status).ok_or_else(|| {
                DatabaseError::InvalidRecord(format!("unknown blob status {}", value.status))
            })?,
            expected_shnarf: hash(&value.expected_shnarf, "expected shnarf")?,
            blob_compression_proof: BlobCompressionProof(value.blob_compression_proof.into()),
        })
    }
}
