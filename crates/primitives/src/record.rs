use crate::{Blob, BlockInterval, ChainCursor, ShnarfResult};

use alloy_primitives::{Bytes, B256};
use derive_more::{Deref, From};

/// The status of a persisted blob.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub enum BlobStatus {
    /// A compression proof was requested for the blob.
    CompressionProving,
    /// The compression proof of the blob was received.
    CompressionProven,
}

impl BlobStatus {
    /// Returns the integer representation of the [`BlobStatus`].
    pub const fn as_i16(&self) -> i16 {
        match self {
            Self::CompressionProving => 1,
            Self::CompressionProven => 2,
        }
    }

    /// Returns the [`BlobStatus`] for the provided integer representation.
    pub const fn from_i16(value: i16) -> Option<Self> {
        match value {
            1 => Some(Self::CompressionProving),
            2 => Some(Self::CompressionProven),
            _ => None,
        }
    }
}

/// An opaque compression proof returned by the prover.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, From, Deref)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BlobCompressionProof(pub Bytes);

/// The persisted projection of a proven blob.
///
/// A record is created once, after a successful proof response, and is keyed by its block
/// interval.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
pub struct BlobRecord {
    /// The first block number of the blob.
    pub start_block_number: u64,
    /// The last block number of the blob.
    pub end_block_number: u64,
    /// The data hash of the blob.
    pub blob_hash: B256,
    /// The timestamp of the first block.
    pub start_block_time: u64,
    /// The timestamp of the last block.
    pub end_block_time: u64,
    /// The number of batches in the blob.
    pub batches_count: u32,
    /// The status of the blob.
    pub status: BlobStatus,
    /// The shnarf expected on L1 once the blob is submitted.
    pub expected_shnarf: B256,
    /// The compression proof of the blob.
    pub blob_compression_proof: BlobCompressionProof,
}

impl BlobRecord {
    /// Returns the [`BlobRecord`] of a blob for which a compression proof was received.
    pub fn proven(blob: &Blob, shnarf_result: &ShnarfResult, proof: BlobCompressionProof) -> Self {
        Self {
            start_block_number: blob.start_block_number(),
            end_block_number: blob.end_block_number(),
            blob_hash: shnarf_result.data_hash,
            start_block_time: blob.start_block_time(),
            end_block_time: blob.end_block_time(),
            batches_count: blob.batches_count(),
            status: BlobStatus::CompressionProven,
            expected_shnarf: shnarf_result.expected_shnarf,
            blob_compression_proof: proof,
        }
    }

    /// Returns the block interval of the record.
    pub const fn interval(&self) -> BlockInterval {
        BlockInterval {
            start_block_number: self.start_block_number,
            end_block_number: self.end_block_number,
        }
    }

    /// Returns the [`ChainCursor`] pointing at this blob, used to resume the shnarf chain.
    pub const fn cursor(&self) -> ChainCursor {
        ChainCursor {
            data_hash: self.blob_hash,
            shnarf: self.expected_shnarf,
            end_block_number: Some(self.end_block_number),
        }
    }
}

/// A new compression proof, forwarded to the downstream aggregation stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobCompressionProofUpdate {
    /// The block interval of the proven blob.
    pub block_interval: BlockInterval,
    /// The compression proof.
    pub blob_compression_proof: BlobCompressionProof,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConflationCalculationResult;

    #[test]
    fn test_blob_status_round_trip() {
        for status in [BlobStatus::CompressionProving, BlobStatus::CompressionProven] {
            assert_eq!(BlobStatus::from_i16(status.as_i16()), Some(status));
        }
        assert_eq!(BlobStatus::from_i16(0), None);
    }

    #[test]
    fn test_proven_record_from_blob() {
        let blob = Blob::new(
            vec![ConflationCalculationResult::new(11, 15), ConflationCalculationResult::new(16, 20)],
            Bytes::from_static(b"compressed"),
            1_000,
            1_040,
        )
        .unwrap();
        let shnarf_result = ShnarfResult {
            data_hash: B256::repeat_byte(1),
            snark_hash: B256::repeat_byte(2),
            expected_x: B256::repeat_byte(3),
            expected_y: B256::repeat_byte(4),
            expected_shnarf: B256::repeat_byte(5),
            commitment: Bytes::new(),
            kzg_proof_contract: Bytes::new(),
            kzg_proof_side_car: Bytes::new(),
        };
        let proof = BlobCompressionProof(Bytes::from_static(b"proof"));

        let record = BlobRecord::proven(&blob, &shnarf_result, proof.clone());

        assert_eq!(record.interval(), blob.interval());
        assert_eq!(record.batches_count, 2);
        assert_eq!(record.status, BlobStatus::CompressionProven);
        assert_eq!(record.blob_hash, B256::repeat_byte(1));
        assert_eq!(record.blob_compression_proof, proof);
        assert_eq!(
            record.cursor(),
            ChainCursor::new(B256::repeat_byte(1), B256::repeat_byte(5), Some(20))
        );
    }
}
