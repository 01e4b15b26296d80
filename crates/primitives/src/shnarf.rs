use alloy_primitives::{Bytes, B256};

/// The result of a shnarf calculation for a single blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShnarfResult {
    /// The versioned hash of the blob data.
    pub data_hash: B256,
    /// The snark friendly hash of the compressed data.
    pub snark_hash: B256,
    /// The evaluation point of the blob polynomial.
    pub expected_x: B256,
    /// The evaluation claim of the blob polynomial at `expected_x`.
    pub expected_y: B256,
    /// The shnarf chaining this blob to its parent.
    pub expected_shnarf: B256,
    /// The KZG commitment to the blob.
    pub commitment: Bytes,
    /// The KZG proof submitted to the rollup contract.
    pub kzg_proof_contract: Bytes,
    /// The KZG proof attached to the blob side-car.
    pub kzg_proof_side_car: Bytes,
}

/// The chain state produced for a blob: the parent links plus the new [`ShnarfResult`].
///
/// For two consecutive blobs N and N+1, `parent_blob_hash` and `parent_blob_shnarf` of N+1 are
/// equal to `shnarf_result.data_hash` and `shnarf_result.expected_shnarf` of N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollingBlobShnarfResult {
    /// The data hash of the parent blob.
    pub parent_blob_hash: B256,
    /// The shnarf of the parent blob.
    pub parent_blob_shnarf: B256,
    /// The shnarf result of the blob.
    pub shnarf_result: ShnarfResult,
}

impl RollingBlobShnarfResult {
    /// Returns the [`ChainCursor`] pointing at the blob that produced this result.
    pub fn cursor(&self, end_block_number: u64) -> ChainCursor {
        ChainCursor {
            data_hash: self.shnarf_result.data_hash,
            shnarf: self.shnarf_result.expected_shnarf,
            end_block_number: Some(end_block_number),
        }
    }
}

/// The tip of the shnarf chain: the data hash and shnarf of the last blob whose chain state was
/// computed, and the last block it covered.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct ChainCursor {
    /// The data hash of the last blob.
    pub data_hash: B256,
    /// The shnarf of the last blob.
    pub shnarf: B256,
    /// The last block number covered by the last blob, unknown for a genesis cursor without a
    /// block anchor.
    pub end_block_number: Option<u64>,
}

impl ChainCursor {
    /// Returns a new [`ChainCursor`].
    pub const fn new(data_hash: B256, shnarf: B256, end_block_number: Option<u64>) -> Self {
        Self { data_hash, shnarf, end_block_number }
    }

    /// Returns the block number the next blob is expected to start at, if known.
    ///
    /// Returns [`None`] when the last block is unknown or is the last representable block.
    pub fn expected_next_block_number(&self) -> Option<u64> {
        self.end_block_number.and_then(|n| n.checked_add(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_next_block_number() {
        let cursor = ChainCursor::new(B256::ZERO, B256::ZERO, Some(10));
        assert_eq!(cursor.expected_next_block_number(), Some(11));
        let cursor = ChainCursor::new(B256::ZERO, B256::ZERO, None);
        assert_eq!(cursor.expected_next_block_number(), None);
        assert_eq!(
            ChainCursor::new(B256::ZERO, B256::ZERO, Some(u64::MAX)).expected_next_block_number(),
            None
        );
    }
}
