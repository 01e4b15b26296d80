use alloy_primitives::{Bytes, B256};
use blob_coordinator_primitives::{
    Blob, BlobCompressionProof, BlobZkState, ConflationCalculationResult, RollingBlobShnarfResult,
    ShnarfResult,
};

/// An error returned by the [`BlobCompressionProverClient`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProverError {
    /// The prover rejected the request.
    #[error("proof request rejected: {0}")]
    Rejected(String),
    /// The prover could not be reached.
    #[error("prover unavailable: {0}")]
    Unavailable(String),
}

/// A request for the compression proof of a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobCompressionProofRequest {
    /// The compressed blob data.
    pub compressed_data: Bytes,
    /// The batches of the blob, in order.
    pub conflations: Vec<ConflationCalculationResult>,
    /// The state root before the blob.
    pub parent_state_root_hash: B256,
    /// The state root after the blob.
    pub final_state_root_hash: B256,
    /// The data hash of the parent blob.
    pub parent_data_hash: B256,
    /// The shnarf of the parent blob.
    pub prev_shnarf: B256,
    /// The shnarf result of the blob.
    pub expected_shnarf_result: ShnarfResult,
    /// The KZG commitment to the blob.
    pub commitment: Bytes,
    /// The KZG proof for the rollup contract.
    pub kzg_proof_contract: Bytes,
    /// The KZG proof for the blob side-car.
    pub kzg_proof_side_car: Bytes,
    /// The timestamp of the first block of the blob.
    pub blob_start_block_time: u64,
    /// The timestamp of the last block of the blob.
    pub blob_end_block_time: u64,
}

impl BlobCompressionProofRequest {
    /// Returns the request for the blob, given its zk state and rolling shnarf result.
    pub fn new(blob: &Blob, zk_state: BlobZkState, chain_state: &RollingBlobShnarfResult) -> Self {
        let shnarf_result = &chain_state.shnarf_result;
        Self {
            compressed_data: blob.compressed_data().clone(),
            conflations: blob.conflations().to_vec(),
            parent_state_root_hash: zk_state.parent_state_root_hash,
            final_state_root_hash: zk_state.final_state_root_hash,
            parent_data_hash: chain_state.parent_blob_hash,
            prev_shnarf: chain_state.parent_blob_shnarf,
            commitment: shnarf_result.commitment.clone(),
            kzg_proof_contract: shnarf_result.kzg_proof_contract.clone(),
            kzg_proof_side_car: shnarf_result.kzg_proof_side_car.clone(),
            expected_shnarf_result: shnarf_result.clone(),
            blob_start_block_time: blob.start_block_time(),
            blob_end_block_time: blob.end_block_time(),
        }
    }

    /// Returns the first block number covered by the request.
    pub fn start_block_number(&self) -> Option<u64> {
        self.conflations.first().map(|c| c.start_block_number)
    }
}

/// An instance of the trait can request compression proofs from a prover.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait BlobCompressionProverClient: Send + Sync {
    /// Requests the compression proof of a blob and waits for the response.
    async fn request_blob_compression_proof(
        &self,
        request: BlobCompressionProofRequest,
    ) -> Result<BlobCompressionProof, ProverError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBlobCompressionProverClient;

    fn shnarf_result() -> ShnarfResult {
        ShnarfResult {
            data_hash: B256::repeat_byte(1),
            snark_hash: B256::repeat_byte(2),
            expected_x: B256::repeat_byte(3),
            expected_y: B256::repeat_byte(4),
            expected_shnarf: B256::repeat_byte(5),
            commitment: Bytes::from_static(&[6; 48]),
            kzg_proof_contract: Bytes::from_static(&[7; 48]),
            kzg_proof_side_car: Bytes::from_static(&[8; 48]),
        }
    }

    #[test]
    fn test_request_from_blob_and_chain_state() {
        let blob = Blob::new(
            vec![ConflationCalculationResult::new(11, 12), ConflationCalculationResult::new(13, 20)],
            Bytes::from_static(b"compressed"),
            1_700_000_000,
            1_700_000_024,
        )
        .unwrap();
        let zk_state = BlobZkState {
            parent_state_root_hash: B256::repeat_byte(0xa),
            final_state_root_hash: B256::repeat_byte(0xb),
        };
        let chain_state = RollingBlobShnarfResult {
            parent_blob_hash: B256::repeat_byte(0xc),
            parent_blob_shnarf: B256::repeat_byte(0xd),
            shnarf_result: shnarf_result(),
        };

        let request = BlobCompressionProofRequest::new(&blob, zk_state, &chain_state);

        assert_eq!(request.start_block_number(), Some(11));
        assert_eq!(request.conflations.len(), 2);
        assert_eq!(request.parent_data_hash, B256::repeat_byte(0xc));
        assert_eq!(request.prev_shnarf, B256::repeat_byte(0xd));
        assert_eq!(request.final_state_root_hash, B256::repeat_byte(0xb));
        assert_eq!(request.commitment, Bytes::from_static(&[6; 48]));
        assert_eq!(request.blob_end_block_time, 1_700_000_024);
    }

    #[tokio::test]
    async fn test_mock_prover_failure_injection() {
        let blob = Blob::new(vec![ConflationCalculationResult::new(1, 1)], Bytes::new(), 0, 0)
            .unwrap();
        let chain_state = RollingBlobShnarfResult {
            parent_blob_hash: B256::ZERO,
            parent_blob_shnarf: B256::ZERO,
            shnarf_result: shnarf_result(),
        };
        let request = BlobCompressionProofRequest::new(&blob, Default::default(), &chain_state);
        let prover = MockBlobCompressionProverClient::default();

        let proof = prover.request_blob_compression_proof(request.clone()).await.unwrap();
        assert_eq!(proof, MockBlobCompressionProverClient::proof_for(&request));

        prover.fail_for_start_block(1);
        assert!(matches!(
            prover.request_blob_compression_proof(request).await,
            Err(ProverError::Rejected(_))
        ));
        assert_eq!(prover.requests().len(), 2);
    }
}
