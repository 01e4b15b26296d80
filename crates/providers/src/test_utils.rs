//! Test utils for providers.

use crate::{
    BlobCompressionProofHandler, BlobCompressionProofRequest, BlobCompressionProverClient,
    BlobZkStateProvider, ProofHandlerError, ProverError, ZkStateProviderError,
};
use std::{collections::HashSet, time::Duration};

use alloy_primitives::{keccak256, B256};
use blob_coordinator_primitives::{
    BlobCompressionProof, BlobCompressionProofUpdate, BlobZkState, BlockInterval,
};
use parking_lot::Mutex;

/// Returns the mocked state root after the provided block.
pub fn mock_state_root(block_number: u64) -> B256 {
    keccak256(block_number.to_be_bytes())
}

/// A [`BlobZkStateProvider`] deriving the state root of each block from its number.
#[derive(Debug, Default)]
pub struct MockBlobZkStateProvider {
    /// Requests for intervals starting at these block numbers fail.
    failing_start_blocks: Mutex<HashSet<u64>>,
    /// The requested intervals, in order.
    requests: Mutex<Vec<BlockInterval>>,
}

impl MockBlobZkStateProvider {
    /// Makes the provider fail for intervals starting at `block_number`.
    pub fn fail_for_start_block(&self, block_number: u64) {
        self.failing_start_blocks.lock().insert(block_number);
    }

    /// Returns the requested intervals, in order.
    pub fn requests(&self) -> Vec<BlockInterval> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl BlobZkStateProvider for MockBlobZkStateProvider {
    async fn get_blob_zk_state(
        &self,
        interval: BlockInterval,
    ) -> Result<BlobZkState, ZkStateProviderError> {
        self.requests.lock().push(interval);
        if self.failing_start_blocks.lock().contains(&interval.start_block_number) {
            return Err(ZkStateProviderError::Unavailable(interval));
        }
        Ok(BlobZkState {
            parent_state_root_hash: mock_state_root(interval.start_block_number.saturating_sub(1)),
            final_state_root_hash: mock_state_root(interval.end_block_number),
        })
    }
}

/// A [`BlobCompressionProverClient`] answering every request with a proof derived from the
/// expected shnarf.
#[derive(Debug, Default)]
pub struct MockBlobCompressionProverClient {
    /// Requests for blobs starting at these block numbers fail.
    failing_start_blocks: Mutex<HashSet<u64>>,
    /// The received requests, in order.
    requests: Mutex<Vec<BlobCompressionProofRequest>>,
    /// The time taken to answer a request.
    delay: Duration,
}

impl MockBlobCompressionProverClient {
    /// Returns a prover client answering each request after `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Default::default() }
    }

    /// Makes the prover fail for blobs starting at `block_number`.
    pub fn fail_for_start_block(&self, block_number: u64) {
        self.failing_start_blocks.lock().insert(block_number);
    }

    /// Returns the received requests, in order.
    pub fn requests(&self) -> Vec<BlobCompressionProofRequest> {
        self.requests.lock().clone()
    }

    /// Returns the proof the mock answers for the request.
    pub fn proof_for(request: &BlobCompressionProofRequest) -> BlobCompressionProof {
        let digest = keccak256(request.expected_shnarf_result.expected_shnarf);
        BlobCompressionProof(digest.to_vec().into())
    }
}

#[async_trait::async_trait]
impl BlobCompressionProverClient for MockBlobCompressionProverClient {
    async fn request_blob_compression_proof(
        &self,
        request: BlobCompressionProofRequest,
    ) -> Result<BlobCompressionProof, ProverError> {
        self.requests.lock().push(request.clone());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let start = request.start_block_number().unwrap_or_default();
        if self.failing_start_blocks.lock().contains(&start) {
            return Err(ProverError::Rejected(format!(
                "injected failure for blob starting at {start}"
            )));
        }
        Ok(Self::proof_for(&request))
    }
}

/// A [`BlobCompressionProofHandler`] recording the accepted proofs.
#[derive(Debug, Default)]
pub struct MockBlobCompressionProofHandler {
    /// Updates for blobs starting at these block numbers fail.
    failing_start_blocks: Mutex<HashSet<u64>>,
    /// The accepted updates, in order.
    updates: Mutex<Vec<BlobCompressionProofUpdate>>,
}

impl MockBlobCompressionProofHandler {
    /// Makes the handler fail for blobs starting at `block_number`.
    pub fn fail_for_start_block(&self, block_number: u64) {
        self.failing_start_blocks.lock().insert(block_number);
    }

    /// Returns the accepted updates, in order.
    pub fn updates(&self) -> Vec<BlobCompressionProofUpdate> {
        self.updates.lock().clone()
    }
}

#[async_trait::async_trait]
impl BlobCompressionProofHandler for MockBlobCompressionProofHandler {
    async fn accept_new_blob_compression_proof(
        &self,
        update: BlobCompressionProofUpdate,
    ) -> Result<(), ProofHandlerError> {
        let interval = update.block_interval;
        if self.failing_start_blocks.lock().contains(&interval.start_block_number) {
            return Err(ProofHandlerError(format!("injected failure for blob {interval}")));
        }
        self.updates.lock().push(update);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_zk_state_links_consecutive_intervals() {
        let provider = MockBlobZkStateProvider::default();
        let first = provider
            .get_blob_zk_state(BlockInterval::between(1, 10).unwrap())
            .await
            .unwrap();
        let second = provider
            .get_blob_zk_state(BlockInterval::between(11, 20).unwrap())
            .await
            .unwrap();

        assert_eq!(first.final_state_root_hash, second.parent_state_root_hash);
        assert_eq!(provider.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_mock_zk_state_failure() {
        let provider = MockBlobZkStateProvider::default();
        provider.fail_for_start_block(5);
        let interval = BlockInterval::between(5, 6).unwrap();

        assert_eq!(
            provider.get_blob_zk_state(interval).await,
            Err(ZkStateProviderError::Unavailable(interval))
        );
    }

    #[tokio::test]
    async fn test_mock_handler_records_updates() {
        let handler = MockBlobCompressionProofHandler::default();
        handler.fail_for_start_block(11);
        let update = |start, end| BlobCompressionProofUpdate {
            block_interval: BlockInterval::between(start, end).unwrap(),
            blob_compression_proof: Default::default(),
        };

        handler.accept_new_blob_compression_proof(update(1, 10)).await.unwrap();
        assert!(handler.accept_new_blob_compression_proof(update(11, 20)).await.is_err());
        assert_eq!(handler.updates(), vec![update(1, 10)]);
    }
}
