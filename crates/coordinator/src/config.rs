use std::time::Duration;

use alloy_primitives::B256;
use blob_coordinator_primitives::ChainCursor;

/// The default interval between two scheduler ticks.
pub const DEFAULT_POLLING_INTERVAL: Duration = Duration::from_secs(1);

/// The default capacity of the ingestion queue, larger than any expected burst of blobs between
/// two ticks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1000;

/// Configuration for the [`crate::BlobCompressionProofCoordinator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// The interval between two scheduler ticks. Each tick dequeues at most one blob.
    pub polling_interval: Duration,
    /// The capacity of the ingestion queue. Submissions wait while the queue is full.
    pub queue_capacity: usize,
}

impl CoordinatorConfig {
    /// Returns a new [`CoordinatorConfig`].
    pub const fn new(polling_interval: Duration, queue_capacity: usize) -> Self {
        Self { polling_interval, queue_capacity }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POLLING_INTERVAL, DEFAULT_QUEUE_CAPACITY)
    }
}

/// The chain state the shnarf chain starts from when no proven blob was persisted yet.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenesisChainState {
    /// The shnarf preceding the first blob.
    pub shnarf: B256,
    /// The data hash preceding the first blob.
    pub data_hash: B256,
    /// The last block number before the first blob, if known.
    pub end_block_number: Option<u64>,
}

impl GenesisChainState {
    /// Returns the [`ChainCursor`] of the genesis state.
    pub const fn cursor(&self) -> ChainCursor {
        ChainCursor::new(self.data_hash, self.shnarf, self.end_block_number)
    }
}
