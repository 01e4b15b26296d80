use blob_coordinator_primitives::{BlobZkState, BlockInterval};

/// An error occurring at the [`BlobZkStateProvider`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZkStateProviderError {
    /// The state roots for the interval are not available yet.
    #[error("zk state unavailable for blocks {0}")]
    Unavailable(BlockInterval),
    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// An instance of the trait resolves the zk state roots surrounding a block interval.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait BlobZkStateProvider: Send + Sync {
    /// Returns the parent and final state root hashes of the interval.
    async fn get_blob_zk_state(
        &self,
        interval: BlockInterval,
    ) -> Result<BlobZkState, ZkStateProviderError>;
}
