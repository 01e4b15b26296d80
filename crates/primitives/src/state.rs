use alloy_primitives::B256;

/// The zk state roots surrounding a blob.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct BlobZkState {
    /// The state root before the first block of the blob.
    pub parent_state_root_hash: B256,
    /// The state root after the last block of the blob.
    pub final_state_root_hash: B256,
}
