use blob_coordinator_primitives::{BlockInterval, ChainCursor};
use std::fmt;

/// A stage of the per blob processing pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Resolution of the zk state roots.
    ZkState,
    /// Computation of the rolling shnarf.
    Shnarf,
    /// Compression proof request.
    Proof,
    /// Persistence of the blob record.
    Persistence,
}

impl PipelineStage {
    /// Returns the str representation of the [`PipelineStage`].
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ZkState => "zk_state",
            Self::Shnarf => "shnarf",
            Self::Proof => "proof",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An event emitted by the [`crate::BlobCompressionProofCoordinator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// A blob was accepted in the ingestion queue.
    BlobQueued(BlockInterval),
    /// The rolling shnarf of a blob was computed and the chain cursor advanced.
    ShnarfCalculated {
        /// The block interval of the blob.
        interval: BlockInterval,
        /// The new chain cursor.
        cursor: ChainCursor,
    },
    /// The compression proof of a blob was received.
    BlobProven(BlockInterval),
    /// The proven blob was persisted.
    BlobPersisted(BlockInterval),
    /// The downstream handler rejected the proof of a blob. The blob persistence is not affected.
    NotificationFailed {
        /// The block interval of the blob.
        interval: BlockInterval,
        /// The error message.
        error: String,
    },
    /// The processing of a blob failed at the provided stage. The blob is not requeued.
    BlobDropped {
        /// The block interval of the blob.
        interval: BlockInterval,
        /// The stage that failed.
        stage: PipelineStage,
        /// The error message.
        error: String,
    },
}
