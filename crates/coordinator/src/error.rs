use crate::PipelineStage;

use blob_coordinator_db::DatabaseError;
use blob_coordinator_providers::{ProverError, ZkStateProviderError};
use blob_coordinator_shnarf::ShnarfCalculatorError;

/// A type that represents an error that occurred in the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CoordinatorError {
    /// The coordinator was dropped and no longer accepts blobs.
    #[error("the coordinator queue is closed")]
    QueueClosed,
    /// The zk state of the blob could not be resolved.
    #[error("failed to resolve zk state: {0}")]
    ZkState(#[from] ZkStateProviderError),
    /// The shnarf of the blob could not be computed.
    #[error("failed to compute shnarf: {0}")]
    Shnarf(#[from] ShnarfCalculatorError),
    /// The shnarf calculation task panicked or was cancelled.
    #[error("shnarf calculation task failed: {0}")]
    ShnarfTask(String),
    /// The prover failed to produce the compression proof.
    #[error("compression proof request failed: {0}")]
    Prover(#[from] ProverError),
    /// The blob could not be persisted.
    #[error("failed to persist blob: {0}")]
    Persistence(#[from] DatabaseError),
}

impl CoordinatorError {
    /// Returns the [`PipelineStage`] at which the error occurred, if any.
    pub const fn stage(&self) -> Option<PipelineStage> {
        match self {
            Self::QueueClosed => None,
            Self::ZkState(_) => Some(PipelineStage::ZkState),
            Self::Shnarf(_) | Self::ShnarfTask(_) => Some(PipelineStage::Shnarf),
            Self::Prover(_) => Some(PipelineStage::Proof),
            Self::Persistence(_) => Some(PipelineStage::Persistence),
        }
    }
}
