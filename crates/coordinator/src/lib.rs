//! The blob compression proof coordinator.
//!
//! The coordinator accepts finished blobs through a bounded FIFO queue, computes the rolling
//! shnarf of each blob strictly in arrival order, requests its compression proof and persists the
//! proven blob while notifying the downstream aggregation stage.

pub use config::{
    CoordinatorConfig, GenesisChainState, DEFAULT_POLLING_INTERVAL, DEFAULT_QUEUE_CAPACITY,
};
mod config;

pub use coordinator::BlobCompressionProofCoordinator;
mod coordinator;

pub use error::CoordinatorError;
mod error;

pub use event::{CoordinatorEvent, PipelineStage};
mod event;

pub use handle::BlobCoordinatorHandle;
mod handle;

mod metrics;

mod scheduler;
