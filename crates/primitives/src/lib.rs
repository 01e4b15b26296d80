//! Primitive types for the blob compression proof coordinator.

pub use batch::ConflationCalculationResult;
mod batch;

pub use blob::Blob;
mod blob;

pub use block::{BlockInterval, BlockIntervals};
mod block;

pub use error::BlobError;
mod error;

pub use record::{BlobCompressionProof, BlobCompressionProofUpdate, BlobRecord, BlobStatus};
mod record;

pub use shnarf::{ChainCursor, RollingBlobShnarfResult, ShnarfResult};
mod shnarf;

pub use state::BlobZkState;
mod state;
