//! The crate exposes the collaborators consumed by the blob compression proof coordinator: the
//! zk state provider, the prover client and the downstream proof handler.

pub use handler::{BlobCompressionProofHandler, ProofHandlerError};
mod handler;

pub use prover::{BlobCompressionProofRequest, BlobCompressionProverClient, ProverError};
mod prover;

pub use zk_state::{BlobZkStateProvider, ZkStateProviderError};
mod zk_state;

/// Mock implementations of the providers.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
