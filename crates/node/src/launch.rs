use std::sync::Arc;

use blob_coordinator::GenesisChainState;
use blob_coordinator_db::{BlobsRepository, DatabaseError};
use blob_coordinator_primitives::ChainCursor;
use blob_coordinator_providers::{
    test_utils::{
        MockBlobCompressionProofHandler, MockBlobCompressionProverClient, MockBlobZkStateProvider,
    },
    BlobCompressionProofHandler, BlobCompressionProverClient, BlobZkStateProvider,
};
use blob_coordinator_shnarf::{test_utils::MockBlobShnarfCalculator, BlobShnarfCalculator};

/// The external collaborators of the coordinator.
#[derive(Clone)]
pub struct CoordinatorCollaborators {
    /// Provides the parent and final state roots of a blob.
    pub zk_state_provider: Arc<dyn BlobZkStateProvider>,
    /// Computes the shnarf of a single blob.
    pub shnarf_calculator: Arc<dyn BlobShnarfCalculator>,
    /// Produces compression proofs.
    pub prover: Arc<dyn BlobCompressionProverClient>,
    /// Receives each new compression proof.
    pub proof_handler: Arc<dyn BlobCompressionProofHandler>,
}

impl std::fmt::Debug for CoordinatorCollaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorCollaborators").finish_non_exhaustive()
    }
}

impl CoordinatorCollaborators {
    /// Returns in-process mock collaborators, used by the development binary.
    pub fn mock() -> Self {
        Self {
            zk_state_provider: Arc::new(MockBlobZkStateProvider::default()),
            shnarf_calculator: Arc::new(MockBlobShnarfCalculator::default()),
            prover: Arc::new(MockBlobCompressionProverClient::default()),
            proof_handler: Arc::new(MockBlobCompressionProofHandler::default()),
        }
    }
}

/// Returns the [`ChainCursor`] the shnarf chain resumes from: the latest persisted blob if any,
/// the genesis state otherwise.
pub async fn resolve_chain_cursor(
    repository: &dyn BlobsRepository,
    genesis: GenesisChainState,
) -> Result<ChainCursor, DatabaseError> {
    Ok(match repository.get_latest_blob().await? {
        Some(blob) => {
            tracing::info!(target: "blob_coordinator::node", blob = %blob.interval(), "Resuming from latest persisted blob");
            blob.cursor()
        }
        None => genesis.cursor(),
    })
}
