use blob_coordinator_primitives::BlobCompressionProofUpdate;

/// An error returned by the [`BlobCompressionProofHandler`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("proof handler error: {0}")]
pub struct ProofHandlerError(pub String);

/// The downstream consumer of new compression proofs.
#[async_trait::async_trait]
#[auto_impl::auto_impl(Arc, &)]
pub trait BlobCompressionProofHandler: Send + Sync {
    /// Accepts the compression proof of a blob.
    async fn accept_new_blob_compression_proof(
        &self,
        update: BlobCompressionProofUpdate,
    ) -> Result<(), ProofHandlerError>;
}
