use metrics::{Counter, Gauge, Histogram};
use metrics_derive::Metrics;

/// The metrics for the [`crate::BlobCompressionProofCoordinator`].
#[derive(Metrics, Clone)]
#[metrics(scope = "blob_compression_proof_coordinator")]
pub(crate) struct CoordinatorMetrics {
    /// Number of blobs accepted in the ingestion queue.
    #[metric(describe = "Number of blobs accepted in the ingestion queue")]
    pub(crate) blobs_submitted: Counter,
    /// Number of blobs waiting in the ingestion queue.
    #[metric(describe = "Number of blobs waiting in the ingestion queue")]
    pub(crate) queue_size: Gauge,
    /// Time (s) spent computing the rolling shnarf of a blob.
    #[metric(describe = "Time spent computing the rolling shnarf of a blob (s)")]
    pub(crate) shnarf_calculation_duration: Histogram,
    /// Number of blobs for which a compression proof was received.
    #[metric(describe = "Number of blobs for which a compression proof was received")]
    pub(crate) blobs_proven: Counter,
    /// Number of blobs dropped after a pipeline failure.
    #[metric(describe = "Number of blobs dropped after a pipeline failure")]
    pub(crate) blobs_dropped: Counter,
    /// Number of proofs rejected by the downstream handler.
    #[metric(describe = "Number of proofs rejected by the downstream handler")]
    pub(crate) notification_failures: Counter,
}
