/// An error occurred while computing the shnarf of a blob.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShnarfCalculatorError {
    /// The blob does not start right after the last block of the previous blob.
    #[error("blob starts at block {got}, expected block {expected} after the previous blob")]
    NonContiguousBlob {
        /// The block number the blob was expected to start at.
        expected: u64,
        /// The block number the blob actually starts at.
        got: u64,
    },
    /// The previous blob ends at the last representable block number.
    #[error("no blob can follow block {0}")]
    ChainEnd(u64),
    /// The blob conflation order contains no batch.
    #[error("empty conflation order")]
    EmptyConflationOrder,
    /// The underlying calculator failed.
    #[error("shnarf calculation failed: {0}")]
    Calculation(String),
}
