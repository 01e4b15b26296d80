use crate::BlockInterval;

/// Errors raised when constructing a [`crate::Blob`] or a [`BlockInterval`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BlobError {
    /// A blob must contain at least one conflation.
    #[error("blob has no conflations")]
    EmptyConflations,
    /// The interval end is lower than its start.
    #[error("invalid block interval: start {start} > end {end}")]
    InvalidInterval {
        /// The interval start block number.
        start: u64,
        /// The interval end block number.
        end: u64,
    },
    /// Two consecutive conflations do not follow each other.
    #[error("conflations are not contiguous: {previous} followed by {next}")]
    NonContiguousConflations {
        /// The earlier conflation interval.
        previous: BlockInterval,
        /// The conflation interval which should start right after `previous`.
        next: BlockInterval,
    },
    /// The blob start time is after its end time.
    #[error("invalid blob time range: start {start} > end {end}")]
    InvalidTimeRange {
        /// The start block timestamp.
        start: u64,
        /// The end block timestamp.
        end: u64,
    },
}
