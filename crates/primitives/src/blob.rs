use crate::{BlobError, BlockInterval, BlockIntervals, ConflationCalculationResult};
use std::vec::Vec;

use alloy_primitives::Bytes;

/// A blob: a contiguous run of conflated batches along with their compressed payload.
///
/// The block interval of the blob is the span of its first and last conflation. A [`Blob`] can
/// only be built through [`Blob::new`], which enforces that the conflation list is non-empty and
/// contiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    /// The batches contained in the blob, in order.
    conflations: Vec<ConflationCalculationResult>,
    /// The compressed payload of the blob.
    compressed_data: Bytes,
    /// The timestamp of the first block of the blob.
    start_block_time: u64,
    /// The timestamp of the last block of the blob.
    end_block_time: u64,
}

impl Blob {
    /// Returns a new [`Blob`] after checking the conflations are non-empty and contiguous.
    pub fn new(
        conflations: Vec<ConflationCalculationResult>,
        compressed_data: Bytes,
        start_block_time: u64,
        end_block_time: u64,
    ) -> Result<Self, BlobError> {
        if conflations.is_empty() {
            return Err(BlobError::EmptyConflations);
        }
        for conflation in &conflations {
            BlockInterval::between(conflation.start_block_number, conflation.end_block_number)?;
        }
        for pair in conflations.windows(2) {
            let (previous, next) = (pair[0].interval(), pair[1].interval());
            if !previous.is_followed_by(&next) {
                return Err(BlobError::NonContiguousConflations { previous, next });
            }
        }
        if start_block_time > end_block_time {
            return Err(BlobError::InvalidTimeRange { start: start_block_time, end: end_block_time });
        }

        Ok(Self { conflations, compressed_data, start_block_time, end_block_time })
    }

    /// Returns the block interval covered by the blob.
    pub fn interval(&self) -> BlockInterval {
        BlockInterval {
            start_block_number: self.start_block_number(),
            end_block_number: self.end_block_number(),
        }
    }

    /// Returns the first block number of the blob.
    pub fn start_block_number(&self) -> u64 {
        self.conflations.first().map(|c| c.start_block_number).unwrap_or_default()
    }

    /// Returns the last block number of the blob.
    pub fn end_block_number(&self) -> u64 {
        self.conflations.last().map(|c| c.end_block_number).unwrap_or_default()
    }

    /// Returns the batches of the blob.
    pub fn conflations(&self) -> &[ConflationCalculationResult] {
        &self.conflations
    }

    /// Returns the number of batches in the blob.
    pub fn batches_count(&self) -> u32 {
        self.conflations.len() as u32
    }

    /// Returns the conflation order of the blob: its starting block number and the end block
    /// number of every batch.
    pub fn conflation_order(&self) -> BlockIntervals {
        BlockIntervals {
            starting_block_number: self.start_block_number(),
            upper_boundaries: self.conflations.iter().map(|c| c.end_block_number).collect(),
        }
    }

    /// Returns the compressed payload.
    pub const fn compressed_data(&self) -> &Bytes {
        &self.compressed_data
    }

    /// Returns the timestamp of the first block.
    pub const fn start_block_time(&self) -> u64 {
        self.start_block_time
    }

    /// Returns the timestamp of the last block.
    pub const fn end_block_time(&self) -> u64 {
        self.end_block_time
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for Blob {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let mut start = u.int_in_range(1..=u32::MAX)? as u64;
        let batches = u.int_in_range(1..=8usize)?;
        let mut conflations = Vec::with_capacity(batches);
        for _ in 0..batches {
            let end = start + u.int_in_range(0..=32u64)?;
            conflations.push(ConflationCalculationResult::new(start, end));
            start = end + 1;
        }
        let compressed_data = u.arbitrary::<Bytes>()?;
        let start_block_time = u.int_in_range(0..=u32::MAX)? as u64;
        let end_block_time = start_block_time + u.int_in_range(0..=3_600u64)?;

        Self::new(conflations, compressed_data, start_block_time, end_block_time)
            .map_err(|_| arbitrary::Error::IncorrectFormat)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflations(boundaries: &[(u64, u64)]) -> Vec<ConflationCalculationResult> {
        boundaries.iter().map(|&(s, e)| ConflationCalculationResult::new(s, e)).collect()
    }

    #[test]
    fn test_blob_interval_spans_conflations() {
        let blob =
            Blob::new(conflations(&[(1, 3), (4, 9), (10, 10)]), Bytes::from_static(b"data"), 100, 120)
                .unwrap();

        assert_eq!(blob.interval(), BlockInterval::between(1, 10).unwrap());
        assert_eq!(blob.batches_count(), 3);
        assert_eq!(
            blob.conflation_order(),
            BlockIntervals { starting_block_number: 1, upper_boundaries: vec![3, 9, 10] }
        );
    }

    #[test]
    fn test_blob_single_block_conflation() {
        let blob = Blob::new(conflations(&[(7, 7)]), Bytes::new(), 5, 5).unwrap();
        assert_eq!(blob.start_block_number(), 7);
        assert_eq!(blob.end_block_number(), 7);
        assert_eq!(blob.batches_count(), 1);
    }

    #[test]
    fn test_blob_rejects_invalid_conflations() {
        assert_eq!(Blob::new(vec![], Bytes::new(), 0, 0), Err(BlobError::EmptyConflations));

        let err = Blob::new(conflations(&[(1, 3), (5, 9)]), Bytes::new(), 0, 0).unwrap_err();
        assert_eq!(
            err,
            BlobError::NonContiguousConflations {
                previous: BlockInterval { start_block_number: 1, end_block_number: 3 },
                next: BlockInterval { start_block_number: 5, end_block_number: 9 },
            }
        );

        let err = Blob::new(conflations(&[(3, 1)]), Bytes::new(), 0, 0).unwrap_err();
        assert_eq!(err, BlobError::InvalidInterval { start: 3, end: 1 });

        let err = Blob::new(conflations(&[(1, 1)]), Bytes::new(), 10, 9).unwrap_err();
        assert_eq!(err, BlobError::InvalidTimeRange { start: 10, end: 9 });
    }
}
