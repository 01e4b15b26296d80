use crate::BlockInterval;

/// The result of the conflation of L2 blocks into a batch.
///
/// Conflation results are produced upstream and are immutable once created.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ConflationCalculationResult {
    /// The first block number of the batch.
    pub start_block_number: u64,
    /// The last block number of the batch, inclusive.
    pub end_block_number: u64,
}

impl ConflationCalculationResult {
    /// Returns a new instance of [`ConflationCalculationResult`].
    pub const fn new(start_block_number: u64, end_block_number: u64) -> Self {
        Self { start_block_number, end_block_number }
    }

    /// Returns the [`BlockInterval`] of the batch.
    pub const fn interval(&self) -> BlockInterval {
        BlockInterval {
            start_block_number: self.start_block_number,
            end_block_number: self.end_block_number,
        }
    }
}

#[cfg(feature = "arbitrary")]
impl arbitrary::Arbitrary<'_> for ConflationCalculationResult {
    fn arbitrary(u: &mut arbitrary::Unstructured<'_>) -> arbitrary::Result<Self> {
        let start_block_number = u.int_in_range(1..=u32::MAX)? as u64;
        let len = u.int_in_range(0..=64u64)?;
        Ok(Self::new(start_block_number, start_block_number + len))
    }
}
