use crate::{BlobShnarfCalculator, ShnarfCalculatorError};

use blob_coordinator_primitives::{BlobZkState, BlockIntervals, ChainCursor, RollingBlobShnarfResult};

/// The per-blob inputs of a rolling shnarf calculation.
#[derive(Debug, Clone, Copy)]
pub struct ShnarfInput<'a> {
    /// The compressed blob data.
    pub compressed_data: &'a [u8],
    /// The zk state roots surrounding the blob.
    pub zk_state: BlobZkState,
    /// The conflation order of the blob.
    pub conflation_order: &'a BlockIntervals,
}

/// Chains shnarf calculations from one blob to the next.
///
/// The calculator does not own the chain state: every call receives the [`ChainCursor`] of the
/// previous blob and returns a [`RollingBlobShnarfResult`] from which the next cursor is derived.
/// The caller replaces its cursor only when the calculation succeeds.
#[derive(Debug, Clone)]
pub struct RollingBlobShnarfCalculator<C> {
    /// The single blob shnarf calculator.
    calculator: C,
}

impl<C: BlobShnarfCalculator> RollingBlobShnarfCalculator<C> {
    /// Returns a new [`RollingBlobShnarfCalculator`] wrapping the provided calculator.
    pub const fn new(calculator: C) -> Self {
        Self { calculator }
    }

    /// Computes the chain state of the blob described by `input`, using `parent` as the previous
    /// chain state.
    ///
    /// Errors if the blob does not start right after the last block of `parent`, when that block
    /// is known.
    pub fn calculate_shnarf(
        &self,
        parent: &ChainCursor,
        input: ShnarfInput<'_>,
    ) -> Result<RollingBlobShnarfResult, ShnarfCalculatorError> {
        let start_block_number = input.conflation_order.starting_block_number;
        let end_block_number = input
            .conflation_order
            .end_block_number()
            .ok_or(ShnarfCalculatorError::EmptyConflationOrder)?;

        if let Some(parent_end) = parent.end_block_number {
            let expected =
                parent_end.checked_add(1).ok_or(ShnarfCalculatorError::ChainEnd(parent_end))?;
            if start_block_number != expected {
                return Err(ShnarfCalculatorError::NonContiguousBlob {
                    expected,
                    got: start_block_number,
                });
            }
        }

        let shnarf_result = self.calculator.calculate_shnarf(
            input.compressed_data,
            input.zk_state.parent_state_root_hash,
            input.zk_state.final_state_root_hash,
            parent.shnarf,
            input.conflation_order,
        )?;

        tracing::trace!(
            target: "blob_coordinator::shnarf",
            start_block_number,
            end_block_number,
            parent_shnarf = ?parent.shnarf,
            shnarf = ?shnarf_result.expected_shnarf,
            "Calculated rolling blob shnarf"
        );

        Ok(RollingBlobShnarfResult {
            parent_blob_hash: parent.data_hash,
            parent_blob_shnarf: parent.shnarf,
            shnarf_result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockBlobShnarfCalculator;
    use alloy_primitives::B256;

    fn order(start: u64, ends: &[u64]) -> BlockIntervals {
        BlockIntervals { starting_block_number: start, upper_boundaries: ends.to_vec() }
    }

    #[test]
    fn test_rolling_shnarf_chains_parents() {
        let calculator = RollingBlobShnarfCalculator::new(MockBlobShnarfCalculator::default());
        let genesis = ChainCursor::new(B256::ZERO, B256::repeat_byte(0x42), Some(0));

        let mut cursor = genesis;
        let mut results = vec![];
        for (i, (start, end)) in [(1, 10), (11, 20), (21, 30)].into_iter().enumerate() {
            let conflation_order = order(start, &[end]);
            let data = vec![i as u8; 8];
            let input = ShnarfInput {
                compressed_data: &data,
                zk_state: Default::default(),
                conflation_order: &conflation_order,
            };
            let result = calculator.calculate_shnarf(&cursor, input).unwrap();
            cursor = result.cursor(end);
            results.push(result);
        }

        assert_eq!(results[0].parent_blob_shnarf, genesis.shnarf);
        assert_eq!(results[0].parent_blob_hash, genesis.data_hash);
        for pair in results.windows(2) {
            assert_eq!(pair[1].parent_blob_hash, pair[0].shnarf_result.data_hash);
            assert_eq!(pair[1].parent_blob_shnarf, pair[0].shnarf_result.expected_shnarf);
        }
        assert_eq!(cursor.end_block_number, Some(30));
    }

    #[test]
    fn test_rolling_shnarf_rejects_gap() {
        let calculator = RollingBlobShnarfCalculator::new(MockBlobShnarfCalculator::default());
        let parent = ChainCursor::new(B256::ZERO, B256::ZERO, Some(10));
        let conflation_order = order(12, &[20]);
        let input = ShnarfInput {
            compressed_data: &[],
            zk_state: Default::default(),
            conflation_order: &conflation_order,
        };

        assert_eq!(
            calculator.calculate_shnarf(&parent, input),
            Err(ShnarfCalculatorError::NonContiguousBlob { expected: 11, got: 12 })
        );
    }

    #[test]
    fn test_rolling_shnarf_rejects_blob_after_last_block() {
        let calculator = RollingBlobShnarfCalculator::new(MockBlobShnarfCalculator::default());
        let parent = ChainCursor::new(B256::ZERO, B256::ZERO, Some(u64::MAX));
        let conflation_order = order(0, &[10]);
        let input = ShnarfInput {
            compressed_data: &[],
            zk_state: Default::default(),
            conflation_order: &conflation_order,
        };

        assert_eq!(
            calculator.calculate_shnarf(&parent, input),
            Err(ShnarfCalculatorError::ChainEnd(u64::MAX))
        );
    }

    #[test]
    fn test_rolling_shnarf_without_anchor_accepts_any_start() {
        let calculator = RollingBlobShnarfCalculator::new(MockBlobShnarfCalculator::default());
        let parent = ChainCursor::new(B256::ZERO, B256::ZERO, None);
        let conflation_order = order(500, &[500]);
        let input = ShnarfInput {
            compressed_data: b"single block",
            zk_state: Default::default(),
            conflation_order: &conflation_order,
        };

        let result = calculator.calculate_shnarf(&parent, input).unwrap();
        assert_eq!(result.cursor(500).end_block_number, Some(500));
    }

    #[test]
    fn test_rolling_shnarf_propagates_calculator_failure() {
        let mock = MockBlobShnarfCalculator::default();
        mock.fail_for_start_block(1);
        let calculator = RollingBlobShnarfCalculator::new(&mock);
        let parent = ChainCursor::new(B256::ZERO, B256::ZERO, Some(0));
        let conflation_order = order(1, &[5, 10]);
        let input = ShnarfInput {
            compressed_data: &[],
            zk_state: Default::default(),
            conflation_order: &conflation_order,
        };

        assert!(matches!(
            calculator.calculate_shnarf(&parent, input),
            Err(ShnarfCalculatorError::Calculation(_))
        ));
    }
}
