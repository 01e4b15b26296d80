use crate::ShnarfCalculatorError;

use alloy_primitives::B256;
use blob_coordinator_primitives::{BlockIntervals, ShnarfResult};

/// Computes the [`ShnarfResult`] of a single blob.
///
/// Implementations are pure functions of their arguments: they hold no chain state and the
/// caller is responsible for invoking them in blob order with the correct previous shnarf.
#[auto_impl::auto_impl(Arc, &, Box)]
pub trait BlobShnarfCalculator: Send + Sync {
    /// Returns the [`ShnarfResult`] for the compressed blob data.
    fn calculate_shnarf(
        &self,
        compressed_data: &[u8],
        parent_state_root_hash: B256,
        final_state_root_hash: B256,
        prev_shnarf: B256,
        conflation_order: &BlockIntervals,
    ) -> Result<ShnarfResult, ShnarfCalculatorError>;
}
