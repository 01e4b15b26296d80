use crate::{compute_evaluation_point, compute_shnarf, BlobShnarfCalculator, ShnarfCalculatorError};
use std::{
    collections::HashSet,
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use alloy_primitives::{keccak256, Bytes, B256};
use blob_coordinator_primitives::{BlockIntervals, ShnarfResult};
use parking_lot::Mutex;

/// A deterministic [`BlobShnarfCalculator`] deriving every commitment from keccak256 hashes of the
/// compressed data.
///
/// The mock records every call and counts overlapping invocations, which allows tests to check
/// calculations are single flight and ordered.
#[derive(Debug, Default)]
pub struct MockBlobShnarfCalculator {
    /// Set while a calculation is running.
    in_flight: AtomicBool,
    /// The number of calls which started while another one was running.
    concurrent_invocations: AtomicUsize,
    /// The starting block number and previous shnarf of each call, in call order.
    calls: Mutex<Vec<(u64, B256)>>,
    /// Calls starting at these block numbers fail.
    failing_start_blocks: Mutex<HashSet<u64>>,
    /// Time spent inside each calculation.
    delay: Duration,
}

impl MockBlobShnarfCalculator {
    /// Returns a mock which spends `delay` inside every calculation.
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay, ..Default::default() }
    }

    /// Makes the calculation fail for blobs starting at `block_number`.
    pub fn fail_for_start_block(&self, block_number: u64) {
        self.failing_start_blocks.lock().insert(block_number);
    }

    /// Returns the starting block number and previous shnarf of every call, in order.
    pub fn calls(&self) -> Vec<(u64, B256)> {
        self.calls.lock().clone()
    }

    /// Returns the number of calls which overlapped another call.
    pub fn concurrent_invocations(&self) -> usize {
        self.concurrent_invocations.load(Ordering::SeqCst)
    }
}

impl BlobShnarfCalculator for MockBlobShnarfCalculator {
    fn calculate_shnarf(
        &self,
        compressed_data: &[u8],
        _parent_state_root_hash: B256,
        final_state_root_hash: B256,
        prev_shnarf: B256,
        conflation_order: &BlockIntervals,
    ) -> Result<ShnarfResult, ShnarfCalculatorError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            self.concurrent_invocations.fetch_add(1, Ordering::SeqCst);
        }
        self.calls.lock().push((conflation_order.starting_block_number, prev_shnarf));
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }

        let result = if self
            .failing_start_blocks
            .lock()
            .contains(&conflation_order.starting_block_number)
        {
            Err(ShnarfCalculatorError::Calculation(format!(
                "injected failure for blob starting at {}",
                conflation_order.starting_block_number
            )))
        } else {
            Ok(mock_shnarf_result(compressed_data, final_state_root_hash, prev_shnarf))
        };

        self.in_flight.store(false, Ordering::SeqCst);
        result
    }
}

fn mock_shnarf_result(
    compressed_data: &[u8],
    final_state_root_hash: B256,
    prev_shnarf: B256,
) -> ShnarfResult {
    let snark_hash = keccak256(compressed_data);
    let commitment = mock_g1_point(snark_hash, b"commitment");
    let mut data_hash = keccak256(&commitment);
    // versioned hash prefix.
    data_hash.0[0] = 0x01;
    let expected_x = compute_evaluation_point(snark_hash, data_hash);
    let expected_y = keccak256([expected_x.as_slice(), commitment.as_ref()].concat());
    let expected_shnarf =
        compute_shnarf(prev_shnarf, snark_hash, final_state_root_hash, expected_x, expected_y);

    ShnarfResult {
        data_hash,
        snark_hash,
        expected_x,
        expected_y,
        expected_shnarf,
        kzg_proof_contract: mock_g1_point(expected_x, b"contract"),
        kzg_proof_side_car: mock_g1_point(data_hash, b"side-car"),
        commitment,
    }
}

/// Returns 48 bytes derived from the seed and domain.
fn mock_g1_point(seed: B256, domain: &[u8]) -> Bytes {
    let head = keccak256([seed.as_slice(), domain].concat());
    let tail = keccak256(head);
    [head.as_slice(), &tail[..16]].concat().into()
}
