//! A producer of synthetic blobs for running the coordinator without an upstream conflation
//! service.

use crate::DevArgs;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy_primitives::Bytes;
use blob_coordinator::BlobCoordinatorHandle;
use blob_coordinator_primitives::{Blob, BlobError, ChainCursor, ConflationCalculationResult};
use rand::Rng;

/// The time between two synthetic blocks in seconds.
const BLOCK_TIME: u64 = 2;

/// Builds consecutive synthetic blobs.
#[derive(Debug, Clone)]
pub struct DevBlobProducer {
    /// The first block number of the next blob.
    next_block_number: u64,
    /// The number of blocks in a blob.
    blocks_per_blob: u64,
    /// The number of blocks in a batch.
    blocks_per_batch: u64,
    /// The size of the compressed payload.
    compressed_data_size: usize,
}

impl DevBlobProducer {
    /// Returns a producer whose first blob follows the provided cursor.
    pub fn new(args: &DevArgs, cursor: &ChainCursor) -> Self {
        Self {
            next_block_number: cursor.expected_next_block_number().unwrap_or(1),
            blocks_per_blob: args.blocks_per_blob.max(1),
            blocks_per_batch: args.blocks_per_batch.max(1),
            compressed_data_size: args.compressed_data_size,
        }
    }

    /// Returns the next synthetic blob.
    pub fn next_blob(&mut self) -> Result<Blob, BlobError> {
        let start = self.next_block_number;
        let end = start + self.blocks_per_blob - 1;

        let conflations = (start..=end)
            .step_by(self.blocks_per_batch as usize)
            .map(|batch_start| {
                ConflationCalculationResult::new(
                    batch_start,
                    (batch_start + self.blocks_per_batch - 1).min(end),
                )
            })
            .collect();

        let mut compressed_data = vec![0u8; self.compressed_data_size];
        rand::rng().fill(compressed_data.as_mut_slice());

        let now =
            SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
        let start_block_time = now.saturating_sub((end - start) * BLOCK_TIME);

        let blob = Blob::new(conflations, Bytes::from(compressed_data), start_block_time, now)?;
        self.next_block_number = end + 1;
        Ok(blob)
    }

    /// Submits a new blob every `interval` until `count` blobs were submitted, or forever if
    /// `count` is unset.
    pub async fn run(
        mut self,
        handle: BlobCoordinatorHandle,
        interval: Duration,
        count: Option<u64>,
    ) -> eyre::Result<()> {
        let mut ticker = tokio::time::interval(interval);
        let mut produced = 0;
        while count.is_none_or(|count| produced < count) {
            ticker.tick().await;
            let blob = self.next_blob()?;
            tracing::debug!(target: "blob_coordinator::node", blob = %blob.interval(), "Submitting development blob");
            handle.submit(blob).await?;
            produced += 1;
        }
        tracing::info!(target: "blob_coordinator::node", produced, "Development blob producer finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::B256;

    fn args(blocks_per_blob: u64, blocks_per_batch: u64) -> DevArgs {
        DevArgs { blocks_per_blob, blocks_per_batch, compressed_data_size: 64, ..Default::default() }
    }

    #[test]
    fn test_consecutive_blobs() {
        let cursor = ChainCursor::new(B256::ZERO, B256::ZERO, Some(0));
        let mut producer = DevBlobProducer::new(&args(10, 4), &cursor);

        let first = producer.next_blob().unwrap();
        let second = producer.next_blob().unwrap();

        assert_eq!(first.start_block_number(), 1);
        assert_eq!(first.end_block_number(), 10);
        assert_eq!(first.batches_count(), 3);
        assert_eq!(first.conflations().last().map(|c| c.end_block_number), Some(10));
        assert_eq!(first.compressed_data().len(), 64);
        assert_eq!(second.start_block_number(), 11);
    }

    #[test]
    fn test_resumes_after_cursor() {
        let cursor = ChainCursor::new(B256::ZERO, B256::ZERO, Some(40));
        let mut producer = DevBlobProducer::new(&args(5, 5), &cursor);

        let blob = producer.next_blob().unwrap();

        assert_eq!(blob.start_block_number(), 41);
        assert_eq!(blob.batches_count(), 1);
    }
}
