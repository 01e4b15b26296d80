use crate::{metrics::CoordinatorMetrics, CoordinatorError, CoordinatorEvent};

use blob_coordinator_primitives::{Blob, BlockInterval};
use tokio::sync::{broadcast, mpsc};

/// The handle used by producers to submit blobs to the coordinator.
///
/// Submissions wait while the ingestion queue is full, which is the only backpressure applied to
/// producers.
#[derive(Debug, Clone)]
pub struct BlobCoordinatorHandle {
    /// The sending half of the ingestion queue.
    to_coordinator_tx: mpsc::Sender<Blob>,
    /// The coordinator events.
    events: broadcast::Sender<CoordinatorEvent>,
    /// The metrics for the handle.
    metrics: CoordinatorMetrics,
}

impl BlobCoordinatorHandle {
    /// Create a new coordinator handle.
    pub(crate) fn new(
        to_coordinator_tx: mpsc::Sender<Blob>,
        events: broadcast::Sender<CoordinatorEvent>,
    ) -> Self {
        Self { to_coordinator_tx, events, metrics: CoordinatorMetrics::default() }
    }

    /// Submits a blob, waiting for space in the ingestion queue.
    ///
    /// Errors only if the coordinator was dropped.
    pub async fn submit(&self, blob: Blob) -> Result<(), CoordinatorError> {
        let interval = blob.interval();
        if self.to_coordinator_tx.send(blob).await.is_err() {
            return Err(self.queue_closed(interval));
        }
        self.on_queued(interval);
        Ok(())
    }

    /// Submits a blob from a thread outside of the async runtime, blocking the thread while the
    /// ingestion queue is full.
    ///
    /// # Panics
    ///
    /// This method panics if called within an asynchronous execution context.
    pub fn blocking_submit(&self, blob: Blob) -> Result<(), CoordinatorError> {
        let interval = blob.interval();
        if self.to_coordinator_tx.blocking_send(blob).is_err() {
            return Err(self.queue_closed(interval));
        }
        self.on_queued(interval);
        Ok(())
    }

    /// Returns the number of blobs waiting in the ingestion queue.
    pub fn queue_size(&self) -> usize {
        self.to_coordinator_tx.max_capacity() - self.to_coordinator_tx.capacity()
    }

    /// Returns a new listener for the coordinator events.
    pub fn events(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.events.subscribe()
    }

    fn on_queued(&self, interval: BlockInterval) {
        self.metrics.blobs_submitted.increment(1);
        self.metrics.queue_size.set(self.queue_size() as f64);
        tracing::trace!(target: "blob_coordinator::coordinator", blob = %interval, queue_size = self.queue_size(), "Blob queued");
        let _ = self.events.send(CoordinatorEvent::BlobQueued(interval));
    }

    fn queue_closed(&self, interval: BlockInterval) -> CoordinatorError {
        tracing::error!(target: "blob_coordinator::coordinator", blob = %interval, "Failed to submit blob: coordinator queue closed");
        CoordinatorError::QueueClosed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        sync::{
            atomic::{AtomicU64, Ordering},
            Arc,
        },
    };

    use alloy_primitives::Bytes;
    use blob_coordinator_primitives::ConflationCalculationResult;
    use metrics::{
        Counter, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit,
    };
    use parking_lot::Mutex;

    /// A recorder keeping the last value of every counter and gauge.
    #[derive(Debug, Default)]
    struct TestRecorder {
        values: Mutex<HashMap<String, Arc<AtomicU64>>>,
    }

    impl TestRecorder {
        fn handle(&self, key: &Key) -> Arc<AtomicU64> {
            self.values.lock().entry(key.name().to_string()).or_default().clone()
        }

        fn value(&self, suffix: &str) -> u64 {
            let values = self.values.lock();
            let (_, value) = values.iter().find(|(name, _)| name.ends_with(suffix)).unwrap();
            value.load(Ordering::SeqCst)
        }
    }

    impl Recorder for TestRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            Counter::from_arc(self.handle(key))
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            Gauge::from_arc(self.handle(key))
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn blob(start: u64, end: u64) -> Blob {
        Blob::new(vec![ConflationCalculationResult::new(start, end)], Bytes::new(), 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_submit_records_metrics_and_event() {
        let recorder = TestRecorder::default();
        let (tx, mut rx) = mpsc::channel(4);
        let (events_tx, _) = broadcast::channel(16);
        let handle = metrics::with_local_recorder(&recorder, || {
            BlobCoordinatorHandle::new(tx, events_tx)
        });
        let mut events = handle.events();

        handle.submit(blob(1, 10)).await.unwrap();
        handle.submit(blob(11, 20)).await.unwrap();

        assert_eq!(handle.queue_size(), 2);
        assert_eq!(recorder.value("blobs_submitted"), 2);
        assert_eq!(f64::from_bits(recorder.value("queue_size")), 2.0);
        assert_eq!(
            events.recv().await.unwrap(),
            CoordinatorEvent::BlobQueued(BlockInterval::between(1, 10).unwrap())
        );

        // the gauge tracks the queue depth at the next submission.
        rx.recv().await.unwrap();
        handle.submit(blob(21, 30)).await.unwrap();
        assert_eq!(recorder.value("blobs_submitted"), 3);
        assert_eq!(f64::from_bits(recorder.value("queue_size")), 2.0);
    }

    #[tokio::test]
    async fn test_submit_fails_once_queue_is_closed() {
        let (tx, rx) = mpsc::channel(4);
        let (events_tx, _) = broadcast::channel(16);
        let handle = BlobCoordinatorHandle::new(tx, events_tx);
        drop(rx);

        assert!(matches!(handle.submit(blob(1, 10)).await, Err(CoordinatorError::QueueClosed)));
    }
}
