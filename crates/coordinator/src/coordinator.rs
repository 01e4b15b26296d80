use crate::{
    metrics::CoordinatorMetrics, scheduler::Scheduler, BlobCoordinatorHandle, CoordinatorConfig,
    CoordinatorError, CoordinatorEvent,
};
use std::{sync::Arc, time::Instant};

use blob_coordinator_db::BlobsRepository;
use blob_coordinator_primitives::{
    Blob, BlobCompressionProofUpdate, BlobRecord, BlobZkState, BlockInterval, ChainCursor,
    RollingBlobShnarfResult,
};
use blob_coordinator_providers::{
    BlobCompressionProofHandler, BlobCompressionProofRequest, BlobCompressionProverClient,
    BlobZkStateProvider,
};
use blob_coordinator_shnarf::{BlobShnarfCalculator, RollingBlobShnarfCalculator, ShnarfInput};
use tokio::{
    sync::{broadcast, mpsc, Mutex},
    task::JoinHandle,
};

/// The capacity of the coordinator event channel.
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// The blob compression proof coordinator.
///
/// Blobs submitted through the [`BlobCoordinatorHandle`] are dequeued one per tick. For each blob
/// the coordinator resolves its zk state and computes its rolling shnarf from the current
/// [`ChainCursor`]; these two steps run for one blob at a time, in queue order. Once the shnarf is
/// known the cursor advances and the proof request, persistence and notification of the blob run
/// in a spawned task while the next tick proceeds with the following blob.
///
/// Failures are logged with the blob interval and reported as [`CoordinatorEvent::BlobDropped`];
/// failed blobs are never requeued. A failed proof request does not rewind the cursor: the blob
/// keeps its position in the shnarf chain. A proof rejected by the downstream handler is reported
/// as [`CoordinatorEvent::NotificationFailed`] and does not drop the persisted blob.
#[derive(Debug)]
pub struct BlobCompressionProofCoordinator {
    /// The state shared with the ticker and the pipeline tasks.
    inner: Arc<CoordinatorInner>,
    /// The repeating timer.
    scheduler: Scheduler,
    /// The producer handle.
    handle: BlobCoordinatorHandle,
}

/// The part of the pipeline that must run for one blob at a time.
#[derive(Debug)]
struct SequencedState {
    /// The receiving half of the ingestion queue.
    queue: mpsc::Receiver<Blob>,
    /// The chain state of the last blob whose shnarf was computed.
    cursor: ChainCursor,
}

struct CoordinatorInner {
    config: CoordinatorConfig,
    zk_state_provider: Arc<dyn BlobZkStateProvider>,
    shnarf_calculator: RollingBlobShnarfCalculator<Arc<dyn BlobShnarfCalculator>>,
    prover: Arc<dyn BlobCompressionProverClient>,
    repository: Arc<dyn BlobsRepository>,
    proof_handler: Arc<dyn BlobCompressionProofHandler>,
    /// Locked for the whole dequeue, zk state and shnarf sequence of a tick.
    sequenced: Mutex<SequencedState>,
    /// The proof, persistence and notification tasks.
    in_flight: parking_lot::Mutex<Vec<JoinHandle<()>>>,
    events: broadcast::Sender<CoordinatorEvent>,
    metrics: CoordinatorMetrics,
}

impl std::fmt::Debug for CoordinatorInner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinatorInner")
            .field("config", &self.config)
            .field("in_flight", &self.in_flight.lock().len())
            .finish_non_exhaustive()
    }
}

impl BlobCompressionProofCoordinator {
    /// Returns a new stopped [`BlobCompressionProofCoordinator`] whose shnarf chain continues from
    /// the provided cursor.
    pub fn new(
        config: CoordinatorConfig,
        cursor: ChainCursor,
        zk_state_provider: Arc<dyn BlobZkStateProvider>,
        shnarf_calculator: Arc<dyn BlobShnarfCalculator>,
        prover: Arc<dyn BlobCompressionProverClient>,
        repository: Arc<dyn BlobsRepository>,
        proof_handler: Arc<dyn BlobCompressionProofHandler>,
    ) -> Self {
        let (to_coordinator_tx, queue) = mpsc::channel(config.queue_capacity.max(1));
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let handle = BlobCoordinatorHandle::new(to_coordinator_tx, events.clone());

        let inner = CoordinatorInner {
            config,
            zk_state_provider,
            shnarf_calculator: RollingBlobShnarfCalculator::new(shnarf_calculator),
            prover,
            repository,
            proof_handler,
            sequenced: Mutex::new(SequencedState { queue, cursor }),
            in_flight: Default::default(),
            events,
            metrics: CoordinatorMetrics::default(),
        };

        Self { inner: Arc::new(inner), scheduler: Scheduler::default(), handle }
    }

    /// Returns a handle to submit blobs.
    pub fn handle(&self) -> BlobCoordinatorHandle {
        self.handle.clone()
    }

    /// Returns a new listener for the coordinator events.
    pub fn events(&self) -> broadcast::Receiver<CoordinatorEvent> {
        self.inner.events.subscribe()
    }

    /// Returns the configuration of the coordinator.
    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Returns the current chain cursor, waiting for a running shnarf computation to complete.
    pub async fn cursor(&self) -> ChainCursor {
        self.inner.sequenced.lock().await.cursor
    }

    /// Arms the polling timer. Returns false if the coordinator was already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let inner = self.inner.clone();
        let started = self.scheduler.start(self.inner.config.polling_interval, move || {
            let inner = inner.clone();
            async move { inner.tick().await }
        });
        if started {
            tracing::info!(
                target: "blob_coordinator::coordinator",
                polling_interval = ?self.inner.config.polling_interval,
                "Blob compression proof coordinator started"
            );
        }
        started
    }

    /// Disarms the polling timer. Returns false if the coordinator was already stopped.
    ///
    /// Queued blobs stay in the queue and in flight proof requests are not cancelled, see
    /// [`Self::wait_for_in_flight`].
    pub fn stop(&self) -> bool {
        let stopped = self.scheduler.stop();
        if stopped {
            tracing::info!(target: "blob_coordinator::coordinator", "Blob compression proof coordinator stopped");
        }
        stopped
    }

    /// Returns true if the polling timer is armed.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Waits for the blob being sequenced, if any, and for every spawned proof, persistence and
    /// notification task to complete.
    ///
    /// Once the coordinator is stopped, every dequeued blob is fully handled when this returns.
    pub async fn wait_for_in_flight(&self) {
        self.scheduler.wait_for_stopped().await;
        // a running tick holds the lock until its proof task is spawned.
        drop(self.inner.sequenced.lock().await);
        loop {
            let tasks = std::mem::take(&mut *self.inner.in_flight.lock());
            if tasks.is_empty() {
                return;
            }
            for task in tasks {
                if let Err(err) = task.await {
                    tracing::error!(target: "blob_coordinator::coordinator", ?err, "Blob proof task failed");
                }
            }
        }
    }
}

impl CoordinatorInner {
    /// Dequeues at most one blob and runs the sequenced part of its pipeline.
    async fn tick(self: Arc<Self>) {
        let mut sequenced = self.sequenced.lock().await;
        let Ok(blob) = sequenced.queue.try_recv() else { return };
        self.metrics.queue_size.set(sequenced.queue.len() as f64);

        let interval = blob.interval();
        tracing::debug!(
            target: "blob_coordinator::coordinator",
            blob = %interval,
            batches = %blob.conflation_order(),
            "Processing new blob"
        );

        match self.compute_chain_state(&blob, sequenced.cursor).await {
            Ok((zk_state, chain_state)) => {
                let cursor = chain_state.cursor(blob.end_block_number());
                sequenced.cursor = cursor;
                drop(sequenced);

                let _ = self.events.send(CoordinatorEvent::ShnarfCalculated { interval, cursor });
                self.spawn_proof_task(blob, zk_state, chain_state);
            }
            Err(err) => self.report_failure(interval, err),
        }
    }

    /// Resolves the zk state of the blob and computes its rolling shnarf from `cursor`.
    async fn compute_chain_state(
        &self,
        blob: &Blob,
        cursor: ChainCursor,
    ) -> Result<(BlobZkState, RollingBlobShnarfResult), CoordinatorError> {
        let zk_state = self.zk_state_provider.get_blob_zk_state(blob.interval()).await?;

        let calculator = self.shnarf_calculator.clone();
        let compressed_data = blob.compressed_data().clone();
        let conflation_order = blob.conflation_order();
        let start = Instant::now();
        let chain_state = tokio::task::spawn_blocking(move || {
            calculator.calculate_shnarf(
                &cursor,
                ShnarfInput {
                    compressed_data: &compressed_data,
                    zk_state,
                    conflation_order: &conflation_order,
                },
            )
        })
        .await
        .map_err(|err| CoordinatorError::ShnarfTask(err.to_string()))??;
        self.metrics.shnarf_calculation_duration.record(start.elapsed().as_secs_f64());

        Ok((zk_state, chain_state))
    }

    fn spawn_proof_task(
        self: &Arc<Self>,
        blob: Blob,
        zk_state: BlobZkState,
        chain_state: RollingBlobShnarfResult,
    ) {
        let this = self.clone();
        let task =
            tokio::spawn(async move { this.prove_and_persist(blob, zk_state, chain_state).await });

        let mut in_flight = self.in_flight.lock();
        in_flight.retain(|task| !task.is_finished());
        in_flight.push(task);
    }

    /// Requests the compression proof of the blob, then persists the proven blob and notifies the
    /// proof handler.
    async fn prove_and_persist(
        &self,
        blob: Blob,
        zk_state: BlobZkState,
        chain_state: RollingBlobShnarfResult,
    ) {
        let interval = blob.interval();
        let request = BlobCompressionProofRequest::new(&blob, zk_state, &chain_state);
        let proof = match self.prover.request_blob_compression_proof(request).await {
            Ok(proof) => proof,
            Err(err) => return self.report_failure(interval, err.into()),
        };
        self.metrics.blobs_proven.increment(1);
        tracing::debug!(target: "blob_coordinator::coordinator", blob = %interval, "Received blob compression proof");
        let _ = self.events.send(CoordinatorEvent::BlobProven(interval));

        let record = BlobRecord::proven(&blob, &chain_state.shnarf_result, proof.clone());
        let update =
            BlobCompressionProofUpdate { block_interval: interval, blob_compression_proof: proof };
        let (persisted, notified) = futures::future::join(
            self.repository.save_new_blob(record),
            self.proof_handler.accept_new_blob_compression_proof(update),
        )
        .await;

        match persisted {
            Ok(()) => {
                tracing::debug!(target: "blob_coordinator::coordinator", blob = %interval, "Persisted proven blob");
                let _ = self.events.send(CoordinatorEvent::BlobPersisted(interval));
            }
            Err(err) => self.report_failure(interval, err.into()),
        }
        if let Err(err) = notified {
            self.metrics.notification_failures.increment(1);
            tracing::warn!(target: "blob_coordinator::coordinator", blob = %interval, %err, "Proof handler rejected blob compression proof");
            let _ = self.events.send(CoordinatorEvent::NotificationFailed {
                interval,
                error: err.to_string(),
            });
        }
    }

    /// Logs the failure of a pipeline stage for the blob and emits a
    /// [`CoordinatorEvent::BlobDropped`].
    fn report_failure(&self, interval: BlockInterval, err: CoordinatorError) {
        let Some(stage) = err.stage() else { return };
        self.metrics.blobs_dropped.increment(1);
        tracing::error!(target: "blob_coordinator::coordinator", blob = %interval, %stage, %err, "Blob pipeline failed");
        let _ = self.events.send(CoordinatorEvent::BlobDropped {
            interval,
            stage,
            error: err.to_string(),
        });
    }
}
