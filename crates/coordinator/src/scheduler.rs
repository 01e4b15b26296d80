use std::{future::Future, time::Duration};

use parking_lot::Mutex;
use tokio::{sync::oneshot, task::JoinHandle};

/// The state of the [`Scheduler`].
#[derive(Debug, Default)]
enum SchedulerState {
    /// No tick is armed.
    #[default]
    Stopped,
    /// A ticker task is armed.
    Running {
        /// Disarms the ticker.
        stop_tx: oneshot::Sender<()>,
        /// The ticker task.
        ticker: JoinHandle<()>,
    },
}

/// A single repeating timer driving the coordinator ticks.
///
/// The next tick is armed only once the previous tick returned. Stopping the scheduler prevents
/// any further tick, including one whose timer already fired, but lets a running tick complete.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    /// The scheduler state.
    state: Mutex<SchedulerState>,
    /// Tickers which were disarmed but may still be running their last tick.
    stopping: Mutex<Vec<JoinHandle<()>>>,
}

impl Scheduler {
    /// Arms the ticker if the scheduler is stopped. Returns false if it was already running.
    pub(crate) fn start<F, Fut>(&self, polling_interval: Duration, tick: F) -> bool
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut state = self.state.lock();
        if matches!(*state, SchedulerState::Running { .. }) {
            return false;
        }

        let (stop_tx, stop_rx) = oneshot::channel();
        let ticker = tokio::spawn(run_ticker(polling_interval, stop_rx, tick));
        *state = SchedulerState::Running { stop_tx, ticker };
        true
    }

    /// Disarms the ticker if the scheduler is running. Returns false if it was already stopped.
    pub(crate) fn stop(&self) -> bool {
        match std::mem::take(&mut *self.state.lock()) {
            SchedulerState::Stopped => false,
            SchedulerState::Running { stop_tx, ticker } => {
                let _ = stop_tx.send(());
                self.stopping.lock().push(ticker);
                true
            }
        }
    }

    /// Waits for every disarmed ticker to return, including a tick that was running when the
    /// scheduler was stopped.
    pub(crate) async fn wait_for_stopped(&self) {
        let tickers = std::mem::take(&mut *self.stopping.lock());
        for ticker in tickers {
            if let Err(err) = ticker.await {
                tracing::error!(target: "blob_coordinator::coordinator", ?err, "Scheduler ticker failed");
            }
        }
    }

    /// Returns true if the ticker is armed.
    pub(crate) fn is_running(&self) -> bool {
        matches!(*self.state.lock(), SchedulerState::Running { .. })
    }
}

async fn run_ticker<F, Fut>(polling_interval: Duration, mut stop_rx: oneshot::Receiver<()>, tick: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => break,
            _ = tokio::time::sleep(polling_interval) => {}
        }

        // a tick which fired concurrently with a stop is a no-op.
        if !matches!(stop_rx.try_recv(), Err(oneshot::error::TryRecvError::Empty)) {
            break;
        }
        tick().await;
    }
    tracing::debug!(target: "blob_coordinator::coordinator", "Scheduler stopped");
}
