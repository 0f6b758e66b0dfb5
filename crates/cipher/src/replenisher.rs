//! Periodic background task that keeps both pools at capacity.

use crate::error::CipherError;
use crate::manager::PoolManager;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info};

/// Schedules [`PoolManager::replenish`] at a fixed interval.
///
/// The first pass runs immediately after spawning. Fills execute on the blocking
/// thread pool because key derivation is CPU-bound.
#[derive(Debug)]
pub struct Replenisher {
    manager: Arc<PoolManager>,
    interval: Duration,
}

impl Replenisher {
    #[must_use]
    pub const fn new(manager: Arc<PoolManager>, interval: Duration) -> Self {
        Self { manager, interval }
    }

    /// Starts the task on the current Tokio runtime.
    ///
    /// # Errors
    /// * [`CipherError::Scheduler`] when called outside of a Tokio runtime.
    /// * [`CipherError::InvalidConfiguration`] for a zero interval.
    pub fn spawn(self) -> Result<ReplenisherHandle, CipherError> {
        if self.interval.is_zero() {
            return Err(CipherError::InvalidConfiguration {
                message: "replenish interval must be greater than zero".into(),
                context: None,
            });
        }

        let runtime = Handle::try_current().map_err(|e| CipherError::Scheduler {
            message: format!("no Tokio runtime available for the replenisher: {e}").into(),
            context: None,
        })?;

        let (stop, stop_rx) = watch::channel(false);
        let ticks = Arc::new(AtomicU64::new(0));
        let task = runtime.spawn(run(self.manager, self.interval, stop_rx, Arc::clone(&ticks)));

        info!(interval = ?self.interval, "Replenisher started");
        Ok(ReplenisherHandle { stop, task: Some(task), ticks })
    }
}

async fn run(
    manager: Arc<PoolManager>,
    period: Duration,
    mut stop: watch::Receiver<bool>,
    ticks: Arc<AtomicU64>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = stop.changed() => break,
            _ = interval.tick() => {
                let manager = Arc::clone(&manager);
                match tokio::task::spawn_blocking(move || manager.replenish()).await {
                    Ok(report) => debug!(?report, "Replenisher tick"),
                    Err(e) => error!(error = %e, "Replenishment pass panicked"),
                }
                ticks.fetch_add(1, Ordering::Relaxed);
            },
        }

        if *stop.borrow() {
            break;
        }
    }

    info!("Replenisher stopped");
}

/// Control handle for a running [`Replenisher`]. Dropping it stops the task.
#[derive(Debug)]
pub struct ReplenisherHandle {
    stop: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    ticks: Arc<AtomicU64>,
}

impl ReplenisherHandle {
    /// Signals the task to stop. A pass already in progress completes first.
    pub fn stop(&self) {
        self.stop.send_replace(true);
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Number of completed passes.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Waits for the task to terminate. Call [`ReplenisherHandle::stop`] first.
    ///
    /// # Errors
    /// Returns [`CipherError::Internal`] if the task panicked or was cancelled.
    pub async fn join(&mut self) -> Result<(), CipherError> {
        if let Some(task) = self.task.take() {
            task.await.map_err(|e| CipherError::Internal {
                message: format!("replenisher task failed: {e}").into(),
                context: None,
            })?;
        }

        Ok(())
    }
}

impl Drop for ReplenisherHandle {
    fn drop(&mut self) {
        self.stop.send_replace(true);
    }
}
