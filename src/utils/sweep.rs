//! Cancelable periodic background tasks
//!
//! The brute-force protector, the rate limiter and the access request manager
//! each run one sweep per instance. A [`SweepHandle`] owns the spawned task and
//! its stop signal so the sweep can be torn down deterministically.

use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Handle to a running periodic sweep
#[derive(Debug)]
pub struct SweepHandle {
    name: &'static str,
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweepHandle {
    /// Spawn `tick` every `interval` until stopped.
    ///
    /// The first tick fires one full interval after spawning.
    pub fn spawn<F, Fut>(name: &'static str, interval: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let Some(start) = tokio::time::Instant::now().checked_add(interval) else {
                warn!("{} sweep interval {:?} is out of range, not sweeping", name, interval);
                return;
            };
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => tick().await,
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("{} sweep stopped", name);
        });

        debug!("{} sweep started (interval {:?})", name, interval);
        Self {
            name,
            stop_tx,
            task,
        }
    }

    /// Signal the sweep to stop and wait for it to exit
    pub async fn stop(self) {
        let _ = self.stop_tx.send(true);
        if let Err(e) = self.task.await {
            warn!("{} sweep ended abnormally: {}", self.name, e);
        }
    }

    /// Whether the underlying task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
