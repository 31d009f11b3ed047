//! Background worker for the preparation countdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;

use traykit_tracking::OrderPhase;

use crate::session::OrderSession;

/// Drives the once-per-second countdown tick while an order is preparing.
///
/// The spawned task exits on its own as soon as the phase leaves Preparing,
/// and can be stopped early through [`CountdownWorker::stop`] or by dropping
/// the worker. Either way a discarded session is never ticked again.
#[derive(Debug)]
pub struct CountdownWorker {
    session: Arc<Mutex<OrderSession>>,
    shutdown: Arc<Notify>,
}

impl CountdownWorker {
    pub fn new(session: Arc<Mutex<OrderSession>>) -> Self {
        Self {
            session,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Spawn the countdown task.
    ///
    /// The first decrement lands one full second after the worker starts;
    /// subsequent decrements follow at one-second intervals.
    pub fn start(&self) -> JoinHandle<()> {
        let session = self.session.clone();
        let shutdown = self.shutdown.clone();

        tokio::spawn(async move {
            tracing::debug!("countdown worker started");

            let period = Duration::from_secs(1);
            let mut ticks = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = shutdown.notified() => {
                        tracing::debug!("countdown worker received shutdown signal");
                        break;
                    }
                    _ = ticks.tick() => {
                        let mut session = session.lock().await;
                        if session.phase() != OrderPhase::Preparing {
                            break;
                        }
                        match session.tick() {
                            Ok(OrderPhase::Ready) => break,
                            Ok(_) => {}
                            Err(err) => {
                                tracing::warn!(%err, "countdown tick rejected");
                                break;
                            }
                        }
                    }
                }
            }

            tracing::debug!("countdown worker stopped");
        })
    }

    /// Stop the countdown task.
    pub fn stop(&self) {
        self.shutdown.notify_one();
    }
}

impl Drop for CountdownWorker {
    fn drop(&mut self) {
        // The task must not outlive its owner and tick a stale session.
        self.shutdown.notify_one();
    }
}
