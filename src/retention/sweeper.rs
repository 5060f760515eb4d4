//! Background sweeper
//!
//! Owns the thread that runs retention sweeps on a fixed interval.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{self, Sender};

use crate::error::Result;
use crate::store::LineStore;

use super::sweep;

/// Handle to the background retention thread
///
/// Dropping the handle stops the thread after any sweep in progress.
pub struct Sweeper {
    /// Closing this channel tells the thread to exit
    shutdown: Option<Sender<()>>,

    handle: Option<JoinHandle<()>>,
}

impl Sweeper {
    /// Start sweeping `store` every `interval`, keeping `retain_days` days
    pub fn start(store: Arc<LineStore>, retain_days: u32, interval: Duration) -> Result<Self> {
        let (shutdown_tx, shutdown_rx) = channel::bounded::<()>(0);
        let ticker = channel::tick(interval);

        let handle = thread::Builder::new()
            .name("daylog-sweeper".to_string())
            .spawn(move || {
                tracing::info!(
                    "Retention sweeper started (retain {} days, every {:?})",
                    retain_days,
                    interval
                );

                loop {
                    let report = sweep(&store, retain_days);
                    if !report.removed.is_empty() || !report.failed.is_empty() {
                        tracing::info!(
                            "Sweep removed {} partitions ({} failed, {} skipped)",
                            report.removed.len(),
                            report.failed.len(),
                            report.skipped.len()
                        );
                    }

                    crossbeam::select! {
                        recv(ticker) -> _ => {}
                        recv(shutdown_rx) -> _ => break,
                    }
                }

                tracing::info!("Retention sweeper stopped");
            })?;

        Ok(Self {
            shutdown: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(mut self) {
        self.shutdown_and_join();
    }

    fn shutdown_and_join(&mut self) {
        // Disconnecting wakes the select! in the thread
        drop(self.shutdown.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::error!("Retention sweeper thread panicked");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown_and_join();
    }
}
