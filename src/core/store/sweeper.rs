//! Periodic background task.
//!
//! Runs a callback on a dedicated thread every `interval` until stopped.
//! Stopping disconnects a channel the thread waits on, so shutdown does not
//! wait out the remainder of an interval.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

/// Handle to a running periodic task. Dropping it stops the task.
#[derive(Debug)]
pub struct Sweeper {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
    interval: Duration,
}

impl Sweeper {
    /// Start calling `tick` every `interval`.
    ///
    /// # Errors
    ///
    /// Returns an IO error if the thread cannot be spawned.
    pub fn spawn<F>(interval: Duration, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (stop, rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("vaultify-sweeper".to_string())
            .spawn(move || loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => tick(),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        debug!(interval_ms = interval.as_millis() as u64, "sweeper started");

        Ok(Self {
            stop: Some(stop),
            handle: Some(handle),
            interval,
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the task and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("sweeper thread panicked");
            } else {
                debug!("sweeper stopped");
            }
        }
    }
}

impl Drop for Sweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}
