use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

/// Cancellable silence debounce timer
///
/// `arm` cancels any pending schedule and spawns a sleeper task that sends
/// its generation number on the provided channel once the delay elapses.
/// Generations let the session reject a fire that was already queued when a
/// newer arm (or a cancel) happened, so only the most recent arm can ever
/// finalize.
#[derive(Debug, Default)]
pub struct SilenceTimer {
    handle: Option<JoinHandle<()>>,
    generation: u64,
}

impl SilenceTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a fire after `delay`, cancelling any pending schedule first
    ///
    /// Returns the generation stamped onto this schedule.
    pub fn arm(&mut self, delay: Duration, tx: mpsc::UnboundedSender<u64>) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;
        trace!(generation, delay_ms = delay.as_millis() as u64, "silence timer armed");

        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver may already be gone during teardown
            let _ = tx.send(generation);
        }));

        generation
    }

    /// Cancel any pending schedule; no effect if none is pending
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            trace!(generation = self.generation, "silence timer cancelled");
        }
    }

    /// Generation of the pending schedule, if one is armed
    pub fn current_generation(&self) -> Option<u64> {
        self.handle.as_ref().map(|_| self.generation)
    }

    /// Whether `generation` refers to the currently armed schedule
    ///
    /// False once the timer has been cancelled or re-armed, which is how a
    /// stale queued fire is told apart from the live one.
    pub fn is_current(&self, generation: u64) -> bool {
        self.handle.is_some() && generation == self.generation
    }
}

impl Drop for SilenceTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
