// src/termination.rs
// =============================================================================
// The "press Ctrl+C twice" policy.
//
// The first interrupt asks the scan to stop gracefully (workers finish what
// they hold, results still get saved and summarized). Once the allowed
// number of interrupts is used up, the program stops right away.
//
// Interrupts are picked up by one long-lived listener task and queued on a
// channel, so an interrupt that arrives while the result loop is busy
// saving a result is still seen on the next iteration.
// =============================================================================

use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::mpsc;

#[derive(Debug)]
pub struct TerminationHandler {
    attempts_left: AtomicUsize,
}

impl TerminationHandler {
    pub fn new(attempts: usize) -> Self {
        Self {
            attempts_left: AtomicUsize::new(attempts),
        }
    }

    // Records one interrupt; never goes below zero
    pub fn signal_termination(&self) {
        let _ = self
            .attempts_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1));
    }

    pub fn should_terminate(&self) -> bool {
        self.attempts_left.load(Ordering::SeqCst) == 0
    }
}

// Spawns a task that waits on `next_signal` over and over and forwards every
// interrupt it sees. Used with `tokio::signal::ctrl_c`.
//
// The channel closes when the signal source fails or the receiver is dropped.
pub fn forward_interrupts<F, Fut>(mut next_signal: F) -> mpsc::UnboundedReceiver<()>
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = io::Result<()>> + Send,
{
    let (sender, receiver) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        loop {
            if let Err(e) = next_signal().await {
                tracing::error!(error = %e, "unable to listen for interrupts");
                return;
            }
            if sender.send(()).is_err() {
                return;
            }
        }
    });

    receiver
}
