//! Tokio-backed debounced value handle
//!
//! Wraps a [`Debouncer`] in a background task that arms real timers and
//! publishes each settled value over a watch channel.

use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::debounce::Debouncer;

enum Command<T> {
    Set(T),
    SetDelay(Duration),
}

/// Handle to a debounced value driven by a background tokio task.
///
/// [`set`](Self::set) never changes the output synchronously; the task
/// commits the observed value once the input has been quiet for the delay,
/// then notifies every [`subscribe`](Self::subscribe)d receiver. Dropping
/// the handle tears the task down and discards any pending value without
/// emitting it.
pub struct Debounced<T> {
    cmd_tx: mpsc::UnboundedSender<Command<T>>,
    out_rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Debounced<T> {
    /// Spawn the timer task. Must be called inside a tokio runtime.
    ///
    /// The output starts as `initial`; no timer is armed until the first
    /// [`set`](Self::set) or [`set_delay`](Self::set_delay).
    pub fn spawn(initial: T, delay: Duration) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (out_tx, out_rx) = watch::channel(initial.clone());
        tokio::spawn(run(Debouncer::new(initial, delay), cmd_rx, out_tx));
        Self { cmd_tx, out_rx }
    }

    /// Observe a new value. The wait window restarts.
    pub fn set(&self, value: T) {
        // Send failure means the task is gone and nobody is observing.
        let _ = self.cmd_tx.send(Command::Set(value));
    }

    /// Change the delay. Restarts the wait window with the observed value.
    pub fn set_delay(&self, delay: Duration) {
        let _ = self.cmd_tx.send(Command::SetDelay(delay));
    }

    /// Clone of the current settled value.
    pub fn get(&self) -> T {
        self.out_rx.borrow().clone()
    }

    /// Receiver notified on every settle.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.out_rx.clone()
    }
}

/// Timer loop owning the debouncer state.
///
/// A single sleep is armed per iteration from the debouncer's deadline, so
/// re-arming replaces the old timer before it can ever be polled again.
async fn run<T: Clone>(
    mut debouncer: Debouncer<T>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command<T>>,
    out_tx: watch::Sender<T>,
) {
    loop {
        let deadline = debouncer.deadline();
        let timer = async {
            match deadline {
                Some(deadline) => sleep_until(Instant::from_std(deadline)).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::Set(value)) => {
                    trace!("observed new value, rearming");
                    debouncer.update_at(value, Instant::now().into_std());
                }
                Some(Command::SetDelay(delay)) => {
                    debug!(?delay, "delay changed, rearming");
                    debouncer.set_delay_at(delay, Instant::now().into_std());
                }
                // Handle dropped: discard any pending value and stop.
                None => break,
            },
            _ = timer => {
                if debouncer.poll_at(Instant::now().into_std()) {
                    trace!("value settled");
                    let _ = out_tx.send(debouncer.current().clone());
                }
            }
        }
    }
}
