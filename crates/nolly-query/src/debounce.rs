//! Trailing-edge debouncing of a changing value.

use std::fmt;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Emits the input only after it has stayed unchanged for `delay`.
///
/// Equal consecutive values are not re-emitted. Dropping the debouncer
/// cancels a pending emission.
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    delay: Duration,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Starts a debouncer whose output begins at `initial`.
    ///
    /// Must be called within a Tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, mut in_rx) = watch::channel(initial.clone());
        let (out_tx, output) = watch::channel(initial);

        let task = tokio::spawn(async move {
            while in_rx.changed().await.is_ok() {
                loop {
                    tokio::select! {
                        changed = in_rx.changed() => {
                            if changed.is_err() {
                                return;
                            }
                        }
                        () = tokio::time::sleep(delay) => break,
                    }
                }
                let latest = in_rx.borrow_and_update().clone();
                out_tx.send_if_modified(|current| {
                    if *current == latest {
                        false
                    } else {
                        *current = latest;
                        true
                    }
                });
            }
        });

        Self {
            input,
            output,
            delay,
            task,
        }
    }

    /// Feeds a new input value, restarting the quiet period.
    pub fn push(&self, value: T) {
        self.input.send_replace(value);
    }

    /// Current debounced value.
    #[must_use]
    pub fn value(&self) -> T {
        self.output.borrow().clone()
    }

    /// Receiver of the debounced value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    /// Waits for the next debounced value.
    pub async fn changed(&mut self) -> Option<T> {
        self.output.changed().await.ok()?;
        Some(self.output.borrow_and_update().clone())
    }

    /// Quiet period.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl<T: fmt::Debug> fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("value", &*self.output.borrow())
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}
