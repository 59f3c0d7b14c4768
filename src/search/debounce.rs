use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Publishes a value once it has stopped changing for `delay`.
///
/// Every `observe` cancels the pending timer and arms a new one, so at most
/// one timer is live. Publication always happens on a spawned task, even with
/// a zero delay, and dropping the debouncer cancels whatever is pending.
pub struct Debouncer<T> {
    delay: Duration,
    generation: u64,
    pending: Option<JoinHandle<()>>,
    latest: Option<T>,
    tx: mpsc::UnboundedSender<(u64, T)>,
    rx: mpsc::UnboundedReceiver<(u64, T)>,
}

impl<T> Debouncer<T>
where
    T: Clone + Send + 'static,
{
    pub fn new(delay: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            delay,
            generation: 0,
            pending: None,
            latest: None,
            tx,
            rx,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Re-arms the timer with `value`. Must be called inside a tokio runtime.
    pub fn observe(&mut self, value: T) {
        self.cancel();

        let generation = self.generation;
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // The receiver lives as long as the debouncer
            let _ = tx.send((generation, value));
        }));
    }

    /// Drops the pending timer, if any. A value already queued by a timer
    /// that fired before the cancel is discarded as well.
    pub fn cancel(&mut self) {
        self.generation += 1;
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Last value that made it through the quiet period.
    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }

    /// Waits for the next stable value. Cancel-safe, so it can sit in a
    /// `tokio::select!` next to other event sources.
    pub async fn fired(&mut self) -> Option<T> {
        loop {
            let (generation, value) = self.rx.recv().await?;
            // Tagged before the last cancel: superseded while queued.
            if generation != self.generation {
                continue;
            }
            self.pending = None;
            self.latest = Some(value.clone());
            return Some(value);
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
