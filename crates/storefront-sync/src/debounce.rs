//! Trailing-edge debounce timer.

use std::future::Future;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs the most recently scheduled task once `delay` has passed without a
/// new schedule.
///
/// Rescheduling or cancelling only aborts the wait. Once the delay elapses the
/// task is spawned on its own, so a task that has started always completes.
/// Dropping the debouncer cancels the pending wait.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            timer: Mutex::new(None),
        }
    }

    /// The quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `task`, replacing any task still waiting.
    ///
    /// Returns false when called outside a Tokio runtime; nothing is
    /// scheduled in that case.
    pub fn schedule<F>(&self, task: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("No async runtime; debounced task dropped");
            return false;
        };

        let delay = self.delay;
        let runtime = handle.clone();
        let timer = handle.spawn(async move {
            tokio::time::sleep(delay).await;
            runtime.spawn(task);
        });

        let previous = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(timer);
        if let Some(previous) = previous {
            previous.abort();
        }
        true
    }

    /// Cancel the waiting task. Returns true if one was still waiting.
    pub fn cancel(&self) -> bool {
        let timer = self
            .timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match timer {
            Some(timer) => {
                let waiting = !timer.is_finished();
                timer.abort();
                waiting
            }
            None => false,
        }
    }

    /// Check if a task is waiting for the quiet period to end.
    pub fn is_pending(&self) -> bool {
        self.timer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(
        counter: &Arc<AtomicUsize>,
        by: usize,
    ) -> impl Future<Output = ()> + Send + 'static {
        let counter = counter.clone();
        async move {
            counter.fetch_add(by, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_after_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let counter = Arc::new(AtomicUsize::new(0));

        assert!(debouncer.schedule(counting(&counter, 1)));
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_keeps_only_last_task() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&counter, 1));
        tokio::time::sleep(Duration::from_millis(300)).await;
        debouncer.schedule(counting(&counter, 10));

        // first deadline passes without running anything
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let counter = Arc::new(AtomicUsize::new(0));

        debouncer.schedule(counting(&counter, 1));
        assert!(debouncer.cancel());
        assert!(!debouncer.cancel());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let counter = Arc::new(AtomicUsize::new(0));
        {
            let debouncer = Debouncer::new(Duration::from_millis(500));
            debouncer.schedule(counting(&counter, 1));
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_schedule_outside_runtime() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        assert!(!debouncer.schedule(async {}));
        assert!(!debouncer.is_pending());
    }
}
