//! Scoped background tasks.
//!
//! A [`TaskGuard`] owns the cancellation of a scheduled task. Dropping the
//! guard cancels the task synchronously, so a task can never outlive the
//! state that created it.

use std::fmt;
use std::future::Future;

use tokio::task::JoinHandle;

/// Cancels its task when dropped.
pub struct TaskGuard {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TaskGuard {
    /// Spawns `future` on the current tokio runtime and guards it.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle: JoinHandle<()> = tokio::spawn(future);
        Self::on_drop(move || handle.abort())
    }

    /// Creates a guard that runs `cancel` when dropped.
    pub fn on_drop(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancels the task now.
    pub fn cancel(self) {
        drop(self);
    }
}

impl Drop for TaskGuard {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TaskGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGuard")
            .field("armed", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::time::{sleep, Duration};

    #[test]
    fn test_on_drop_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);

        let guard = TaskGuard::on_drop(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 0);

        guard.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_task_aborted_on_drop() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let guard = TaskGuard::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });
        drop(guard);

        sleep(Duration::from_secs(2)).await;
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_spawned_task_runs_while_held() {
        let fired = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&fired);

        let _guard = TaskGuard::spawn(async move {
            sleep(Duration::from_secs(1)).await;
            flag.store(true, Ordering::SeqCst);
        });

        sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
    }
}
