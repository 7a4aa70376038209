//! Bounded dispatch of client operations.
//!
//! Every logical operation (one round trip plus its decode) is submitted as
//! a unit of work. At most `workers` units run concurrently; `submit` itself
//! never blocks the caller.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Handle to an in-flight operation.
///
/// The operation reaches exactly one terminal state, completed with a value
/// or failed with an [`Error`], no matter how often the caller probes
/// [`is_done`](Self::is_done). Dropping the handle detaches the operation;
/// it still runs to completion. No cancellation is exposed.
#[derive(Debug)]
pub struct PendingOperation<T> {
    handle: JoinHandle<Result<T>>,
}

impl<T> PendingOperation<T> {
    /// Non-blocking probe; may be called any number of times.
    pub fn is_done(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the terminal state, consuming the handle.
    pub async fn get(self) -> Result<T> {
        match self.handle.await {
            Ok(outcome) => outcome,
            Err(join) => Err(Error::Dispatch(join)),
        }
    }
}

/// Fixed-capacity worker pool backed by a semaphore.
#[derive(Clone)]
pub struct Dispatcher {
    permits: Arc<Semaphore>,
}

impl Dispatcher {
    pub fn new(workers: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Submit a unit of work. The unit waits for a free worker slot inside
    /// its own task, so completion order across units is unspecified.
    pub fn submit<T, F>(&self, unit: F) -> PendingOperation<T>
    where
        T: Send + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let handle = tokio::spawn(async move {
            // The semaphore is never closed for the life of the dispatcher.
            let _permit = permits
                .acquire_owned()
                .await
                .expect("dispatcher semaphore closed");
            unit.await
        });
        PendingOperation { handle }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use super::*;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("jiraffe=debug")
            .with_test_writer()
            .try_init();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn fifty_operations_on_ten_workers_all_reach_a_terminal_state() {
        init_tracing();
        let dispatcher = Dispatcher::new(10);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut pending = Vec::new();
        for index in 0..50usize {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            pending.push(dispatcher.submit(async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok::<_, Error>(index)
            }));
        }

        for (index, operation) in pending.into_iter().enumerate() {
            assert_eq!(operation.get().await.unwrap(), index);
        }
        assert!(peak.load(Ordering::SeqCst) <= 10);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn is_done_becomes_true_without_consuming_the_handle() {
        let dispatcher = Dispatcher::new(2);
        let operation = dispatcher.submit(async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok::<_, Error>(42)
        });
        assert!(!operation.is_done());
        while !operation.is_done() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(operation.is_done());
        assert_eq!(operation.get().await.unwrap(), 42);
    }

    #[tokio::test]
    async fn a_failing_unit_fails_only_itself() {
        let dispatcher = Dispatcher::new(2);
        let failing = dispatcher.submit(async {
            Err::<(), _>(Error::Config("boom".into()))
        });
        let healthy = dispatcher.submit(async { Ok::<_, Error>("fine") });

        assert!(failing.get().await.is_err());
        assert_eq!(healthy.get().await.unwrap(), "fine");
    }
}
