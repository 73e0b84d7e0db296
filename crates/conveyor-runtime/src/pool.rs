//! The bounded blocking worker pool.
//!
//! One pool is shared by every route whose handler is blocking; routes only
//! submit to it. The bound caps how many blocking handlers run at once;
//! submissions beyond the cap wait for a slot, which is how saturation
//! surfaces to callers: as latency, never as an error.

use async_trait::async_trait;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use conveyor_core::{BlockingJob, ExecutorError, ExecutorResult, TaskExecutor};

use crate::config::PoolConfig;

/// A bounded executor over tokio's blocking thread pool.
///
/// Shutdown is cooperative: [`shutdown`](BoundedBlockingPool::shutdown)
/// rejects new submissions, while jobs already running are left to finish.
pub struct BoundedBlockingPool {
    /// Available worker slots.
    slots: Semaphore,
    /// Set once shutdown has been requested.
    cancel: CancellationToken,
    max_workers: usize,
}

impl BoundedBlockingPool {
    /// Creates a pool with the given number of worker slots.
    pub fn new(max_workers: usize) -> Self {
        debug!(max_workers, "Blocking pool created");
        Self {
            slots: Semaphore::new(max_workers),
            cancel: CancellationToken::new(),
            max_workers,
        }
    }

    /// Creates a pool sized from configuration.
    pub fn from_config(config: &PoolConfig) -> Self {
        Self::new(config.max_workers)
    }

    /// The configured number of worker slots.
    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Worker slots currently free.
    pub fn available_workers(&self) -> usize {
        self.slots.available_permits()
    }

    /// Rejects all further submissions.
    pub fn shutdown(&self) {
        info!("Blocking pool shutting down");
        self.cancel.cancel();
    }

    /// Whether shutdown has been requested.
    pub fn is_shut_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[async_trait]
impl TaskExecutor for BoundedBlockingPool {
    async fn execute(&self, job: BlockingJob) -> ExecutorResult<()> {
        if self.cancel.is_cancelled() {
            return Err(ExecutorError::Shutdown);
        }

        let permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(ExecutorError::Shutdown),
            permit = self.slots.acquire() => permit.map_err(|_| ExecutorError::Shutdown)?,
        };

        let result = tokio::task::spawn_blocking(job).await;
        drop(permit);

        result.map_err(|err| {
            if err.is_panic() {
                ExecutorError::JobPanicked(err.to_string())
            } else {
                ExecutorError::Shutdown
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio_test::assert_ok;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn never_exceeds_the_worker_ceiling() {
        let pool = Arc::new(BoundedBlockingPool::new(2));
        let active = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..6 {
            let pool = Arc::clone(&pool);
            let active = Arc::clone(&active);
            let peak = Arc::clone(&peak);

            tasks.push(tokio::spawn(async move {
                pool.execute(Box::new(move || {
                    let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(30));
                    active.fetch_sub(1, Ordering::SeqCst);
                }))
                .await
                .unwrap();
            }));
        }

        for task in tasks {
            task.await.unwrap();
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(pool.available_workers(), 2);
    }

    #[tokio::test]
    async fn shutdown_rejects_new_submissions() {
        let pool = BoundedBlockingPool::new(1);
        pool.shutdown();

        let err = pool.execute(Box::new(|| {})).await.unwrap_err();
        assert!(matches!(err, ExecutorError::Shutdown));
        assert!(pool.is_shut_down());
    }

    #[tokio::test]
    async fn panicking_job_is_reported() {
        let pool = BoundedBlockingPool::new(1);

        let err = pool.execute(Box::new(|| panic!("boom"))).await.unwrap_err();
        assert!(matches!(err, ExecutorError::JobPanicked(_)));

        // The slot is released even after a panic.
        assert_eq!(pool.available_workers(), 1);
    }

    #[tokio::test]
    async fn pool_is_sized_from_config() {
        let pool = BoundedBlockingPool::from_config(&PoolConfig { max_workers: 3 });
        assert_eq!(pool.max_workers(), 3);
        assert_eq!(pool.available_workers(), 3);

        tokio_test::assert_ok!(pool.execute(Box::new(|| {})).await);
    }
}
