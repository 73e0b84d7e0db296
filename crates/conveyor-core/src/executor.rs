//! Task execution capability.
//!
//! Blocking handlers run off the scheduling context, on an executor the
//! route only submits to; sizing, queuing, and saturation policy belong to
//! whoever owns the executor. The capability is injected at route
//! construction so tests can substitute a deterministic implementation.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{ExecutorError, ExecutorResult};

/// A unit of synchronous work submitted to an executor.
pub type BlockingJob = Box<dyn FnOnce() + Send + 'static>;

/// A bounded task-execution capability for blocking work.
#[async_trait]
pub trait TaskExecutor: Send + Sync {
    /// Runs `job` off the calling context, completing once it has finished.
    ///
    /// Under saturation the submission itself may wait; that backpressure is
    /// the executor's policy and is never reported as a job failure.
    async fn execute(&self, job: BlockingJob) -> ExecutorResult<()>;
}

/// A boxed executor trait object.
pub type BoxedExecutor = Arc<dyn TaskExecutor>;

// =============================================================================
// Spawn-Blocking Executor
// =============================================================================

/// The ambient default executor: tokio's shared blocking pool.
///
/// `spawn_blocking` queues beyond the pool's thread limit, so submission
/// never fails under load; it only takes longer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpawnBlockingExecutor;

#[async_trait]
impl TaskExecutor for SpawnBlockingExecutor {
    async fn execute(&self, job: BlockingJob) -> ExecutorResult<()> {
        tokio::task::spawn_blocking(job).await.map_err(|err| {
            if err.is_panic() {
                ExecutorError::JobPanicked(err.to_string())
            } else {
                ExecutorError::Shutdown
            }
        })
    }
}

// =============================================================================
// Inline Executor
// =============================================================================

/// Runs jobs synchronously on the calling thread.
///
/// Deterministic substitute for tests; never use where the job would stall
/// the scheduling context.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

#[async_trait]
impl TaskExecutor for InlineExecutor {
    async fn execute(&self, job: BlockingJob) -> ExecutorResult<()> {
        job();
        Ok(())
    }
}
