use super::builder::{PoolBuilder, PoolConfig};
use super::executor::core::Executor;
use super::task::{Task, TaskHandle, task_with_handle};
use crate::error::Result;

/// A work-stealing thread pool.
///
/// `ThreadPool` is responsible for:
/// - running one worker per configured thread, each owning a
///   [`WorkStealingQueue`](crate::WorkStealingQueue),
/// - routing committed tasks onto those queues,
/// - letting idle workers steal from busy ones,
/// - shutting down in order when dropped.
///
/// Dropping the pool stops external submissions, lets the workers drain
/// every queue and joins them. When the last owner is one of the pool's
/// own tasks, the worker running it is left to exit after that task.
pub struct ThreadPool {
    /// Worker threads and the queues they share.
    executor: Executor,
}

impl ThreadPool {
    pub(crate) fn new(config: PoolConfig) -> Result<Self> {
        let executor = Executor::new(config)?;

        Ok(Self { executor })
    }

    /// Returns a [`PoolBuilder`] with default configuration.
    pub fn builder() -> PoolBuilder {
        PoolBuilder::new()
    }

    /// Commits a job to the pool and returns a handle to its result.
    ///
    /// Called from one of this pool's workers, the job goes to the front
    /// of that worker's queue. Called from anywhere else, it is placed
    /// on the first worker queue whose guard is free, or on the pool
    /// injector if all of them are busy.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`](crate::PoolError::ShutDown) when
    /// called from outside the pool after [`shutdown`](Self::shutdown).
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let handle = pool.commit(|| 6 * 7)?;
    /// assert_eq!(handle.join()?, 42);
    /// ```
    pub fn commit<F, R>(&self, job: F) -> Result<TaskHandle<R>>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let (task, handle) = task_with_handle(job);
        self.executor.submit(task)?;

        Ok(handle)
    }

    /// Submits a job without a result handle.
    ///
    /// A panic inside `job` is logged and contained by the worker.
    ///
    /// # Errors
    ///
    /// Same as [`commit`](Self::commit).
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        self.executor.submit(Task::new(job))
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.executor.worker_count()
    }

    /// Begins shutdown without waiting for it.
    ///
    /// External submissions are rejected from now on; tasks already
    /// queued, and sub-tasks they commit, still run. Dropping the pool
    /// waits for them.
    pub fn shutdown(&self) {
        self.executor.shutdown();
    }

    /// Returns `true` once shutdown has begun.
    pub fn is_shutdown(&self) -> bool {
        self.executor.is_shutdown()
    }
}
