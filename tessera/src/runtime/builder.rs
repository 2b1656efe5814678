use super::ThreadPool;
use crate::error::Result;

use std::thread;

/// Tuning knobs shared by every worker of a pool.
#[derive(Debug, Clone)]
pub(crate) struct PoolConfig {
    pub(crate) worker_threads: usize,
    pub(crate) local_batch_size: usize,
    pub(crate) pool_batch_size: usize,
    pub(crate) steal_batch_size: usize,
    pub(crate) batch_tasks: bool,
    pub(crate) bind_cpu: bool,
    pub(crate) thread_name: String,
}

/// Builder for configuring and creating a [`ThreadPool`].
///
/// # Examples
///
/// ```rust,ignore
/// let pool = PoolBuilder::new()
///     .worker_threads(4)
///     .steal_batch_size(8)
///     .build()?;
/// ```
pub struct PoolBuilder {
    config: PoolConfig,
}

impl PoolBuilder {
    /// Creates a new `PoolBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    /// Workers move tasks two at a time, batching is enabled and CPU
    /// binding is disabled.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            config: PoolConfig {
                worker_threads,
                local_batch_size: 2,
                pool_batch_size: 2,
                steal_batch_size: 2,
                batch_tasks: true,
                bind_cpu: false,
                thread_name: "tessera-worker".to_owned(),
            },
        }
    }

    /// Sets the number of worker threads, and therefore of queues.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.config.worker_threads = n;
        self
    }

    /// Sets how many tasks a worker takes from its own queue at once.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn local_batch_size(mut self, n: usize) -> Self {
        assert!(n > 0, "local_batch_size must be > 0");

        self.config.local_batch_size = n;
        self
    }

    /// Sets how many tasks a worker takes from the injector at once.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn pool_batch_size(mut self, n: usize) -> Self {
        assert!(n > 0, "pool_batch_size must be > 0");

        self.config.pool_batch_size = n;
        self
    }

    /// Sets how many tasks a worker steals from a peer at once.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn steal_batch_size(mut self, n: usize) -> Self {
        assert!(n > 0, "steal_batch_size must be > 0");

        self.config.steal_batch_size = n;
        self
    }

    /// Chooses between batch and single-task queue operations.
    ///
    /// When disabled, workers pop, steal and drain the injector one task
    /// per guard acquisition.
    pub fn batch_tasks(mut self, enabled: bool) -> Self {
        self.config.batch_tasks = enabled;
        self
    }

    /// Pins worker `i` to logical CPU `i % cpus` when enabled.
    ///
    /// Binding failures are logged and the worker runs unpinned.
    pub fn bind_cpu(mut self, enabled: bool) -> Self {
        self.config.bind_cpu = enabled;
        self
    }

    /// Sets the worker thread name prefix; workers are named
    /// `"{prefix}-{index}"`.
    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name = prefix.into();
        self
    }

    /// Builds the pool and starts its workers.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Spawn`](crate::PoolError::Spawn) if a worker
    /// thread cannot be spawned. Workers already started are shut down.
    pub fn build(self) -> Result<ThreadPool> {
        ThreadPool::new(self.config)
    }
}

impl Default for PoolBuilder {
    /// Creates a default `PoolBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
