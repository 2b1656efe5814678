use crate::error::{PoolError, Result};
use crate::runtime::builder::PoolConfig;
use crate::runtime::context::{current_worker, enter_worker};
use crate::runtime::executor::worker::Worker;
use crate::runtime::task::Task;
use crate::runtime::work_stealing::WorkStealingQueue;
use crate::runtime::work_stealing::injector::Injector;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::{self, JoinHandle};

/// State shared by every worker of a pool.
pub(crate) struct Shared {
    /// One queue per worker; worker `i` owns `locals[i]`.
    pub(crate) locals: Vec<WorkStealingQueue>,

    /// Fallback queue and parking coordination.
    pub(crate) injector: Injector,

    /// Pool configuration.
    pub(crate) config: PoolConfig,

    /// Round-robin cursor for external submissions.
    cursor: AtomicUsize,
}

impl Shared {
    /// Routes a task submitted from outside the pool.
    ///
    /// Worker queues are tried in round-robin order with a non-blocking
    /// `try_push`. If every queue is contended, the task goes to the
    /// injector, which always accepts it.
    pub(crate) fn inject(&self, task: Task) {
        let len = self.locals.len();
        let start = self.cursor.fetch_add(1, Ordering::Relaxed) % len;

        let mut task = task;
        for i in 0..len {
            match self.locals[(start + i) % len].try_push(task) {
                Ok(()) => {
                    self.injector.notify();
                    return;
                }
                Err(returned) => task = returned,
            }
        }

        tracing::trace!("all worker queues contended, using the injector");
        self.injector.push(task);
    }

    /// Returns `true` when no queue of the pool holds a task.
    ///
    /// Tasks already taken into a worker's execution buffer are not
    /// counted; that worker runs them before looking for more.
    pub(crate) fn is_drained(&self) -> bool {
        self.injector.is_empty() && self.locals.iter().all(WorkStealingQueue::is_empty)
    }
}

/// Multi-threaded task executor.
///
/// The `Executor` owns the worker threads of a pool. It:
/// - creates one [`WorkStealingQueue`] per worker,
/// - spawns and names the worker threads,
/// - routes submitted tasks,
/// - shuts down in order when dropped: workers drain every queue, are
///   joined, and anything still stranded runs on the dropping thread.
///   Dropping it from one of its own tasks detaches that worker.
pub(crate) struct Executor {
    shared: Arc<Shared>,

    /// Join handles for worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Creates the shared state and spawns `config.worker_threads`
    /// workers.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Spawn`] if a thread cannot be spawned. The
    /// workers spawned so far are shut down and joined.
    pub(crate) fn new(config: PoolConfig) -> Result<Self> {
        let threads = config.worker_threads;

        let shared = Arc::new(Shared {
            locals: (0..threads).map(|_| WorkStealingQueue::new()).collect(),
            injector: Injector::new(),
            config,
            cursor: AtomicUsize::new(0),
        });

        let mut executor = Self {
            shared: shared.clone(),
            handles: Vec::with_capacity(threads),
        };

        for index in 0..threads {
            let worker = Worker::new(index, shared.clone());

            let handle = thread::Builder::new()
                .name(format!("{}-{}", shared.config.thread_name, index))
                .spawn(move || worker.run())
                .map_err(|source| PoolError::Spawn { index, source })?;

            executor.handles.push(handle);
        }

        tracing::debug!(workers = threads, "pool started");

        Ok(executor)
    }

    /// Number of worker threads.
    pub(crate) fn worker_count(&self) -> usize {
        self.shared.locals.len()
    }

    /// Submits a task.
    ///
    /// From a worker of this pool, the task is pushed onto that worker's
    /// own queue, even during shutdown. From any other thread it is
    /// routed through [`Shared::inject`].
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ShutDown`] for external submissions once
    /// shutdown has begun.
    pub(crate) fn submit(&self, task: Task) -> Result<()> {
        if let Some(worker) = current_worker() {
            if worker.belongs_to(&self.shared) {
                worker.push_local(task);
                return Ok(());
            }
        }

        if self.is_shutdown() {
            return Err(PoolError::ShutDown);
        }

        self.shared.inject(task);
        Ok(())
    }

    /// Stops accepting external submissions and wakes every worker.
    ///
    /// Workers keep running until all queues are drained.
    pub(crate) fn shutdown(&self) {
        self.shared.injector.shutdown();
    }

    /// Returns `true` once shutdown has begun.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shared.injector.is_shutdown()
    }

    /// Waits for all worker threads, then runs whatever was queued too
    /// late for them to see.
    ///
    /// When called from one of the pool's own workers, that thread is not
    /// joined: it finishes the current task and exits on its own.
    fn join(&mut self) {
        let current = thread::current().id();

        for handle in self.handles.drain(..) {
            if handle.thread().id() == current {
                tracing::debug!("pool dropped from its own worker, detaching it");
                continue;
            }

            if handle.join().is_err() {
                tracing::error!("worker thread panicked");
            }
        }

        if self.shared.is_drained() {
            return;
        }

        tracing::debug!("running stranded tasks");

        // Leftovers run as a worker so that nested commits still succeed.
        match current_worker().filter(|worker| worker.belongs_to(&self.shared)) {
            Some(worker) => worker.drain(),
            None => {
                let worker = Worker::new(0, self.shared.clone());
                enter_worker(worker.clone(), || worker.drain());
            }
        }
    }
}

impl Drop for Executor {
    /// Shuts down the pool.
    ///
    /// 1. Stops external submissions and wakes parked workers
    /// 2. Lets workers drain the queues and joins them
    /// 3. Runs any task left behind on the current thread
    fn drop(&mut self) {
        self.shutdown();
        self.join();

        tracing::debug!("pool stopped");
    }
}
