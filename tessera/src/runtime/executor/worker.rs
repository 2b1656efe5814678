use crate::error::PoolError;
use crate::runtime::context::enter_worker;
use crate::runtime::executor::affinity;
use crate::runtime::executor::core::Shared;
use crate::runtime::task::Task;

use std::cell::RefCell;
use std::collections::VecDeque;
use std::error::Error;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread;

thread_local! {
    /// Tasks this worker already took out of a queue but has not run
    /// yet. Only the owning thread can see them.
    static BUFFER: RefCell<VecDeque<Task>> = const { RefCell::new(VecDeque::new()) };
}

/// A worker thread of the pool.
///
/// Each worker owns the queue at its index and repeatedly looks for
/// work in this order:
/// 1. its local execution buffer,
/// 2. a batch popped from the front of its own queue,
/// 3. a batch taken from the injector,
/// 4. a batch stolen from the back of a peer's queue, visiting peers
///    round-robin starting after itself,
/// 5. otherwise it parks, or exits once shutdown was requested and
///    every queue is drained.
///
/// No queue guard is held while a task runs.
#[derive(Clone)]
pub(crate) struct Worker {
    /// Identifier of the worker and index of its queue.
    index: usize,

    /// State shared with the rest of the pool.
    shared: Arc<Shared>,
}

impl Worker {
    pub(crate) fn new(index: usize, shared: Arc<Shared>) -> Self {
        Self { index, shared }
    }

    /// Runs the worker loop on the current thread until shutdown.
    pub(crate) fn run(self) {
        if self.shared.config.bind_cpu {
            self.bind_cpu();
        }

        tracing::debug!(worker = self.index, "worker started");

        enter_worker(self.clone(), || self.run_loop());

        tracing::debug!(worker = self.index, "worker exited");
    }

    fn run_loop(&self) {
        loop {
            self.drain();

            if self.shared.injector.is_shutdown() {
                break;
            }

            self.shared.injector.park();
        }
    }

    /// Runs tasks until the buffer and every queue of the pool are empty.
    pub(crate) fn drain(&self) {
        loop {
            if self.run_next() {
                continue;
            }

            if self.shared.is_drained() {
                return;
            }

            // Work exists but every guard we tried was contended.
            thread::yield_now();
        }
    }

    /// Finds one task and runs it.
    ///
    /// Returns `false` if no work could be found. Also used by
    /// [`TaskHandle::join`](crate::task::TaskHandle::join) on worker
    /// threads, so a task waiting for another one keeps the pool moving.
    pub(crate) fn run_next(&self) -> bool {
        let task = match pop_buffered() {
            Some(task) => task,
            None if self.refill() => match pop_buffered() {
                Some(task) => task,
                None => return false,
            },
            None => return false,
        };

        run_task(self.index, task);
        true
    }

    /// Pushes a task onto the front of this worker's own queue and wakes
    /// a parked peer so it may steal it.
    pub(crate) fn push_local(&self, task: Task) {
        self.shared.locals[self.index].push(task);
        self.shared.injector.notify();
    }

    /// Returns `true` if this worker belongs to the pool owning `shared`.
    pub(crate) fn belongs_to(&self, shared: &Arc<Shared>) -> bool {
        Arc::ptr_eq(&self.shared, shared)
    }

    /// Moves a batch of tasks into the execution buffer.
    fn refill(&self) -> bool {
        let mut batch = Vec::new();

        let found =
            self.take_local(&mut batch) || self.take_injected(&mut batch) || self.steal(&mut batch);

        if found {
            BUFFER.with(|buffer| buffer.borrow_mut().extend(batch));
        }

        found
    }

    fn take_local(&self, batch: &mut Vec<Task>) -> bool {
        let queue = &self.shared.locals[self.index];

        if self.shared.config.batch_tasks {
            queue.try_pop_batch(batch, self.shared.config.local_batch_size)
        } else {
            queue.try_pop().map(|task| batch.push(task)).is_some()
        }
    }

    fn take_injected(&self, batch: &mut Vec<Task>) -> bool {
        let max = if self.shared.config.batch_tasks {
            self.shared.config.pool_batch_size
        } else {
            1
        };

        self.shared.injector.pop_batch(batch, max)
    }

    /// Steals from peers, visited round-robin starting after this worker
    /// to spread stealers over victims.
    fn steal(&self, batch: &mut Vec<Task>) -> bool {
        let locals = &self.shared.locals;
        let len = locals.len();

        for i in 1..len {
            let victim = (self.index + i) % len;

            let stolen = if self.shared.config.batch_tasks {
                locals[victim].try_steal_batch(batch, self.shared.config.steal_batch_size)
            } else {
                locals[victim].try_steal().map(|task| batch.push(task)).is_some()
            };

            if stolen {
                tracing::trace!(
                    worker = self.index,
                    victim,
                    tasks = batch.len(),
                    "stole tasks"
                );
                return true;
            }
        }

        false
    }

    fn bind_cpu(&self) {
        let cpus = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let cpu = self.index % cpus;

        match affinity::bind_current_thread(cpu) {
            Ok(()) => tracing::debug!(worker = self.index, cpu, "worker bound to cpu"),
            Err(source) => {
                let error = PoolError::Affinity {
                    index: self.index,
                    cpu,
                    source,
                };
                let error: &(dyn Error + 'static) = &error;
                tracing::warn!(error, "running worker unpinned");
            }
        }
    }
}

fn pop_buffered() -> Option<Task> {
    BUFFER.with(|buffer| buffer.borrow_mut().pop_front())
}

/// Runs a task, containing any panic so the calling thread survives.
fn run_task(worker: usize, task: Task) {
    if panic::catch_unwind(AssertUnwindSafe(|| task.run())).is_err() {
        tracing::error!(worker, "task panicked");
    }
}
