use crate::runtime::task::Task;

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// How long an idle worker sleeps before scanning the queues again.
const PARK_TIMEOUT: Duration = Duration::from_millis(1);

/// Pool-wide fallback queue.
///
/// Tasks land here when an external `commit` could not place them on
/// any worker queue without waiting. The injector also coordinates
/// worker parking: idle workers wait on its condition variable and are
/// woken whenever work is injected or shutdown begins.
pub(crate) struct Injector {
    /// Injected tasks, taken in FIFO order.
    queue: Mutex<VecDeque<Task>>,

    /// Wakes parked workers.
    condvar: Condvar,

    /// Set once the pool stops accepting work.
    shutdown: AtomicBool,
}

impl Injector {
    /// Creates an empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            queue: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Signals shutdown and wakes every parked worker.
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);

        let _queue = self.lock();
        self.condvar.notify_all();
    }

    /// Returns `true` once [`shutdown`](Self::shutdown) was called.
    pub(crate) fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Appends a task and wakes one parked worker.
    pub(crate) fn push(&self, task: Task) {
        self.lock().push_back(task);
        self.condvar.notify_one();
    }

    /// Wakes one parked worker without injecting anything.
    ///
    /// Used after a task was placed directly on a worker queue, so that
    /// a sleeping peer gets a chance to steal it.
    pub(crate) fn notify(&self) {
        self.condvar.notify_one();
    }

    /// Returns `true` if no task is waiting in the injector.
    pub(crate) fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Moves up to `max` tasks into `batch`, oldest first.
    ///
    /// Returns `true` if at least one task was moved.
    pub(crate) fn pop_batch(&self, batch: &mut Vec<Task>, max: usize) -> bool {
        let mut queue = self.lock();

        let take = max.min(queue.len());
        batch.extend(queue.drain(..take));

        take > 0
    }

    /// Parks the calling worker until work is injected, shutdown
    /// begins, or a short timeout elapses.
    ///
    /// The timeout bounds how long a task pushed directly onto a peer's
    /// queue can go unnoticed.
    pub(crate) fn park(&self) {
        let queue = self.lock();

        if self.is_shutdown() || !queue.is_empty() {
            return;
        }

        let _ = self
            .condvar
            .wait_timeout(queue, PARK_TIMEOUT)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
