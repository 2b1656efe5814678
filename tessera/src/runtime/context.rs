use crate::runtime::executor::worker::Worker;

use std::cell::RefCell;

thread_local! {
    /// The worker the current thread runs as, if any.
    ///
    /// Set for the whole lifetime of a worker thread so that tasks can
    /// commit sub-tasks onto their own worker's queue, and joins can help
    /// run queued work, without holding a reference to the pool.
    static CURRENT_WORKER: RefCell<Option<Worker>> = const { RefCell::new(None) };
}

/// Runs `f` with `worker` installed as the current thread's worker.
///
/// The previous context is restored afterwards.
pub(crate) fn enter_worker<R>(worker: Worker, f: impl FnOnce() -> R) -> R {
    let previous = CURRENT_WORKER.with(|current| current.replace(Some(worker)));

    let out = f();

    CURRENT_WORKER.with(|current| current.replace(previous));

    out
}

/// Returns the current thread's worker, if it is a pool worker.
pub(crate) fn current_worker() -> Option<Worker> {
    CURRENT_WORKER.with(|current| current.borrow().clone())
}
