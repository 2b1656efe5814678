use super::TaskHandle;
use crate::error::{PoolError, Result};
use crate::runtime::context::current_worker;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

/// A unit of work that can be executed exactly once.
///
/// `Runnable` is what a [`Task`] erases: any `FnOnce() + Send + 'static`
/// closure implements it, and so can hand-written job types that want
/// to carry their own state.
pub trait Runnable: Send + 'static {
    /// Executes the work, consuming it.
    fn run(self: Box<Self>);
}

impl<F> Runnable for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (*self)()
    }
}

/// An opaque, move-only unit of work scheduled through the pool.
///
/// A `Task` is owned by exactly one holder at a time: the thread that
/// created it, then the queue it was pushed to, then the thread that
/// popped or stole it. [`run`](Self::run) consumes the task, so it can
/// never be executed twice.
pub struct Task {
    runnable: Box<dyn Runnable>,
}

impl Task {
    /// Wraps a runnable into a task.
    pub fn new<R>(runnable: R) -> Self
    where
        R: Runnable,
    {
        Self {
            runnable: Box::new(runnable),
        }
    }

    /// Executes the task on the current thread.
    pub fn run(self) {
        self.runnable.run();
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task").finish_non_exhaustive()
    }
}

/// Wraps `job` into a task whose outcome is reported to a handle.
///
/// A panic inside `job` is caught and forwarded to the handle instead
/// of unwinding through the worker.
pub(crate) fn task_with_handle<F, R>(job: F) -> (Task, TaskHandle<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (sender, receiver) = mpsc::channel();

    let task = Task::new(move || {
        let outcome = panic::catch_unwind(AssertUnwindSafe(job));

        if outcome.is_err() {
            tracing::error!("committed task panicked");
        }

        // The handle may already be gone; the outcome is then discarded.
        let _ = sender.send(outcome);
    });

    (task, TaskHandle::new(receiver))
}

/// Commits a job from inside a running task.
///
/// The job is pushed onto the front of the current worker's own queue,
/// so it is usually the next thing that worker runs, unless a peer
/// steals it first. Jobs committed this way are accepted even while the
/// pool is shutting down: the worker drains its own queue before it
/// exits.
///
/// # Errors
///
/// Returns [`PoolError::OutsidePool`] when the calling thread is not a
/// pool worker.
///
/// # Examples
///
/// ```rust,ignore
/// let handle = pool.commit(|| {
///     let child = tessera::task::commit(|| 20).unwrap();
///     child.join().unwrap() + 1
/// })?;
/// assert_eq!(handle.join()?, 21);
/// ```
pub fn commit<F, R>(job: F) -> Result<TaskHandle<R>>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let worker = current_worker().ok_or(PoolError::OutsidePool)?;

    let (task, handle) = task_with_handle(job);
    worker.push_local(task);

    Ok(handle)
}
