use crate::error::{PoolError, Result};
use crate::runtime::context::current_worker;

use std::any::Any;
use std::sync::mpsc::{Receiver, TryRecvError};
use std::thread;

/// A handle to a committed task.
///
/// The handle receives the task's return value once a worker has run
/// it. Dropping the handle does **not** cancel the task; it only
/// discards the ability to observe its result.
pub struct TaskHandle<R> {
    receiver: Receiver<thread::Result<R>>,
}

impl<R> TaskHandle<R> {
    pub(crate) fn new(receiver: Receiver<thread::Result<R>>) -> Self {
        Self { receiver }
    }

    /// Blocks until the task has run and returns its result.
    ///
    /// On a pool worker thread the wait is spent running other queued
    /// tasks, so a task can join a sub-task it committed even when it is
    /// the only worker.
    ///
    /// # Errors
    ///
    /// - [`PoolError::TaskPanicked`] if the task panicked,
    /// - [`PoolError::Disconnected`] if the task was dropped unexecuted.
    pub fn join(self) -> Result<R> {
        if let Some(worker) = current_worker() {
            loop {
                if let Some(result) = self.try_join() {
                    return result;
                }

                if !worker.run_next() {
                    thread::yield_now();
                }
            }
        }

        match self.receiver.recv() {
            Ok(outcome) => outcome.map_err(panicked),
            Err(_) => Err(PoolError::Disconnected),
        }
    }

    /// Returns the result if the task has already run, without blocking.
    ///
    /// Returns `None` while the task is still queued or running. Once a
    /// result has been returned, later calls report
    /// [`PoolError::Disconnected`].
    pub fn try_join(&self) -> Option<Result<R>> {
        match self.receiver.try_recv() {
            Ok(outcome) => Some(outcome.map_err(panicked)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PoolError::Disconnected)),
        }
    }
}

fn panicked(payload: Box<dyn Any + Send>) -> PoolError {
    let message = if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    };

    PoolError::TaskPanicked(message)
}
