//! Errors reported by the thread pool.
//!
//! The queues themselves never fail loudly: contention and emptiness are
//! reported through `Option`, `bool` and `Result<(), T>` values. Only the
//! pool layer has error conditions worth naming.

use std::io;
use thiserror::Error;

/// Errors produced by [`ThreadPool`](crate::ThreadPool) and task handles.
#[derive(Debug, Error)]
pub enum PoolError {
    /// The pool stopped accepting tasks.
    #[error("the pool is shutting down and no longer accepts tasks")]
    ShutDown,

    /// A task-level commit was attempted from a thread that is not a
    /// pool worker.
    #[error("tasks can only be committed this way from a pool worker thread")]
    OutsidePool,

    /// The task panicked while running.
    #[error("task panicked: {0}")]
    TaskPanicked(String),

    /// The task was dropped before it produced a result.
    #[error("task was dropped before producing a result")]
    Disconnected,

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread {index}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },

    /// A worker could not be pinned to its CPU.
    #[error("failed to bind worker {index} to cpu {cpu}")]
    Affinity {
        index: usize,
        cpu: usize,
        #[source]
        source: io::Error,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = PoolError> = std::result::Result<T, E>;
