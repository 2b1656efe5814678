//! Task primitives.
//!
//! This module defines what the pool schedules and how callers observe
//! it:
//! - [`Task`], the opaque move-only unit of work stored in the queues,
//! - [`Runnable`], the trait a task erases,
//! - [`TaskHandle`], returned by `commit` to wait for a task's result,
//! - [`commit`], which submits work from inside a running task.

mod core;
mod handle;

pub(crate) use self::core::task_with_handle;

pub use self::core::{Runnable, Task, commit};
pub use handle::TaskHandle;
