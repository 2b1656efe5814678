//! # Tessera
//!
//! **Tessera** is a work-stealing thread pool built around one small
//! primitive: the [`WorkStealingQueue`], a mutex-guarded double-ended
//! task queue owned by a single worker thread.
//!
//! Each worker pushes and pops its own work at the front of its queue,
//! while idle peers steal from the back. Load balances itself without
//! a central dispatcher, and the owner and a stealer touch opposite ends
//! of the same queue.
//!
//! The crate offers:
//!
//! - A **work-stealing queue** with blocking `push`, and non-blocking
//!   `try_push`, `try_pop`, `try_steal` and their batch variants
//! - A **thread pool** with configurable batch sizes and optional CPU
//!   binding, returning [`TaskHandle`](task::TaskHandle)s for results
//! - An **LRU cache** for memoizing task results
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tessera::PoolBuilder;
//!
//! let pool = PoolBuilder::new().worker_threads(4).build()?;
//!
//! let handle = pool.commit(|| {
//!     // Sub-tasks go to the front of this worker's own queue.
//!     let child = tessera::task::commit(|| 20)?;
//!     Ok::<_, tessera::PoolError>(child.join()? + 22)
//! })?;
//!
//! assert_eq!(handle.join()??, 42);
//! ```
//!
//! ## Modules
//!
//! - [`task`]: Tasks, result handles and in-task commits
//! - [`cache`]: The LRU cache

mod error;
mod runtime;
mod utils;

pub mod cache;

pub use cache::LruCache;
pub use error::{PoolError, Result};
pub use runtime::task;
pub use runtime::{PoolBuilder, ThreadPool, WorkStealingQueue};
