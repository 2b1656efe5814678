//! Core runtime components.
//!
//! This module contains the building blocks of the pool:
//! - [`task`]: the unit of work and its result handle,
//! - `work_stealing`: the per-worker deques and the injector,
//! - `executor`: worker threads and shutdown,
//! - [`builder`]: pool configuration.
//!
//! Most users only touch [`ThreadPool`], [`PoolBuilder`] and
//! [`WorkStealingQueue`].

mod core;
mod executor;
mod work_stealing;

pub(crate) mod builder;
pub(crate) mod context;

pub mod task;

pub use self::core::ThreadPool;
pub use builder::PoolBuilder;
pub use work_stealing::WorkStealingQueue;
