//! Work-stealing scheduler components.
//!
//! This module holds the data structures the pool uses to distribute
//! tasks across worker threads:
//! - [`queue`]: the per-worker [`WorkStealingQueue`], pushed and popped
//!   at the front by its owner and stolen from at the back by peers,
//! - [`injector`]: the pool-wide fallback queue for tasks committed from
//!   outside the pool that lost every `try_push` race.
//!
//! Each structure is guarded by its own mutex and no operation ever
//! holds two guards at once.

pub(crate) mod injector;
pub(crate) mod queue;

pub use queue::WorkStealingQueue;
