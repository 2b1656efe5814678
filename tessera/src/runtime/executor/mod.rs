//! Pool executor.
//!
//! This module contains the machinery that runs tasks on worker threads:
//! - [`core`]: the state shared by all workers, thread spawning, task
//!   routing and orderly shutdown,
//! - [`worker`]: the per-thread loop that pops local work, drains the
//!   injector and steals from peers,
//! - [`affinity`]: optional pinning of workers to CPUs.

pub(crate) mod affinity;
pub(crate) mod core;
pub(crate) mod worker;
