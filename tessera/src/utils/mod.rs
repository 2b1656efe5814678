//! Internal data-structure utilities.
//!
//! Exposes the [`Slab`] allocator, used for indexed storage with reuse
//! of freed slots.

mod slab;

pub(crate) use slab::Slab;
