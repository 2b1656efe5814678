//! Result caching.
//!
//! Provides [`LruCache`], a bounded map that evicts its least recently
//! used entry on overflow. It is a plain single-threaded container: wrap
//! it in a lock to share it between tasks.

mod lru;

pub use lru::{DEFAULT_CAPACITY, LruCache};
