//! Cache-aside reads with a double-checked lock.
//!
//! [`get_or_add`] reads a [`CacheItem`] and, on a miss, computes the value
//! under a [`CacheLock`] so concurrent callers racing on the same key run
//! the computation once:
//!
//! ```text
//! read ── present ──────────────────────────────▶ value
//!   │
//!   └─ absent ─▶ acquire ─▶ read ── present ─▶ release ─▶ value
//!                             │
//!                             └─ absent ─▶ compute ─▶ write ─▶ release ─▶ value
//! ```
//!
//! The item and lock are capabilities, so any backing store works: implement
//! the two traits for a Redis key, a database row or, as [`local`] does, an
//! in-process slot.

mod get_or_add;
pub mod local;
mod traits;
mod value;

pub use get_or_add::{get_or_add, CacheItemExt, GetOrAdd};
pub use local::{LocalCell, LocalLock};
pub use traits::{CacheItem, CacheLock};
pub use value::CachedValue;
