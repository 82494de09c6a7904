//! Capabilities the cache-aside operation is written against.

use std::future::Future;

use crate::cache::value::CachedValue;

/// One cached slot in some backing store.
///
/// Key scoping is the implementor's concern: a `CacheItem` already refers
/// to a single key.
pub trait CacheItem: Send + Sync {
    /// The cached value type.
    type Value: Send + Sync;
    /// Errors reading or writing the backing store.
    type Error: Send;

    /// Read the slot.
    fn get(&self) -> impl Future<Output = Result<CachedValue<Self::Value>, Self::Error>> + Send;

    /// Overwrite the slot.
    fn set(&self, value: &Self::Value) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// A lock guarding one [`CacheItem`].
///
/// `acquire` suspends until the lock is granted. Callers release the lock
/// exactly once per successful `acquire`.
pub trait CacheLock: Send + Sync {
    /// Errors acquiring or releasing the lock.
    type Error: Send;

    /// Wait for and take the lock.
    fn acquire(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Give the lock back.
    fn release(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Give the lock back synchronously.
    ///
    /// Called instead of [`release`](Self::release) when a holder is dropped
    /// inside its critical section: its future was cancelled by a timeout or
    /// `select!`, its task was aborted, or the computation panicked. It runs
    /// inside `Drop`, so it must not block or await. The default does
    /// nothing, which suits locks that expire on their own.
    fn release_on_drop(&self) {}
}
