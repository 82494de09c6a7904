//! In-process cache items and locks.
//!
//! Handy for tests and for memoizing within a single process. Both types
//! are infallible; pair them with any compute error that implements
//! `From<Infallible>`.

use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{OwnedMutexGuard, RwLock};

use crate::cache::traits::{CacheItem, CacheLock};
use crate::cache::value::CachedValue;

/// A single in-memory slot.
#[derive(Debug)]
pub struct LocalCell<T> {
    slot: RwLock<Option<T>>,
}

impl<T> LocalCell<T> {
    /// An empty cell.
    pub fn new() -> Self {
        Self {
            slot: RwLock::new(None),
        }
    }

    /// A cell that already holds `value`.
    pub fn with_value(value: T) -> Self {
        Self {
            slot: RwLock::new(Some(value)),
        }
    }

    /// Empty the cell.
    pub async fn clear(&self) {
        *self.slot.write().await = None;
    }
}

impl<T> Default for LocalCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> CacheItem for LocalCell<T>
where
    T: Clone + Send + Sync,
{
    type Value = T;
    type Error = Infallible;

    async fn get(&self) -> Result<CachedValue<T>, Infallible> {
        Ok(self.slot.read().await.clone().into())
    }

    async fn set(&self, value: &T) -> Result<(), Infallible> {
        *self.slot.write().await = Some(value.clone());
        Ok(())
    }
}

/// An async mutex usable through the acquire/release pair of [`CacheLock`].
///
/// The hold is not tied to a task: whoever calls `release` frees the lock.
/// Releasing a lock that is not held does nothing.
#[derive(Debug, Default)]
pub struct LocalLock {
    mutex: Arc<tokio::sync::Mutex<()>>,
    held: Mutex<Option<OwnedMutexGuard<()>>>,
}

impl LocalLock {
    /// An unlocked lock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true while some caller holds the lock.
    pub fn is_held(&self) -> bool {
        self.held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl CacheLock for LocalLock {
    type Error = Infallible;

    async fn acquire(&self) -> Result<(), Infallible> {
        let guard = self.mutex.clone().lock_owned().await;
        *self.held.lock().unwrap_or_else(PoisonError::into_inner) = Some(guard);
        Ok(())
    }

    async fn release(&self) -> Result<(), Infallible> {
        self.release_on_drop();
        Ok(())
    }

    fn release_on_drop(&self) {
        let guard = self
            .held
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        drop(guard);
    }
}
