//! The cache-aside read-through operation.

use crate::cache::traits::{CacheItem, CacheLock};
use crate::effect::Effect;

/// Read a cached value, computing and storing it on a miss.
///
/// Created by [`get_or_add`] or [`CacheItemExt::get_or_add`].
pub struct GetOrAdd<'a, I, L, F> {
    item: &'a I,
    lock: &'a L,
    compute: F,
}

impl<I, L, F> std::fmt::Debug for GetOrAdd<'_, I, L, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GetOrAdd")
            .field("compute", &"<function>")
            .finish_non_exhaustive()
    }
}

impl<I, L, F, Eff> Effect for GetOrAdd<'_, I, L, F>
where
    I: CacheItem,
    L: CacheLock,
    F: FnOnce() -> Eff + Send,
    Eff: Effect<Output = I::Value>,
    Eff::Error: From<I::Error> + From<L::Error>,
{
    type Output = I::Value;
    type Error = Eff::Error;

    async fn run(self) -> Result<I::Value, Eff::Error> {
        if let Some(value) = self.item.get().await?.into_option() {
            tracing::trace!("cache hit");
            return Ok(value);
        }

        tracing::debug!("cache miss, acquiring lock");
        self.lock.acquire().await?;
        let held = HeldLock::new(self.lock);

        let filled = fill(self.item, self.compute).await;
        let released = self.lock.release().await;
        held.disarm();

        match (filled, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(release_err)) => Err(release_err.into()),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(_)) => {
                tracing::warn!("cache lock release failed after a failed fill");
                Err(err)
            }
        }
    }
}

/// Releases the lock through [`CacheLock::release_on_drop`] if the
/// critical section is dropped before its own release ran.
struct HeldLock<'a, L: CacheLock> {
    lock: &'a L,
    armed: bool,
}

impl<'a, L: CacheLock> HeldLock<'a, L> {
    fn new(lock: &'a L) -> Self {
        Self { lock, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<L: CacheLock> Drop for HeldLock<'_, L> {
    fn drop(&mut self) {
        if self.armed {
            tracing::debug!("cache fill abandoned, releasing lock");
            self.lock.release_on_drop();
        }
    }
}

/// The critical section: re-read, then compute and store if still absent.
async fn fill<I, F, Eff>(item: &I, compute: F) -> Result<I::Value, Eff::Error>
where
    I: CacheItem,
    F: FnOnce() -> Eff + Send,
    Eff: Effect<Output = I::Value>,
    Eff::Error: From<I::Error>,
{
    if let Some(value) = item.get().await?.into_option() {
        tracing::debug!("cache filled by another caller while waiting for the lock");
        return Ok(value);
    }

    tracing::debug!("computing cache value");
    let value = compute().run().await?;
    item.set(&value).await?;
    Ok(value)
}

/// Return the value in `item`, or compute, store and return it.
///
/// 1. Read `item`. A present value is returned without touching the lock.
/// 2. Acquire `lock` and read `item` again. A caller that waited on the
///    lock while another filled the slot returns the stored value.
/// 3. Otherwise run `compute`, store its value and return it.
///
/// The lock is released on every path after a successful acquire. When
/// `compute` fails nothing is stored, so a later caller computes again. A
/// failed acquire is not followed by a release. If the returned future is
/// dropped while holding the lock (a timeout, an aborted task, a panicking
/// compute), the lock is given back through [`CacheLock::release_on_drop`].
///
/// # Example
///
/// ```rust
/// use std::convert::Infallible;
/// use tidepool::cache::{get_or_add, LocalCell, LocalLock};
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let cell = LocalCell::new();
/// let lock = LocalLock::new();
///
/// let first = get_or_add(&cell, &lock, || pure::<_, Infallible>(42)).run().await;
/// let second = get_or_add(&cell, &lock, || pure::<_, Infallible>(0)).run().await;
///
/// assert_eq!(first, Ok(42));
/// assert_eq!(second, Ok(42));
/// # });
/// ```
pub fn get_or_add<'a, I, L, F, Eff>(item: &'a I, lock: &'a L, compute: F) -> GetOrAdd<'a, I, L, F>
where
    I: CacheItem,
    L: CacheLock,
    F: FnOnce() -> Eff + Send,
    Eff: Effect<Output = I::Value>,
    Eff::Error: From<I::Error> + From<L::Error>,
{
    GetOrAdd {
        item,
        lock,
        compute,
    }
}

/// Method form of [`get_or_add`] for every [`CacheItem`].
pub trait CacheItemExt: CacheItem + Sized {
    /// See [`get_or_add`].
    fn get_or_add<'a, L, F, Eff>(&'a self, lock: &'a L, compute: F) -> GetOrAdd<'a, Self, L, F>
    where
        L: CacheLock,
        F: FnOnce() -> Eff + Send,
        Eff: Effect<Output = Self::Value>,
        Eff::Error: From<Self::Error> + From<L::Error>,
    {
        get_or_add(self, lock, compute)
    }
}

impl<I: CacheItem> CacheItemExt for I {}
