//! Test doubles for code built on tidepool.
//!
//! [`MemoryStore`] is an in-memory [`Store`] that records every
//! `save_state` call, so tests can assert on exactly what a pipeline wrote
//! and in which order.
//!
//! ```rust
//! use tidepool::effect::prelude::*;
//! use tidepool::pipeline::bind;
//! use tidepool::testing::MemoryStore;
//!
//! # tokio_test::block_on(async {
//! let store = MemoryStore::new(String::from("idle"));
//!
//! bind("start", &store)
//!     .reduce(|_, action| format!("{}ed", action))
//!     .run()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(store.state(), "started");
//! assert_eq!(store.saves(), vec![("started".to_string(), "idle".to_string())]);
//! assert_eq!(store.get_count(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::pipeline::Store;

/// In-memory [`Store`] recording `(new, old)` pairs of every save.
///
/// With a fallible error type, failures can be queued with
/// [`push_get_failure`](MemoryStore::push_get_failure) and
/// [`push_save_failure`](MemoryStore::push_save_failure); each queued error
/// is returned by one call, in order.
#[derive(Debug)]
pub struct MemoryStore<S, E = Infallible> {
    state: Mutex<S>,
    saves: Mutex<Vec<(S, S)>>,
    gets: AtomicUsize,
    get_failures: Mutex<VecDeque<E>>,
    save_failures: Mutex<VecDeque<E>>,
}

impl<S> MemoryStore<S> {
    /// A store that never fails, starting at `initial`.
    pub fn new(initial: S) -> Self {
        Self::fallible(initial)
    }
}

impl<S, E> MemoryStore<S, E> {
    /// A store with error type `E`, starting at `initial`.
    pub fn fallible(initial: S) -> Self {
        Self {
            state: Mutex::new(initial),
            saves: Mutex::new(Vec::new()),
            gets: AtomicUsize::new(0),
            get_failures: Mutex::new(VecDeque::new()),
            save_failures: Mutex::new(VecDeque::new()),
        }
    }

    /// Fail the next unanswered `get_state` call with `error`.
    pub fn push_get_failure(&self, error: E) {
        lock(&self.get_failures).push_back(error);
    }

    /// Fail the next unanswered `save_state` call with `error`.
    pub fn push_save_failure(&self, error: E) {
        lock(&self.save_failures).push_back(error);
    }

    /// Number of `get_state` calls, failed ones included.
    pub fn get_count(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

impl<S: Clone, E> MemoryStore<S, E> {
    /// The current state.
    pub fn state(&self) -> S {
        lock(&self.state).clone()
    }

    /// Every successful save as `(new, old)`, oldest first.
    pub fn saves(&self) -> Vec<(S, S)> {
        lock(&self.saves).clone()
    }
}

impl<S, E> Store for MemoryStore<S, E>
where
    S: Clone + Send + Sync,
    E: Send,
{
    type State = S;
    type Error = E;

    async fn get_state(&self) -> Result<S, E> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.get_failures).pop_front() {
            return Err(error);
        }
        Ok(lock(&self.state).clone())
    }

    async fn save_state(&self, new: &S, old: &S) -> Result<(), E> {
        if let Some(error) = lock(&self.save_failures).pop_front() {
            return Err(error);
        }
        lock(&self.saves).push((new.clone(), old.clone()));
        *lock(&self.state) = new.clone();
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
