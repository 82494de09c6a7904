//! The state store capability.

use std::future::Future;
use std::sync::Arc;

use crate::kind::Kinded;
use crate::pipeline::retrying::Retrying;
use crate::retry::RetryPolicy;

/// The single source of truth for a pipeline's state.
///
/// `save_state` receives the new state first and the state it replaces
/// second, so implementations can do optimistic concurrency checks or
/// write audit records. A rollback is the same call with the arguments
/// swapped.
pub trait Store: Send + Sync {
    /// The state type.
    type State: Send + Sync;
    /// Errors reading or writing state.
    type Error: Send;

    /// Read the current state.
    fn get_state(&self) -> impl Future<Output = Result<Self::State, Self::Error>> + Send;

    /// Replace `old` with `new`.
    fn save_state(
        &self,
        new: &Self::State,
        old: &Self::State,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl<S: Store> Store for &S {
    type State = S::State;
    type Error = S::Error;

    fn get_state(&self) -> impl Future<Output = Result<S::State, S::Error>> + Send {
        (**self).get_state()
    }

    fn save_state(
        &self,
        new: &S::State,
        old: &S::State,
    ) -> impl Future<Output = Result<(), S::Error>> + Send {
        (**self).save_state(new, old)
    }
}

impl<S: Store> Store for Arc<S> {
    type State = S::State;
    type Error = S::Error;

    fn get_state(&self) -> impl Future<Output = Result<S::State, S::Error>> + Send {
        (**self).get_state()
    }

    fn save_state(
        &self,
        new: &S::State,
        old: &S::State,
    ) -> impl Future<Output = Result<(), S::Error>> + Send {
        (**self).save_state(new, old)
    }
}

/// Adapters available on every [`Store`].
pub trait StoreExt: Store + Sized {
    /// Retry `get_state` and `save_state` on errors of `kind`.
    ///
    /// Every call starts from a fresh copy of `policy`, so one call
    /// exhausting its attempts does not affect the next.
    ///
    /// ```rust
    /// use std::io;
    /// use tidepool::pipeline::{Store, StoreExt};
    /// use tidepool::testing::MemoryStore;
    /// use tidepool::RetryPolicy;
    ///
    /// # tokio_test::block_on(async {
    /// let store = MemoryStore::<u32, io::Error>::fallible(1);
    /// store.push_get_failure(io::ErrorKind::TimedOut.into());
    ///
    /// let store = store.with_retry(RetryPolicy::immediate(2), io::ErrorKind::TimedOut);
    /// assert_eq!(store.get_state().await.unwrap(), 1);
    /// # });
    /// ```
    fn with_retry(
        self,
        policy: RetryPolicy,
        kind: <Self::Error as Kinded>::Kind,
    ) -> Retrying<Self, <Self::Error as Kinded>::Kind>
    where
        Self::Error: Kinded,
    {
        Retrying::new(self, policy, kind)
    }
}

impl<S: Store> StoreExt for S {}
