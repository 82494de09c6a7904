//! Store adapter that retries reads and writes.

use crate::effect::{from_future, Effect};
use crate::kind::Kinded;
use crate::pipeline::store::Store;
use crate::retry::{retry, RetryPolicy};

/// A [`Store`] whose operations retry on one error kind.
///
/// Created by [`StoreExt::with_retry`](crate::pipeline::StoreExt::with_retry).
#[derive(Debug, Clone)]
pub struct Retrying<St, K> {
    store: St,
    policy: RetryPolicy,
    kind: K,
}

impl<St, K> Retrying<St, K> {
    pub(crate) fn new(store: St, policy: RetryPolicy, kind: K) -> Self {
        Self {
            store,
            policy,
            kind,
        }
    }

    /// The wrapped store.
    pub fn inner(&self) -> &St {
        &self.store
    }

    /// Unwrap the adapter.
    pub fn into_inner(self) -> St {
        self.store
    }
}

impl<St, K> Store for Retrying<St, K>
where
    St: Store,
    St::Error: Kinded<Kind = K>,
    K: Copy + Send + Sync,
{
    type State = St::State;
    type Error = St::Error;

    async fn get_state(&self) -> Result<St::State, St::Error> {
        retry(
            || from_future(self.store.get_state()),
            self.policy.fresh(),
            self.kind,
        )
        .run()
        .await
    }

    async fn save_state(&self, new: &St::State, old: &St::State) -> Result<(), St::Error> {
        retry(
            || from_future(self.store.save_state(new, old)),
            self.policy.fresh(),
            self.kind,
        )
        .run()
        .await
    }
}
