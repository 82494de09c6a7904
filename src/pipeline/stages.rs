//! Pipeline stages: bind, reduce, effect, catch.

use std::marker::PhantomData;

use crate::effect::Effect;
use crate::kind::Kinded;
use crate::pipeline::store::Store;

/// The outcome of a reduction: the action and both state snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction<A, S> {
    /// The action that was reduced.
    pub action: A,
    /// The state read from the store before reducing.
    pub old_state: S,
    /// The state the reducer produced and the store saved.
    pub new_state: S,
}

impl<A, S> Reduction<A, S> {
    /// Restore the old state by saving `(old, new)`.
    pub async fn rollback<St>(&self, store: &St) -> Result<(), St::Error>
    where
        St: Store<State = S>,
    {
        tracing::debug!("rolling back state");
        store.save_state(&self.old_state, &self.new_state).await
    }
}

/// An action bound to a store. Created by [`bind`].
#[derive(Debug, Clone)]
pub struct Bound<A, St> {
    action: A,
    store: St,
}

/// Bind `action` to `store`, starting a pipeline.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
/// use tidepool::pipeline::bind;
/// use tidepool::testing::MemoryStore;
///
/// # tokio_test::block_on(async {
/// let store = MemoryStore::new(10u32);
///
/// let reduction = bind(3u32, &store)
///     .reduce(|balance, spend| balance - spend)
///     .run()
///     .await
///     .unwrap();
///
/// assert_eq!((reduction.old_state, reduction.new_state), (10, 7));
/// assert_eq!(store.saves(), vec![(7, 10)]);
/// # });
/// ```
pub fn bind<A, St: Store>(action: A, store: St) -> Bound<A, St> {
    Bound { action, store }
}

impl<A, St: Store> Bound<A, St> {
    /// Compute the new state with an infallible reducer.
    #[allow(clippy::type_complexity)]
    pub fn reduce<F>(
        self,
        reducer: F,
    ) -> Reduced<A, St, impl FnOnce(&St::State, &A) -> Result<St::State, St::Error> + Send, St::Error>
    where
        F: FnOnce(&St::State, &A) -> St::State + Send,
    {
        self.try_reduce(move |state: &St::State, action: &A| Ok(reducer(state, action)))
    }

    /// Compute the new state with a fallible reducer.
    ///
    /// A reducer error ends the pipeline before anything is saved.
    pub fn try_reduce<F, E>(self, reducer: F) -> Reduced<A, St, F, E>
    where
        F: FnOnce(&St::State, &A) -> Result<St::State, E> + Send,
        E: From<St::Error> + Send,
    {
        Reduced {
            action: self.action,
            store: self.store,
            reducer,
            _error: PhantomData,
        }
    }
}

/// Read, reduce and save. Created by [`Bound::reduce`] or
/// [`Bound::try_reduce`].
///
/// Running it yields the [`Reduction`]; [`effect`](Reduced::effect) adds a
/// side-effect stage.
pub struct Reduced<A, St, R, E> {
    action: A,
    store: St,
    reducer: R,
    _error: PhantomData<fn() -> E>,
}

impl<A: std::fmt::Debug, St, R, E> std::fmt::Debug for Reduced<A, St, R, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reduced")
            .field("action", &self.action)
            .field("reducer", &"<function>")
            .finish_non_exhaustive()
    }
}

impl<A, St, R, E> Effect for Reduced<A, St, R, E>
where
    A: Send,
    St: Store,
    R: FnOnce(&St::State, &A) -> Result<St::State, E> + Send,
    E: From<St::Error> + Send,
{
    type Output = Reduction<A, St::State>;
    type Error = E;

    async fn run(self) -> Result<Self::Output, E> {
        let Reduced {
            action,
            store,
            reducer,
            ..
        } = self;

        let old_state = store.get_state().await?;
        tracing::debug!("state read");

        let new_state = reducer(&old_state, &action)?;

        store.save_state(&new_state, &old_state).await?;
        tracing::debug!("state saved");

        Ok(Reduction {
            action,
            old_state,
            new_state,
        })
    }
}

impl<A, St, R, E> Reduced<A, St, R, E> {
    /// Run `effect_fn(old_state, new_state, action)` after the new state is
    /// saved. Its result is the pipeline's result.
    pub fn effect<F, Eff>(self, effect_fn: F) -> Effected<Self, F>
    where
        Self: Effect<Output = Reduction<A, St::State>, Error = E>,
        St: Store,
        F: FnOnce(St::State, St::State, A) -> Eff + Send,
        Eff: Effect,
        Eff::Error: From<E>,
    {
        Effected {
            reduced: self,
            effect_fn,
        }
    }
}

/// A reduction followed by a side effect. Created by [`Reduced::effect`].
pub struct Effected<P, F> {
    reduced: P,
    effect_fn: F,
}

impl<P: std::fmt::Debug, F> std::fmt::Debug for Effected<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effected")
            .field("reduced", &self.reduced)
            .field("effect_fn", &"<function>")
            .finish()
    }
}

impl<P, F, Eff, A, S> Effect for Effected<P, F>
where
    P: Effect<Output = Reduction<A, S>>,
    F: FnOnce(S, S, A) -> Eff + Send,
    Eff: Effect,
    Eff::Error: From<P::Error>,
{
    type Output = Eff::Output;
    type Error = Eff::Error;

    async fn run(self) -> Result<Eff::Output, Eff::Error> {
        let Reduction {
            action,
            old_state,
            new_state,
        } = self.reduced.run().await?;

        (self.effect_fn)(old_state, new_state, action).run().await
    }
}

impl<P, F> Effected<P, F> {
    /// Recover from effect failures of exactly `kind`.
    ///
    /// `handler` receives the error and the [`Reduction`], so it can
    /// compensate (for example with [`Reduction::rollback`]) and return a
    /// substitute result or fail again. Failures while reading, reducing or
    /// saving happen before the effect and are never passed to `handler`.
    pub fn catch<A, S, Eff, H, Next>(
        self,
        kind: <Eff::Error as Kinded>::Kind,
        handler: H,
    ) -> Compensated<P, F, <Eff::Error as Kinded>::Kind, H>
    where
        P: Effect<Output = Reduction<A, S>>,
        A: Clone + Send,
        S: Clone + Send,
        F: FnOnce(S, S, A) -> Eff + Send,
        Eff: Effect,
        Eff::Error: Kinded + From<P::Error>,
        H: FnOnce(Eff::Error, Reduction<A, S>) -> Next + Send,
        Next: Effect<Output = Eff::Output, Error = Eff::Error>,
    {
        Compensated {
            reduced: self.reduced,
            effect_fn: self.effect_fn,
            kind,
            handler,
        }
    }
}

/// An effect stage with a compensating handler. Created by
/// [`Effected::catch`].
pub struct Compensated<P, F, K, H> {
    reduced: P,
    effect_fn: F,
    kind: K,
    handler: H,
}

impl<P: std::fmt::Debug, F, K: std::fmt::Debug, H> std::fmt::Debug for Compensated<P, F, K, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compensated")
            .field("reduced", &self.reduced)
            .field("effect_fn", &"<function>")
            .field("kind", &self.kind)
            .field("handler", &"<function>")
            .finish()
    }
}

impl<P, F, K, H, Eff, Next, A, S> Effect for Compensated<P, F, K, H>
where
    P: Effect<Output = Reduction<A, S>>,
    A: Clone + Send,
    S: Clone + Send,
    F: FnOnce(S, S, A) -> Eff + Send,
    Eff: Effect,
    Eff::Error: Kinded<Kind = K> + From<P::Error>,
    K: std::fmt::Debug + Send,
    H: FnOnce(Eff::Error, Reduction<A, S>) -> Next + Send,
    Next: Effect<Output = Eff::Output, Error = Eff::Error>,
{
    type Output = Eff::Output;
    type Error = Eff::Error;

    async fn run(self) -> Result<Eff::Output, Eff::Error> {
        let reduction = self.reduced.run().await?;
        let snapshot = reduction.clone();

        let Reduction {
            action,
            old_state,
            new_state,
        } = reduction;

        match (self.effect_fn)(old_state, new_state, action).run().await {
            Ok(value) => Ok(value),
            Err(error) if error.is_kind(&self.kind) => {
                tracing::debug!(kind = ?self.kind, "effect failed, compensating");
                (self.handler)(error, snapshot).run().await
            }
            Err(error) => Err(error),
        }
    }
}
