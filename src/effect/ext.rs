//! Extension trait providing combinator methods for all Effects.
//!
//! The `EffectExt` trait is automatically implemented for all types
//! that implement `Effect`. It provides ergonomic combinator methods
//! like `map`, `then`, `catch`, and `boxed`.

use crate::effect::boxed::BoxedEffect;
use crate::effect::combinators::{Catch, CatchValue, Map, MapErr, Then};
use crate::effect::trait_def::Effect;
use crate::kind::Kinded;
use crate::retry::{Retry, RetryPolicy};

/// Extension trait providing combinator methods for all Effects.
///
/// This trait is automatically implemented for all types that implement `Effect`.
/// You don't need to implement this trait yourself.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let effect = pure::<_, String>(21)
///     .map(|x| x * 2)
///     .then(|x| pure(x + 1))
///     .map_err(|e| format!("Error: {}", e));
///
/// assert_eq!(effect.run().await, Ok(43));
/// # });
/// ```
pub trait EffectExt: Effect {
    /// Transform the success value with a synchronous continuation.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tidepool::effect::prelude::*;
    /// # tokio_test::block_on(async {
    /// let effect = pure::<_, String>(21).map(|x| x * 2);
    /// assert_eq!(effect.run().await, Ok(42));
    /// # });
    /// ```
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        F: FnOnce(Self::Output) -> U + Send,
        U: Send,
    {
        Map { inner: self, f }
    }

    /// Transform the error value.
    ///
    /// Useful for converting error types to enable chaining with `then`.
    fn map_err<E2, F>(self, f: F) -> MapErr<Self, F>
    where
        F: FnOnce(Self::Error) -> E2 + Send,
        E2: Send,
    {
        MapErr { inner: self, f }
    }

    /// Chain a dependent effect.
    ///
    /// If this effect succeeds, the continuation receives the value and
    /// produces the next effect. If this effect fails, the continuation is
    /// never invoked and the error propagates.
    ///
    /// # Example
    ///
    /// ```rust
    /// # use tidepool::effect::prelude::*;
    /// # tokio_test::block_on(async {
    /// let effect = pure::<_, String>(21).then(|x| pure(x * 2));
    /// assert_eq!(effect.run().await, Ok(42));
    /// # });
    /// ```
    fn then<E2, F>(self, f: F) -> Then<Self, F>
    where
        E2: Effect<Error = Self::Error>,
        F: FnOnce(Self::Output) -> E2 + Send,
    {
        Then { inner: self, f }
    }

    /// Recover from errors of exactly `kind`.
    ///
    /// The handler receives the matching error and returns the effect whose
    /// result replaces this one. Errors of any other kind propagate, and
    /// the handler is never called on success.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::io;
    /// use tidepool::effect::prelude::*;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = fail::<&str, _>(io::Error::from(io::ErrorKind::NotFound))
    ///     .catch(io::ErrorKind::NotFound, |_| pure("fallback"));
    ///
    /// assert_eq!(effect.run().await.unwrap(), "fallback");
    /// # });
    /// ```
    fn catch<E2, H>(
        self,
        kind: <Self::Error as Kinded>::Kind,
        handler: H,
    ) -> Catch<Self, <Self::Error as Kinded>::Kind, H>
    where
        Self::Error: Kinded,
        H: FnOnce(Self::Error) -> E2 + Send,
        E2: Effect<Output = Self::Output, Error = Self::Error>,
    {
        Catch {
            inner: self,
            kind,
            handler,
        }
    }

    /// Recover from errors of exactly `kind` with a substitute value.
    fn catch_value<H>(
        self,
        kind: <Self::Error as Kinded>::Kind,
        handler: H,
    ) -> CatchValue<Self, <Self::Error as Kinded>::Kind, H>
    where
        Self::Error: Kinded,
        H: FnOnce(Self::Error) -> Self::Output + Send,
    {
        CatchValue {
            inner: self,
            kind,
            handler,
        }
    }

    /// Convert to a boxed effect for type erasure.
    ///
    /// Use this when different branches produce different effect types,
    /// or when effects are stored in collections.
    fn boxed(self) -> BoxedEffect<Self::Output, Self::Error>
    where
        Self: 'static,
        Self::Output: 'static,
        Self::Error: 'static,
    {
        BoxedEffect::new(self)
    }
}

impl<E: Effect> EffectExt for E {}

/// Retry entry point for effect factories.
///
/// Effects are consumed when they run, so retrying needs a factory that
/// builds a fresh effect per attempt. Any `FnMut() -> impl Effect` closure
/// gets [`retry_on`](RetryFactoryExt::retry_on).
///
/// # Example
///
/// ```rust
/// use std::io;
/// use tidepool::effect::prelude::*;
/// use tidepool::{RetryFactoryExt, RetryPolicy};
///
/// # tokio_test::block_on(async {
/// let result = (|| pure::<_, io::Error>(7))
///     .retry_on(io::ErrorKind::Interrupted, RetryPolicy::immediate(3))
///     .run()
///     .await;
///
/// assert_eq!(result.unwrap(), 7);
/// # });
/// ```
pub trait RetryFactoryExt<Eff>: FnMut() -> Eff + Sized
where
    Eff: Effect,
    Eff::Error: Kinded,
{
    /// Retry effects from this factory while they fail with `kind`.
    fn retry_on(
        self,
        kind: <Eff::Error as Kinded>::Kind,
        policy: RetryPolicy,
    ) -> Retry<Self, Eff::Error> {
        Retry::new(self, policy, kind)
    }
}

impl<F, Eff> RetryFactoryExt<Eff> for F
where
    F: FnMut() -> Eff,
    Eff: Effect,
    Eff::Error: Kinded,
{
}
