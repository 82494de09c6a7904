//! Constructor functions for creating and composing effects.
//!
//! These functions provide ergonomic ways to create effects without
//! directly constructing the combinator types. [`then`] and [`catch`] are
//! the free-function forms of the `EffectExt` methods, for call sites that
//! read better with the source effect as an argument.

use std::future::Future;

use crate::effect::combinators::{Catch, Fail, FromAsync, FromFuture, FromResult, Pure, Then};
use crate::effect::ext::EffectExt;
use crate::effect::trait_def::Effect;
use crate::kind::Kinded;

/// Create an effect that succeeds with `value`.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// assert_eq!(pure::<_, String>(42).run().await, Ok(42));
/// # });
/// ```
pub fn pure<T, E>(value: T) -> Pure<T, E>
where
    T: Send,
    E: Send,
{
    Pure::new(value)
}

/// Create an effect that fails with `error`.
pub fn fail<T, E>(error: E) -> Fail<T, E>
where
    T: Send,
    E: Send,
{
    Fail::new(error)
}

/// Create an effect from a synchronous fallible function.
///
/// The function runs when the effect runs, not when it is built.
pub fn from_fn<T, E, F>(
    f: F,
) -> FromAsync<impl FnOnce() -> std::future::Ready<Result<T, E>> + Send>
where
    F: FnOnce() -> Result<T, E> + Send,
    T: Send,
    E: Send,
{
    FromAsync::new(move || std::future::ready(f()))
}

/// Create an effect from an async closure.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let effect = from_async(|| async { Ok::<_, String>(21 * 2) });
/// assert_eq!(effect.run().await, Ok(42));
/// # });
/// ```
pub fn from_async<T, E, F, Fut>(f: F) -> FromAsync<F>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    FromAsync::new(f)
}

/// Create an effect from a future.
pub fn from_future<T, E, Fut>(future: Fut) -> FromFuture<Fut>
where
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    FromFuture::new(future)
}

/// Create an effect from a `Result`.
pub fn from_result<T, E>(result: Result<T, E>) -> FromResult<T, E>
where
    T: Send,
    E: Send,
{
    FromResult::new(result)
}

/// Run `source`, then feed its success value to `continuation`.
///
/// Failures of `source` propagate and `continuation` never runs.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let effect = then(pure::<_, String>(20), |x| pure(x + 22));
/// assert_eq!(effect.run().await, Ok(42));
/// # });
/// ```
pub fn then<Src, F, Next>(source: Src, continuation: F) -> Then<Src, F>
where
    Src: Effect,
    Next: Effect<Error = Src::Error>,
    F: FnOnce(Src::Output) -> Next + Send,
{
    source.then(continuation)
}

/// Run `source`, recovering from errors of exactly `kind` with `handler`.
pub fn catch<Src, H, Next>(
    source: Src,
    kind: <Src::Error as Kinded>::Kind,
    handler: H,
) -> Catch<Src, <Src::Error as Kinded>::Kind, H>
where
    Src: Effect,
    Src::Error: Kinded,
    H: FnOnce(Src::Error) -> Next + Send,
    Next: Effect<Output = Src::Output, Error = Src::Error>,
{
    source.catch(kind, handler)
}
