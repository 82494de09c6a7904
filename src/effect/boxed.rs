//! BoxedEffect - type-erased effect for opt-in boxing.
//!
//! Use `BoxedEffect` when you need to:
//! - Store different effect types in a collection
//! - Return different effects from match arms
//! - Create recursive effect functions

use std::future::Future;

use futures::future::BoxFuture;

use crate::effect::trait_def::Effect;

/// A type-erased effect.
///
/// Boxing allocates once for the pending future. The wrapped effect
/// still does nothing until the boxed effect runs.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// fn lookup(cached: bool) -> BoxedEffect<&'static str, String> {
///     if cached {
///         pure("from cache").boxed()
///     } else {
///         from_async(|| async { Ok("from origin") }).boxed()
///     }
/// }
///
/// # tokio_test::block_on(async {
/// assert_eq!(lookup(true).run().await, Ok("from cache"));
/// assert_eq!(lookup(false).run().await, Ok("from origin"));
/// # });
/// ```
pub struct BoxedEffect<T, E> {
    future: BoxFuture<'static, Result<T, E>>,
}

impl<T, E> std::fmt::Debug for BoxedEffect<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoxedEffect")
            .field("future", &"<future>")
            .finish()
    }
}

impl<T, E> BoxedEffect<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Box an effect.
    pub fn new<Eff>(effect: Eff) -> Self
    where
        Eff: Effect<Output = T, Error = E> + 'static,
    {
        BoxedEffect {
            future: Box::pin(effect.run()),
        }
    }
}

impl<T, E> Effect for BoxedEffect<T, E>
where
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    fn run(self) -> impl Future<Output = Result<T, E>> + Send {
        self.future
    }
}
