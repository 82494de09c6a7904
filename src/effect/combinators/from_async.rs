//! FromAsync and FromFuture - effects backed by futures.

use std::future::Future;

use crate::effect::trait_def::Effect;

/// Effect from an async closure.
///
/// The closure is only called when the effect runs, so building a
/// `FromAsync` has no side effects.
pub struct FromAsync<F> {
    pub(crate) f: F,
}

impl<F> std::fmt::Debug for FromAsync<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromAsync")
            .field("f", &"<function>")
            .finish()
    }
}

impl<F> FromAsync<F> {
    /// Create a new FromAsync effect.
    pub fn new(f: F) -> Self {
        FromAsync { f }
    }
}

impl<F, Fut, T, E> Effect for FromAsync<F>
where
    F: FnOnce() -> Fut + Send,
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    fn run(self) -> impl Future<Output = Result<T, E>> + Send {
        (self.f)()
    }
}

/// Effect wrapping a future that has already been created.
///
/// Rust futures are inert until polled, so this is still lazy: the work
/// starts when the effect runs.
pub struct FromFuture<Fut> {
    pub(crate) future: Fut,
}

impl<Fut> std::fmt::Debug for FromFuture<Fut> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FromFuture")
            .field("future", &"<future>")
            .finish()
    }
}

impl<Fut> FromFuture<Fut> {
    /// Create a new FromFuture effect.
    pub fn new(future: Fut) -> Self {
        FromFuture { future }
    }
}

impl<Fut, T, E> Effect for FromFuture<Fut>
where
    Fut: Future<Output = Result<T, E>> + Send,
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    fn run(self) -> impl Future<Output = Result<T, E>> + Send {
        self.future
    }
}
