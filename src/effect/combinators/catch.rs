//! Catch combinators for kind-filtered error recovery.

use crate::effect::trait_def::Effect;
use crate::kind::Kinded;

/// Recovers from errors of one declared kind.
///
/// Zero-cost: the struct stores only the inner effect, the kind and the
/// handler.
///
/// - Success passes through and the handler is never called.
/// - An error whose [`Kinded::kind`] equals the declared kind is handed to
///   the handler, whose effect becomes the result.
/// - Any other error propagates unchanged.
///
/// # Examples
///
/// ```rust,ignore
/// use tidepool::effect::prelude::*;
///
/// let effect = fetch_from_cache(id)
///     .catch(ErrorKind::CacheMiss, |_| fetch_from_db(id));
/// ```
pub struct Catch<Inner, K, H> {
    pub(crate) inner: Inner,
    pub(crate) kind: K,
    pub(crate) handler: H,
}

impl<Inner, K: std::fmt::Debug, H> std::fmt::Debug for Catch<Inner, K, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catch")
            .field("inner", &"<effect>")
            .field("kind", &self.kind)
            .field("handler", &"<handler>")
            .finish()
    }
}

impl<Inner, K, H, E2> Effect for Catch<Inner, K, H>
where
    Inner: Effect,
    Inner::Error: Kinded<Kind = K>,
    K: Send,
    H: FnOnce(Inner::Error) -> E2 + Send,
    E2: Effect<Output = Inner::Output, Error = Inner::Error>,
{
    type Output = Inner::Output;
    type Error = Inner::Error;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        match self.inner.run().await {
            Ok(value) => Ok(value),
            Err(error) if error.is_kind(&self.kind) => (self.handler)(error).run().await,
            Err(error) => Err(error),
        }
    }
}

/// Recovers from errors of one declared kind with a substitute value.
///
/// The synchronous counterpart of [`Catch`]: the handler maps the error
/// straight to a success value.
pub struct CatchValue<Inner, K, H> {
    pub(crate) inner: Inner,
    pub(crate) kind: K,
    pub(crate) handler: H,
}

impl<Inner, K: std::fmt::Debug, H> std::fmt::Debug for CatchValue<Inner, K, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatchValue")
            .field("inner", &"<effect>")
            .field("kind", &self.kind)
            .field("handler", &"<handler>")
            .finish()
    }
}

impl<Inner, K, H> Effect for CatchValue<Inner, K, H>
where
    Inner: Effect,
    Inner::Error: Kinded<Kind = K>,
    K: Send,
    H: FnOnce(Inner::Error) -> Inner::Output + Send,
{
    type Output = Inner::Output;
    type Error = Inner::Error;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        match self.inner.run().await {
            Ok(value) => Ok(value),
            Err(error) if error.is_kind(&self.kind) => Ok((self.handler)(error)),
            Err(error) => Err(error),
        }
    }
}
