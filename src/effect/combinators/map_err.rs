//! MapErr combinator - transforms the error value of an effect.

use crate::effect::trait_def::Effect;

/// MapErr combinator - transforms the error value.
///
/// Useful for converting error types so effects with different errors
/// can be chained with `then`.
pub struct MapErr<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for MapErr<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapErr")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, E2> Effect for MapErr<Inner, F>
where
    Inner: Effect,
    F: FnOnce(Inner::Error) -> E2 + Send,
    E2: Send,
{
    type Output = Inner::Output;
    type Error = E2;

    async fn run(self) -> Result<Self::Output, E2> {
        self.inner.run().await.map_err(self.f)
    }
}
