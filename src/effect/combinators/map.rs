//! Map combinator - synchronous continuation on the success value.

use crate::effect::trait_def::Effect;

/// Map combinator - transforms the success value.
///
/// This is the synchronous form of a continuation: the function runs
/// after the inner effect succeeds and its return value becomes the
/// output. Failures skip the function.
pub struct Map<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Map<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Map")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, U> Effect for Map<Inner, F>
where
    Inner: Effect,
    F: FnOnce(Inner::Output) -> U + Send,
    U: Send,
{
    type Output = U;
    type Error = Inner::Error;

    async fn run(self) -> Result<U, Self::Error> {
        self.inner.run().await.map(self.f)
    }
}
