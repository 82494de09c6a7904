//! Then combinator - chains a dependent effect.

use crate::effect::trait_def::Effect;

/// Then combinator - chains a dependent effect.
///
/// Zero-cost: no heap allocation. The `Then` struct stores only the
/// inner effect and the continuation producing the next effect.
///
/// The continuation receives the final success value of the inner
/// effect. If the inner effect fails, the continuation is never called
/// and the error propagates.
///
/// The chained effect must have the same error type. Use `map_err`
/// to convert error types before chaining:
///
/// ```rust,ignore
/// fetch_user(id)                         // Error = DbError
///     .map_err(AppError::from)           // Error = AppError
///     .then(|user| send_email(user))     // Error = AppError
/// ```
pub struct Then<Inner, F> {
    pub(crate) inner: Inner,
    pub(crate) f: F,
}

impl<Inner, F> std::fmt::Debug for Then<Inner, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Then")
            .field("inner", &"<effect>")
            .field("f", &"<function>")
            .finish()
    }
}

impl<Inner, F, E2> Effect for Then<Inner, F>
where
    Inner: Effect,
    E2: Effect<Error = Inner::Error>,
    F: FnOnce(Inner::Output) -> E2 + Send,
{
    type Output = E2::Output;
    type Error = Inner::Error;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        let value = self.inner.run().await?;
        (self.f)(value).run().await
    }
}
