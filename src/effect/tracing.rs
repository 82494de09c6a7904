//! Tracing support for effects.
//!
//! This module provides the `Instrument` combinator and `instrument` method
//! for wrapping effects in tracing spans.

use crate::effect::trait_def::Effect;

/// An effect wrapped in a tracing span.
///
/// Created by [`EffectTracingExt::instrument`].
#[derive(Debug)]
pub struct Instrument<E> {
    pub(crate) inner: E,
    pub(crate) span: tracing::Span,
}

impl<E> Effect for Instrument<E>
where
    E: Effect,
{
    type Output = E::Output;
    type Error = E::Error;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        use tracing::Instrument as _;
        self.inner.run().instrument(self.span).await
    }
}

/// Extension trait for adding tracing instrumentation to effects.
pub trait EffectTracingExt: Effect {
    /// Wrap this effect in a tracing span.
    ///
    /// The span is entered each time the effect is polled and exited when
    /// it yields, following the standard `tracing::Instrument` pattern.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tidepool::effect::prelude::*;
    /// use tracing::info_span;
    ///
    /// # tokio_test::block_on(async {
    /// let effect = pure::<_, String>(42).instrument(info_span!("load_profile", user_id = 7));
    /// assert_eq!(effect.run().await, Ok(42));
    /// # });
    /// ```
    fn instrument(self, span: tracing::Span) -> Instrument<Self> {
        Instrument { inner: self, span }
    }
}

impl<E: Effect> EffectTracingExt for E {}
