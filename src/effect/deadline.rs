//! Deadline-bounded effects with cooperative cancellation.
//!
//! [`with_deadline`] hands a [`CancellationToken`] to the effect it builds
//! and cancels that token once the deadline passes. Nothing is aborted: the
//! operation is expected to watch the token and unwind on its own, and the
//! deadline effect keeps waiting until it does.

use std::time::Duration;

use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::effect::trait_def::Effect;
use crate::kind::Kinded;

/// Error from an effect bounded by [`with_deadline`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeadlineError<E> {
    /// The deadline passed and the operation then unwound with an error.
    #[error("deadline of {duration:?} elapsed: {source}")]
    Elapsed {
        /// The deadline that was exceeded.
        duration: Duration,
        /// The error the operation returned after observing cancellation.
        #[source]
        source: E,
    },
    /// The operation failed before its deadline.
    #[error(transparent)]
    Inner(E),
}

impl<E> DeadlineError<E> {
    /// Returns true if the deadline passed before the operation finished.
    pub fn is_elapsed(&self) -> bool {
        matches!(self, Self::Elapsed { .. })
    }

    /// The operation's own error, whether or not the deadline passed.
    pub fn into_inner(self) -> E {
        match self {
            Self::Elapsed { source, .. } => source,
            Self::Inner(e) => e,
        }
    }
}

/// Kind tag for [`DeadlineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineKind<K> {
    /// Matches [`DeadlineError::Elapsed`] regardless of the inner kind.
    Elapsed,
    /// Matches [`DeadlineError::Inner`] with this inner kind.
    Inner(K),
}

impl<E: Kinded> Kinded for DeadlineError<E> {
    type Kind = DeadlineKind<E::Kind>;

    fn kind(&self) -> Self::Kind {
        match self {
            Self::Elapsed { .. } => DeadlineKind::Elapsed,
            Self::Inner(e) => DeadlineKind::Inner(e.kind()),
        }
    }
}

/// An effect built from a cancellation token and bounded by a deadline.
///
/// Created by [`with_deadline`].
pub struct Deadline<F> {
    duration: Duration,
    make_effect: F,
}

impl<F> std::fmt::Debug for Deadline<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deadline")
            .field("duration", &self.duration)
            .field("make_effect", &"<function>")
            .finish()
    }
}

impl<F, Eff> Effect for Deadline<F>
where
    F: FnOnce(CancellationToken) -> Eff + Send,
    Eff: Effect,
{
    type Output = Eff::Output;
    type Error = DeadlineError<Eff::Error>;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        let token = CancellationToken::new();
        let operation = (self.make_effect)(token.clone()).run();
        tokio::pin!(operation);

        tokio::select! {
            result = &mut operation => return result.map_err(DeadlineError::Inner),
            _ = tokio::time::sleep(self.duration) => {
                tracing::debug!(deadline = ?self.duration, "deadline elapsed, cancelling operation");
                token.cancel();
            }
        }

        let duration = self.duration;
        operation
            .await
            .map_err(|source| DeadlineError::Elapsed { duration, source })
    }
}

/// Bound an operation by a deadline.
///
/// The factory receives a token that is cancelled when `duration` elapses.
/// A value produced after the deadline is still returned; an error produced
/// after the deadline is reported as [`DeadlineError::Elapsed`].
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let effect = with_deadline(Duration::from_millis(10), |token| {
///     from_async(move || async move {
///         token.cancelled().await;
///         Err::<(), _>("gave up")
///     })
/// });
///
/// let err = effect.run().await.unwrap_err();
/// assert!(err.is_elapsed());
/// assert_eq!(err.into_inner(), "gave up");
/// # });
/// ```
pub fn with_deadline<F, Eff>(duration: Duration, make_effect: F) -> Deadline<F>
where
    F: FnOnce(CancellationToken) -> Eff + Send,
    Eff: Effect,
{
    Deadline {
        duration,
        make_effect,
    }
}
