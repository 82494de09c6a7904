//! The retry loop.

use tokio_util::sync::CancellationToken;

use crate::effect::Effect;
use crate::kind::Kinded;
use crate::retry::policy::RetryPolicy;

/// Information about a failed attempt, passed to [`Retry::on_retry`] hooks.
#[derive(Debug, Clone)]
pub struct RetryEvent<'a, E> {
    /// Which attempt just failed (1-indexed).
    pub attempt: u32,
    /// The attempt budget of the policy.
    pub max_attempts: u32,
    /// The error from the failed attempt.
    pub error: &'a E,
    /// Whether the policy allows another attempt after the backoff delay.
    /// `false` on the exhausting attempt, which still waits out its delay.
    pub will_retry: bool,
}

type RetryHook<E> = Box<dyn Fn(&RetryEvent<'_, E>) + Send + Sync>;
type StopPredicate<E> = Box<dyn Fn(&RetryEvent<'_, E>) -> bool + Send + Sync>;

/// Drives an effect factory until success, a non-matching error or
/// policy exhaustion.
///
/// Created by [`retry`] or [`RetryFactoryExt::retry_on`](crate::RetryFactoryExt::retry_on).
///
/// - Success is returned immediately.
/// - An error whose kind differs from the declared kind is returned
///   immediately and does not consume an attempt.
/// - An error of the declared kind is recorded on the policy, then the loop
///   waits for the policy's backoff delay. If the policy still allows a
///   retry it asks the factory for a fresh effect, otherwise that error is
///   returned. The exhausting attempt is followed by a delay too, so `N`
///   failures wait `N` times.
///
/// Attempts never overlap: each one finishes before the next starts.
pub struct Retry<F, E: Kinded> {
    make_effect: F,
    policy: RetryPolicy,
    kind: E::Kind,
    on_retry: Option<RetryHook<E>>,
    stop_when: Option<StopPredicate<E>>,
    cancel: Option<CancellationToken>,
}

impl<F, E: Kinded> std::fmt::Debug for Retry<F, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retry")
            .field("make_effect", &"<function>")
            .field("policy", &self.policy)
            .field("kind", &self.kind)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "<hook>"))
            .field("stop_when", &self.stop_when.as_ref().map(|_| "<predicate>"))
            .field("cancel", &self.cancel)
            .finish()
    }
}

impl<F, E: Kinded> Retry<F, E> {
    /// Create a retry loop over `make_effect`, retrying errors of `kind`.
    pub fn new(make_effect: F, policy: RetryPolicy, kind: E::Kind) -> Self {
        Self {
            make_effect,
            policy,
            kind,
            on_retry: None,
            stop_when: None,
            cancel: None,
        }
    }

    /// Call `hook` after every failed attempt of the declared kind.
    ///
    /// The hook is synchronous and should not block; use it for logging
    /// and metrics.
    pub fn on_retry<H>(mut self, hook: H) -> Self
    where
        H: Fn(&RetryEvent<'_, E>) + Send + Sync + 'static,
    {
        self.on_retry = Some(Box::new(hook));
        self
    }

    /// End the loop early when `predicate` returns true for a failed attempt.
    ///
    /// The predicate runs after [`on_retry`](Self::on_retry) hooks and before
    /// the backoff delay. Returning true hands that attempt's error back to
    /// the caller without waiting.
    ///
    /// ```rust
    /// use std::io;
    /// use std::sync::atomic::{AtomicU32, Ordering};
    /// use tidepool::effect::prelude::*;
    /// use tidepool::{retry, RetryPolicy};
    ///
    /// # tokio_test::block_on(async {
    /// let calls = AtomicU32::new(0);
    /// let effect = retry(
    ///     || {
    ///         calls.fetch_add(1, Ordering::SeqCst);
    ///         fail::<(), _>(io::Error::from(io::ErrorKind::Interrupted))
    ///     },
    ///     RetryPolicy::immediate(10),
    ///     io::ErrorKind::Interrupted,
    /// )
    /// .stop_when(|event| event.attempt == 2);
    ///
    /// assert!(effect.run().await.is_err());
    /// assert_eq!(calls.load(Ordering::SeqCst), 2);
    /// # });
    /// ```
    pub fn stop_when<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&RetryEvent<'_, E>) -> bool + Send + Sync + 'static,
    {
        self.stop_when = Some(Box::new(predicate));
        self
    }

    /// Stop waiting when `token` is cancelled during a backoff delay.
    ///
    /// The loop then returns the error of the last attempt. An attempt that
    /// is already running is not interrupted.
    pub fn cancel_on(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl<F, Eff> Effect for Retry<F, Eff::Error>
where
    F: FnMut() -> Eff + Send,
    Eff: Effect,
    Eff::Error: Kinded,
{
    type Output = Eff::Output;
    type Error = Eff::Error;

    async fn run(self) -> Result<Self::Output, Self::Error> {
        let Retry {
            mut make_effect,
            mut policy,
            kind,
            on_retry,
            stop_when,
            cancel,
        } = self;

        loop {
            let error = match make_effect().run().await {
                Ok(value) => return Ok(value),
                Err(error) => error,
            };

            let error_kind = error.kind();
            if error_kind != kind {
                return Err(error);
            }

            policy.record_attempt();
            let attempt = policy.attempts();
            // The event borrows the error, so it must not live across an await.
            let stop = {
                let event = RetryEvent {
                    attempt,
                    max_attempts: policy.max_attempts(),
                    error: &error,
                    will_retry: policy.should_retry(),
                };
                if let Some(hook) = &on_retry {
                    hook(&event);
                }
                stop_when.as_ref().is_some_and(|stop| stop(&event))
            };
            if stop {
                tracing::debug!(attempt, kind = ?error_kind, "retry stopped by caller");
                return Err(error);
            }

            tracing::debug!(
                attempt,
                max_attempts = policy.max_attempts(),
                kind = ?error_kind,
                "attempt failed, backing off"
            );

            let delay = match &cancel {
                Some(token) => {
                    tokio::select! {
                        _ = token.cancelled() => {
                            tracing::debug!(attempt, "retry cancelled during backoff");
                            return Err(error);
                        }
                        delay = policy.delay_before_next_attempt() => delay,
                    }
                }
                None => policy.delay_before_next_attempt().await,
            };

            if !policy.should_retry() {
                tracing::warn!(
                    attempts = attempt,
                    kind = ?error_kind,
                    ?delay,
                    "retry policy exhausted"
                );
                return Err(error);
            }
        }
    }
}

/// Retry effects built by `make_effect` while they fail with `kind`.
///
/// # Example
///
/// ```rust
/// use std::io;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use tidepool::effect::prelude::*;
/// use tidepool::{retry, RetryPolicy};
///
/// # tokio_test::block_on(async {
/// let calls = AtomicU32::new(0);
/// let effect = retry(
///     || {
///         let n = calls.fetch_add(1, Ordering::SeqCst);
///         from_result(if n < 2 {
///             Err(io::Error::from(io::ErrorKind::ConnectionReset))
///         } else {
///             Ok("connected")
///         })
///     },
///     RetryPolicy::immediate(3),
///     io::ErrorKind::ConnectionReset,
/// );
///
/// assert_eq!(effect.run().await.unwrap(), "connected");
/// assert_eq!(calls.load(Ordering::SeqCst), 3);
/// # });
/// ```
pub fn retry<F, Eff>(
    make_effect: F,
    policy: RetryPolicy,
    kind: <Eff::Error as Kinded>::Kind,
) -> Retry<F, Eff::Error>
where
    F: FnMut() -> Eff + Send,
    Eff: Effect,
    Eff::Error: Kinded,
{
    Retry::new(make_effect, policy, kind)
}
