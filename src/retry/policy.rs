//! Retry policy types.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;

/// The delay strategy between attempts.
#[derive(Clone)]
pub enum Backoff {
    /// Retry right away.
    Immediate,
    /// Fixed delay between attempts.
    Constant(Duration),
    /// Delay sampled uniformly from `[min, max)`.
    Random {
        /// Smallest delay (inclusive).
        min: Duration,
        /// Largest delay (exclusive).
        max: Duration,
    },
    /// Delay computed from the number of failed attempts so far.
    Custom(Arc<dyn Fn(u32) -> Duration + Send + Sync>),
}

impl Backoff {
    /// The delay to wait after `attempt` failed attempts (1-indexed).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use tidepool::retry::Backoff;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Backoff::Immediate.delay_for_attempt(1), Duration::ZERO);
    ///
    /// let constant = Backoff::Constant(Duration::from_millis(250));
    /// assert_eq!(constant.delay_for_attempt(1), Duration::from_millis(250));
    /// assert_eq!(constant.delay_for_attempt(7), Duration::from_millis(250));
    /// ```
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Immediate => Duration::ZERO,
            Backoff::Constant(delay) => *delay,
            Backoff::Random { min, max } => {
                if min >= max {
                    *min
                } else {
                    rand::rng().random_range(*min..*max)
                }
            }
            Backoff::Custom(f) => f(attempt),
        }
    }
}

impl std::fmt::Debug for Backoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Backoff::Immediate => f.write_str("Immediate"),
            Backoff::Constant(delay) => f.debug_tuple("Constant").field(delay).finish(),
            Backoff::Random { min, max } => f
                .debug_struct("Random")
                .field("min", min)
                .field("max", max)
                .finish(),
            Backoff::Custom(_) => f.debug_tuple("Custom").field(&"<function>").finish(),
        }
    }
}

impl PartialEq for Backoff {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Backoff::Immediate, Backoff::Immediate) => true,
            (Backoff::Constant(a), Backoff::Constant(b)) => a == b,
            (
                Backoff::Random { min: a, max: b },
                Backoff::Random { min: c, max: d },
            ) => a == c && b == d,
            (Backoff::Custom(a), Backoff::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Retry state for one execution: attempts made, the attempt budget and
/// the backoff between attempts.
///
/// A policy is a mutable context threaded through a single retry loop.
/// The executor takes it by value, so two executions never share a
/// counter; clone a fresh policy (or call [`RetryPolicy::fresh`]) to reuse
/// a configuration.
///
/// `max_attempts` bounds the total number of invocations, counting the
/// first one. An operation is always invoked at least once.
///
/// # Examples
///
/// ```rust
/// use tidepool::RetryPolicy;
///
/// let mut policy = RetryPolicy::immediate(2);
/// assert!(policy.should_retry());
///
/// policy.record_attempt();
/// assert!(policy.should_retry());
///
/// policy.record_attempt();
/// assert!(!policy.should_retry());
/// assert_eq!(policy.attempts(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    backoff: Backoff,
    max_attempts: u32,
    attempts: u32,
}

impl RetryPolicy {
    /// Retry without waiting between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::with_backoff(Backoff::Immediate, max_attempts)
    }

    /// Wait `delay` after each failed attempt.
    ///
    /// ```rust
    /// use tidepool::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// let policy = RetryPolicy::constant(Duration::from_millis(500), 3);
    /// assert_eq!(policy.next_delay(), Duration::from_millis(500));
    /// assert_eq!(policy.max_attempts(), 3);
    /// ```
    pub fn constant(delay: Duration, max_attempts: u32) -> Self {
        Self::with_backoff(Backoff::Constant(delay), max_attempts)
    }

    /// Wait a uniformly random delay in `[min, max)` after each failed attempt.
    ///
    /// When `min == max` the delay is always `min`.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub fn random(min: Duration, max: Duration, max_attempts: u32) -> Self {
        assert!(
            min <= max,
            "RetryPolicy::random requires min <= max (got {:?} > {:?})",
            min,
            max
        );
        Self::with_backoff(Backoff::Random { min, max }, max_attempts)
    }

    /// Compute the delay from the number of failed attempts so far.
    ///
    /// ```rust
    /// use tidepool::RetryPolicy;
    /// use std::time::Duration;
    ///
    /// // 100ms, 200ms, 400ms, ...
    /// let mut policy = RetryPolicy::custom(
    ///     |attempt| Duration::from_millis(100 * 2u64.pow(attempt - 1)),
    ///     5,
    /// );
    /// policy.record_attempt();
    /// policy.record_attempt();
    /// assert_eq!(policy.next_delay(), Duration::from_millis(200));
    /// ```
    pub fn custom<F>(backoff: F, max_attempts: u32) -> Self
    where
        F: Fn(u32) -> Duration + Send + Sync + 'static,
    {
        Self::with_backoff(Backoff::Custom(Arc::new(backoff)), max_attempts)
    }

    /// Build a policy from an explicit [`Backoff`].
    pub fn with_backoff(backoff: Backoff, max_attempts: u32) -> Self {
        Self {
            backoff,
            max_attempts,
            attempts: 0,
        }
    }

    /// True while the attempts made are below the attempt budget.
    pub fn should_retry(&self) -> bool {
        self.attempts < self.max_attempts
    }

    /// Count one more failed attempt.
    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }

    /// The delay the backoff prescribes after the attempts recorded so far.
    ///
    /// Random backoffs sample a new delay on every call.
    pub fn next_delay(&self) -> Duration {
        self.backoff.delay_for_attempt(self.attempts)
    }

    /// Suspend for the delay prescribed by [`next_delay`](Self::next_delay)
    /// and return it.
    ///
    /// A zero delay completes without suspending.
    pub async fn delay_before_next_attempt(&self) -> Duration {
        let delay = self.next_delay();
        pause(delay).await;
        delay
    }

    /// Number of attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// The attempt budget.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// The backoff strategy.
    pub fn backoff(&self) -> &Backoff {
        &self.backoff
    }

    /// A copy of this policy with the attempt counter reset.
    pub fn fresh(&self) -> Self {
        Self {
            backoff: self.backoff.clone(),
            max_attempts: self.max_attempts,
            attempts: 0,
        }
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
