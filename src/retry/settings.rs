//! Retry configuration as plain data.
//!
//! [`RetrySettings`] is what callers put in their own configuration files.
//! With the `serde` feature it deserializes from any serde format; delays
//! are whole milliseconds.
//!
//! ```rust
//! use tidepool::retry::{BackoffSettings, RetrySettings};
//! use tidepool::RetryPolicy;
//! use std::time::Duration;
//!
//! let settings = RetrySettings {
//!     max_attempts: 4,
//!     backoff: BackoffSettings::Constant { delay_ms: 250 },
//! };
//! let policy = RetryPolicy::try_from(&settings).unwrap();
//! assert_eq!(policy, RetryPolicy::constant(Duration::from_millis(250), 4));
//! ```

use std::time::Duration;

use thiserror::Error;

use crate::retry::policy::RetryPolicy;

/// Serializable description of a [`RetryPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetrySettings {
    /// Total invocations allowed, counting the first.
    pub max_attempts: u32,
    /// Delay strategy between attempts. Defaults to immediate.
    #[cfg_attr(feature = "serde", serde(default))]
    pub backoff: BackoffSettings,
}

/// Serializable backoff strategy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "strategy", rename_all = "snake_case"))]
pub enum BackoffSettings {
    /// No delay.
    #[default]
    Immediate,
    /// Fixed delay in milliseconds.
    Constant {
        /// Delay between attempts.
        delay_ms: u64,
    },
    /// Uniform random delay in `[min_ms, max_ms)`.
    Random {
        /// Lower bound, inclusive.
        min_ms: u64,
        /// Upper bound, exclusive.
        max_ms: u64,
    },
}

/// Rejected [`RetrySettings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidRetrySettings {
    /// A random backoff whose lower bound exceeds its upper bound.
    #[error("random backoff min_ms ({min_ms}) exceeds max_ms ({max_ms})")]
    InvertedRandomRange {
        /// Configured lower bound.
        min_ms: u64,
        /// Configured upper bound.
        max_ms: u64,
    },
}

impl TryFrom<&RetrySettings> for RetryPolicy {
    type Error = InvalidRetrySettings;

    fn try_from(settings: &RetrySettings) -> Result<Self, Self::Error> {
        let max_attempts = settings.max_attempts;
        Ok(match settings.backoff {
            BackoffSettings::Immediate => RetryPolicy::immediate(max_attempts),
            BackoffSettings::Constant { delay_ms } => {
                RetryPolicy::constant(Duration::from_millis(delay_ms), max_attempts)
            }
            BackoffSettings::Random { min_ms, max_ms } => {
                if min_ms > max_ms {
                    return Err(InvalidRetrySettings::InvertedRandomRange { min_ms, max_ms });
                }
                RetryPolicy::random(
                    Duration::from_millis(min_ms),
                    Duration::from_millis(max_ms),
                    max_attempts,
                )
            }
        })
    }
}

impl TryFrom<RetrySettings> for RetryPolicy {
    type Error = InvalidRetrySettings;

    fn try_from(settings: RetrySettings) -> Result<Self, Self::Error> {
        RetryPolicy::try_from(&settings)
    }
}
