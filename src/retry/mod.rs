//! Retrying effects on a declared error kind.
//!
//! A [`RetryPolicy`] is the explicit state of one retry execution: how many
//! attempts have failed, how many are allowed and how long to wait between
//! them. [`retry`] (or [`RetryFactoryExt::retry_on`](crate::RetryFactoryExt::retry_on))
//! drives a factory of effects with it:
//!
//! ```rust
//! use std::io;
//! use std::time::Duration;
//! use tidepool::effect::prelude::*;
//! use tidepool::RetryPolicy;
//!
//! # tokio_test::block_on(async {
//! let effect = (|| fail::<(), _>(io::Error::from(io::ErrorKind::TimedOut)))
//!     .retry_on(io::ErrorKind::TimedOut, RetryPolicy::constant(Duration::from_millis(1), 3));
//!
//! let err = effect.run().await.unwrap_err();
//! assert_eq!(err.kind(), io::ErrorKind::TimedOut);
//! # });
//! ```
//!
//! # Strategies
//!
//! - **Immediate**: no delay between attempts
//! - **Constant**: fixed delay
//! - **Random**: uniform delay in `[min, max)`
//! - **Custom**: delay computed from the attempt number
//!
//! Only errors whose [`Kinded::kind`](crate::Kinded::kind) equals the declared
//! kind are retried. Anything else propagates after a single attempt.

mod executor;
mod policy;
mod settings;

pub use executor::{retry, Retry, RetryEvent};
pub use policy::{Backoff, RetryPolicy};
pub use settings::{BackoffSettings, InvalidRetrySettings, RetrySettings};

#[cfg(test)]
mod tests;
