//! # Tidepool
//!
//! Async composition primitives for services that talk to flaky backends.
//!
//! ## What's inside
//!
//! - [`effect`]: lazy async steps chained with `then`, `map` and
//!   kind-filtered `catch`
//! - [`retry`]: retry loops driven by an explicit [`RetryPolicy`] value
//! - [`cache`]: cache-aside reads with a double-checked lock
//! - [`pipeline`]: action → reducer → effect pipelines over a state store,
//!   with compensation on failure
//!
//! Recovery never looks at an error's type. Errors implement [`Kinded`]
//! and every `catch` or retry site declares the one kind it handles.
//!
//! ## Quick Example
//!
//! ```rust
//! use std::io;
//! use tidepool::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let greeting = (|| from_result(Err::<&str, _>(io::Error::from(io::ErrorKind::TimedOut))))
//!     .retry_on(io::ErrorKind::TimedOut, RetryPolicy::immediate(3))
//!     .catch(io::ErrorKind::TimedOut, |_| pure("hello from the fallback"))
//!     .map(|s| s.to_uppercase());
//!
//! assert_eq!(greeting.run().await.unwrap(), "HELLO FROM THE FALLBACK");
//! # });
//! ```
//!
//! ## Logging
//!
//! Tidepool emits [`tracing`] events (retries, cache misses, pipeline
//! stages) and never installs a subscriber. Events carry error kinds, not
//! error values.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cache;
pub mod effect;
pub mod kind;
pub mod pipeline;
pub mod retry;
pub mod testing;

// Re-exports
pub use cache::{get_or_add, CacheItem, CacheItemExt, CacheLock, CachedValue};
pub use effect::{BoxedEffect, Effect, EffectExt, RetryFactoryExt};
pub use kind::Kinded;
pub use pipeline::{bind, Store, StoreExt};
pub use retry::{retry, Retry, RetryPolicy};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::{get_or_add, CacheItem, CacheItemExt, CacheLock, CachedValue};
    pub use crate::effect::prelude::*;
    pub use crate::pipeline::{bind, Reduction, Store, StoreExt};
    pub use crate::retry::{retry, RetryPolicy};
}
