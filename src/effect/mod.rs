//! Lazy, composable async steps.
//!
//! An [`Effect`] is a description of an asynchronous computation producing
//! one value or one error. Building an effect does nothing; awaiting
//! [`Effect::run`] executes it. Combinators on [`EffectExt`] chain effects
//! without re-deriving control flow at each call site:
//!
//! | Combinator | Runs when | Purpose |
//! |------------|-----------|---------|
//! | `map` | source succeeds | synchronous continuation |
//! | `then` | source succeeds | asynchronous continuation |
//! | `catch` | source fails with the declared kind | recovery via another effect |
//! | `catch_value` | source fails with the declared kind | recovery via a substitute value |
//! | `map_err` | source fails | error conversion |
//!
//! # Zero-Cost by Default
//!
//! ```rust
//! use tidepool::effect::prelude::*;
//!
//! # tokio_test::block_on(async {
//! // Type: Map<Then<Map<Pure<i32, String>, _>, _>, _>, no heap allocation
//! let effect = pure::<_, String>(42)
//!     .map(|x| x + 1)
//!     .then(|x| pure(x * 2))
//!     .map(|x| x.to_string());
//!
//! assert_eq!(effect.run().await, Ok("86".to_string()));
//! # });
//! ```
//!
//! Use `.boxed()` when different branches need the same type.

pub mod boxed;
pub mod combinators;
pub mod constructors;
pub mod deadline;
pub mod ext;
pub mod prelude;
pub mod tracing;
mod trait_def;

// Re-export core trait
pub use trait_def::Effect;

// Re-export extension traits
pub use ext::{EffectExt, RetryFactoryExt};

// Re-export boxed types
pub use boxed::BoxedEffect;

// Re-export all combinator types
pub use combinators::{
    Catch, CatchValue, Fail, FromAsync, FromFuture, FromResult, Map, MapErr, Pure, Then,
};

// Re-export constructors
pub use constructors::{catch, fail, from_async, from_fn, from_future, from_result, pure, then};

// Re-export deadline support
pub use deadline::{with_deadline, Deadline, DeadlineError, DeadlineKind};

// Re-export tracing support
pub use self::tracing::{EffectTracingExt, Instrument};

#[cfg(test)]
mod tests;
