//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and functions
//! from the effect module, allowing users to quickly get started
//! with a single `use` statement.
//!
//! ```rust
//! use tidepool::effect::prelude::*;
//!
//! # tokio_test::block_on(async {
//! let effect = pure::<_, String>(42)
//!     .map(|x| x * 2)
//!     .then(|x| pure(x + 1));
//!
//! assert_eq!(effect.run().await, Ok(85));
//! # });
//! ```

// Traits
pub use crate::effect::ext::{EffectExt, RetryFactoryExt};
pub use crate::effect::trait_def::Effect;
pub use crate::effect::tracing::EffectTracingExt;
pub use crate::kind::Kinded;

// Boxed Effect
pub use crate::effect::boxed::BoxedEffect;

// Combinator Types (for advanced use, usually `impl Effect` suffices)
pub use crate::effect::combinators::{
    Catch, CatchValue, Fail, FromAsync, FromFuture, FromResult, Map, MapErr, Pure, Then,
};

// Constructors
pub use crate::effect::constructors::{
    catch, fail, from_async, from_fn, from_future, from_result, pure, then,
};

// Deadlines
pub use crate::effect::deadline::{with_deadline, DeadlineError, DeadlineKind};
