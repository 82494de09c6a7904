//! Effect trait definition - the core abstraction for lazy async steps.
//!
//! An `Effect` describes an asynchronous computation that:
//! - Produces a value of type `Output` on success
//! - May fail with an error of type `Error`
//! - Does nothing until [`Effect::run`] is awaited
//!
//! # Design Philosophy
//!
//! This trait follows the same pattern as `Future` and `Iterator`:
//! - Combinators return concrete types, no boxing per step
//! - Use `.boxed()` when you need type erasure
//!
//! Effects are consumed by `run`. A retry therefore asks a factory for a
//! fresh effect per attempt instead of cloning one.

use std::future::Future;

/// The core Effect trait - a lazy, single-valued, fallible async step.
///
/// # Example
///
/// ```rust
/// use tidepool::effect::prelude::*;
///
/// # tokio_test::block_on(async {
/// let effect = pure::<_, String>(21).map(|x| x * 2);
/// assert_eq!(effect.run().await, Ok(42));
/// # });
/// ```
pub trait Effect: Sized + Send {
    /// The success type produced by this effect.
    type Output: Send;

    /// The error type that may be produced.
    type Error: Send;

    /// Execute this effect.
    ///
    /// The returned future resolves to `Ok(output)` on success or
    /// `Err(error)` on failure.
    fn run(self) -> impl Future<Output = Result<Self::Output, Self::Error>> + Send;
}
