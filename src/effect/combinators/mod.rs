//! Zero-cost combinator types for effect composition.
//!
//! This module contains concrete types returned by effect combinators.
//! They don't allocate on the heap and can be optimized by the compiler.
//!
//! Most users won't need to work with these types directly. Instead,
//! use the combinator methods on `EffectExt` which return these types.

mod catch;
mod fail;
mod from_async;
mod from_result;
mod map;
mod map_err;
mod pure;
mod then;


pub use catch::{Catch, CatchValue};
pub use fail::Fail;
pub use from_async::{FromAsync, FromFuture};
pub use from_result::FromResult;
pub use map::Map;
pub use map_err::MapErr;
pub use pure::Pure;
pub use then::Then;
