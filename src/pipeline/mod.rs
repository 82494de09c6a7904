//! Action → reducer → effect pipelines over a state store.
//!
//! A pipeline binds one action to one [`Store`] and moves through fixed
//! stages:
//!
//! 1. [`bind`]`(action, store)`
//! 2. [`reduce`](Bound::reduce): read the old state, compute the new state
//!    with a pure reducer and save it with `save_state(new, old)`
//! 3. [`effect`](Reduced::effect): run a side effect with the old state, the
//!    new state and the action
//! 4. [`catch`](Effected::catch): compensate when the side effect fails with
//!    a declared kind, usually via [`Reduction::rollback`]
//!
//! The old state is read once, and that single snapshot reaches the reducer,
//! the effect and the handler. Every stage is an [`Effect`](crate::Effect),
//! so nothing happens until `run` is awaited.
//!
//! # Example
//!
//! ```rust
//! use std::convert::Infallible;
//! use tidepool::effect::prelude::*;
//! use tidepool::pipeline::bind;
//! use tidepool::testing::MemoryStore;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum Kind {
//!     Database,
//! }
//!
//! #[derive(Debug)]
//! struct AppError(Kind);
//!
//! impl Kinded for AppError {
//!     type Kind = Kind;
//!     fn kind(&self) -> Kind {
//!         self.0
//!     }
//! }
//!
//! impl From<Infallible> for AppError {
//!     fn from(e: Infallible) -> Self {
//!         match e {}
//!     }
//! }
//!
//! # tokio_test::block_on(async {
//! let store = &MemoryStore::new(10u32);
//!
//! let status = bind(4u32, store)
//!     .reduce(|balance, price| balance - price)
//!     .effect(|_old, _new, _price| fail::<u16, _>(AppError(Kind::Database)))
//!     .catch(Kind::Database, |_err, reduction| {
//!         from_async(move || async move {
//!             reduction.rollback(store).await?;
//!             Ok(500)
//!         })
//!     })
//!     .run()
//!     .await
//!     .unwrap();
//!
//! assert_eq!(status, 500);
//! assert_eq!(store.saves(), vec![(6, 10), (10, 6)]);
//! # });
//! ```

mod retrying;
mod stages;
mod store;

pub use retrying::Retrying;
pub use stages::{bind, Bound, Compensated, Effected, Reduced, Reduction};
pub use store::{Store, StoreExt};

#[cfg(test)]
mod tests;
