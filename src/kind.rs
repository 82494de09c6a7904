//! Error kinds used by `catch` and retry filters.
//!
//! Recovery sites in tidepool never inspect an error's type. Instead every
//! error that flows through [`catch`](crate::effect::EffectExt::catch) or a
//! [`Retry`](crate::retry::Retry) exposes an explicit kind tag, and the
//! combinator compares that tag against the kind it was declared with.
//! Matching is exact: an error of any other kind propagates untouched.
//!
//! # Example
//!
//! ```rust
//! use tidepool::Kinded;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! enum DbErrorKind {
//!     Unavailable,
//!     Conflict,
//! }
//!
//! struct DbError {
//!     kind: DbErrorKind,
//!     message: String,
//! }
//!
//! impl Kinded for DbError {
//!     type Kind = DbErrorKind;
//!
//!     fn kind(&self) -> DbErrorKind {
//!         self.kind
//!     }
//! }
//!
//! let err = DbError { kind: DbErrorKind::Unavailable, message: "down".into() };
//! assert!(err.is_kind(&DbErrorKind::Unavailable));
//! assert!(!err.is_kind(&DbErrorKind::Conflict));
//! ```

use std::fmt::Debug;

/// An error that carries an explicit kind tag.
///
/// The kind is the only thing recovery combinators look at, so it should be
/// a small `Copy` enum. It must be `Debug` because kinds are what tidepool
/// writes into its log events.
pub trait Kinded {
    /// The tag type distinguishing error categories.
    type Kind: Copy + PartialEq + Debug + Send + Sync + 'static;

    /// The kind of this error.
    fn kind(&self) -> Self::Kind;

    /// Returns true if this error is of exactly `kind`.
    fn is_kind(&self, kind: &Self::Kind) -> bool {
        self.kind() == *kind
    }
}

impl Kinded for std::io::Error {
    type Kind = std::io::ErrorKind;

    fn kind(&self) -> std::io::ErrorKind {
        std::io::Error::kind(self)
    }
}

impl<K: Kinded + ?Sized> Kinded for Box<K> {
    type Kind = K::Kind;

    fn kind(&self) -> K::Kind {
        (**self).kind()
    }
}
