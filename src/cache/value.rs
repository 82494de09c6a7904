//! Optional cached values.

/// A cache read result: either a present value or nothing.
///
/// Presence and value are set together. There is no way to build a
/// "present" value without supplying it.
///
/// ```rust
/// use tidepool::cache::CachedValue;
///
/// let hit = CachedValue::present(3);
/// assert!(hit.is_present());
/// assert_eq!(hit.into_option(), Some(3));
///
/// let miss = CachedValue::<i32>::absent();
/// assert!(!miss.is_present());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CachedValue<T>(Option<T>);

impl<T> CachedValue<T> {
    /// A present value.
    pub fn present(value: T) -> Self {
        Self(Some(value))
    }

    /// No value.
    pub fn absent() -> Self {
        Self(None)
    }

    /// Returns true if a value is present.
    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the value, if present.
    pub fn as_ref(&self) -> Option<&T> {
        self.0.as_ref()
    }

    /// The value, if present.
    pub fn into_option(self) -> Option<T> {
        self.0
    }
}

impl<T> Default for CachedValue<T> {
    fn default() -> Self {
        Self::absent()
    }
}

impl<T> From<Option<T>> for CachedValue<T> {
    fn from(value: Option<T>) -> Self {
        Self(value)
    }
}

impl<T> From<CachedValue<T>> for Option<T> {
    fn from(value: CachedValue<T>) -> Self {
        value.0
    }
}
