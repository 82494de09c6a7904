//! Fail effect - an effect that always fails with the given error.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;

/// Fail effect - fails with the wrapped error.
#[derive(Debug, Clone)]
pub struct Fail<T, E> {
    error: E,
    _phantom: PhantomData<fn() -> T>,
}

impl<T, E> Fail<T, E> {
    /// Create a new Fail effect.
    pub fn new(error: E) -> Self {
        Fail {
            error,
            _phantom: PhantomData,
        }
    }
}

impl<T, E> Effect for Fail<T, E>
where
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    async fn run(self) -> Result<T, E> {
        Err(self.error)
    }
}
