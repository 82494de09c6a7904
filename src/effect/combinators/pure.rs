//! Pure effect - wraps a value as an effect with no side effects.

use std::marker::PhantomData;

use crate::effect::trait_def::Effect;

/// Pure effect - succeeds with the wrapped value.
///
/// Zero-cost: stores only the value.
#[derive(Debug, Clone)]
pub struct Pure<T, E> {
    value: T,
    _phantom: PhantomData<fn() -> E>,
}

impl<T, E> Pure<T, E> {
    /// Create a new Pure effect.
    pub fn new(value: T) -> Self {
        Pure {
            value,
            _phantom: PhantomData,
        }
    }
}

impl<T, E> Effect for Pure<T, E>
where
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    async fn run(self) -> Result<T, E> {
        Ok(self.value)
    }
}
