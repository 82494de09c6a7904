//! FromResult - lift an already computed `Result` into an effect.

use crate::effect::trait_def::Effect;

/// An effect that yields a precomputed result.
#[derive(Debug, Clone)]
pub struct FromResult<T, E> {
    result: Result<T, E>,
}

impl<T, E> FromResult<T, E> {
    /// Create a new FromResult effect.
    pub fn new(result: Result<T, E>) -> Self {
        FromResult { result }
    }
}

impl<T, E> Effect for FromResult<T, E>
where
    T: Send,
    E: Send,
{
    type Output = T;
    type Error = E;

    async fn run(self) -> Result<T, E> {
        self.result
    }
}
