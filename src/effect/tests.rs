//! Tests for the Effect trait and its continuation combinators.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::effect::prelude::*;

// Basic constructor tests
#[tokio::test]
async fn test_pure_returns_value() {
    let effect = pure::<_, String>(42);
    assert_eq!(effect.run().await, Ok(42));
}

#[tokio::test]
async fn test_fail_returns_error() {
    let effect = fail::<i32, _>("error".to_string());
    assert_eq!(effect.run().await, Err("error".to_string()));
}

// Map tests
#[tokio::test]
async fn test_map_transforms_value() {
    let effect = pure::<_, String>(21).map(|x| x * 2);
    assert_eq!(effect.run().await, Ok(42));
}

#[tokio::test]
async fn test_map_on_failure_doesnt_execute() {
    let effect = fail::<i32, _>("error".to_string()).map(|x| x * 2);
    assert_eq!(effect.run().await, Err("error".to_string()));
}

// MapErr tests
#[tokio::test]
async fn test_map_err_transforms_error() {
    let effect = fail::<i32, _>("error").map_err(|e: &str| format!("wrapped: {}", e));
    assert_eq!(effect.run().await, Err("wrapped: error".to_string()));
}

#[tokio::test]
async fn test_map_err_preserves_success() {
    let effect = pure::<_, &str>(42).map_err(|e| format!("wrapped: {}", e));
    assert_eq!(effect.run().await, Ok(42));
}

// Then tests
#[tokio::test]
async fn test_then_chains_effects() {
    let effect = pure::<_, String>(21).then(|x| pure(x * 2));
    assert_eq!(effect.run().await, Ok(42));
}

#[tokio::test]
async fn test_then_propagates_error() {
    let effect = fail::<i32, _>("error".to_string()).then(|x| pure(x * 2));
    assert_eq!(effect.run().await, Err("error".to_string()));
}

#[tokio::test]
async fn test_then_chain_failure() {
    let effect = pure::<_, String>(21).then(|_| fail::<i32, _>("error".to_string()));
    assert_eq!(effect.run().await, Err("error".to_string()));
}

#[tokio::test]
async fn test_then_unit_source() {
    // A source without a meaningful value still sequences its continuation.
    let effect = pure::<(), String>(()).then(|()| pure("after"));
    assert_eq!(effect.run().await, Ok("after"));
}

#[tokio::test]
async fn test_then_continuation_sees_final_value_only() {
    let seen = Arc::new(AtomicU32::new(0));
    let effect = from_async(|| async {
        tokio::task::yield_now().await;
        Ok::<_, String>(7)
    })
    .then({
        let seen = seen.clone();
        move |x| {
            seen.store(x, Ordering::SeqCst);
            pure(x + 1)
        }
    });

    assert_eq!(effect.run().await, Ok(8));
    assert_eq!(seen.load(Ordering::SeqCst), 7);
}

// Laziness
#[tokio::test]
async fn test_effects_do_nothing_until_run() {
    let calls = Arc::new(AtomicU32::new(0));
    let effect = from_async({
        let calls = calls.clone();
        move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, String>(())
        }
    });

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    effect.run().await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

// Composition
#[tokio::test]
async fn test_complex_chain() {
    let effect = pure::<_, String>(1)
        .map(|x| x + 1)
        .then(|x| pure(x * 2))
        .map(|x| x + 10)
        .then(|x| from_fn(move || Ok(x.to_string())));

    assert_eq!(effect.run().await, Ok("14".to_string()));
}
