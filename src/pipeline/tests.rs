//! Tests for the pipeline stages and the retrying store.

use super::*;
use crate::effect::prelude::*;
use crate::retry::RetryPolicy;
use crate::testing::MemoryStore;
use std::convert::Infallible;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Database,
    Network,
    Store,
    Validation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
struct AppError {
    kind: Kind,
    message: String,
}

impl AppError {
    fn new(kind: Kind, message: &str) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}

impl Kinded for AppError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

impl From<Infallible> for AppError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

fn string_store(initial: &str) -> MemoryStore<String> {
    MemoryStore::new(initial.to_string())
}

#[tokio::test]
async fn test_reduce_saves_new_then_old() {
    let store = string_store("I have $10 in my pocket");

    let reduction = bind("Buy an ice cream", &store)
        .reduce(|_, _| "Now I have $5".to_string())
        .run()
        .await
        .unwrap();

    assert_eq!(reduction.old_state, "I have $10 in my pocket");
    assert_eq!(reduction.new_state, "Now I have $5");
    assert_eq!(reduction.action, "Buy an ice cream");
    assert_eq!(
        store.saves(),
        vec![(
            "Now I have $5".to_string(),
            "I have $10 in my pocket".to_string()
        )]
    );
    assert_eq!(store.get_count(), 1);
}

#[tokio::test]
async fn test_reducer_sees_old_state_and_action() {
    let store = MemoryStore::new(vec![1, 2]);

    bind(3, &store)
        .reduce(|state, action| {
            let mut next = state.clone();
            next.push(*action);
            next
        })
        .run()
        .await
        .unwrap();

    assert_eq!(store.state(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_effect_receives_old_new_action_after_save() {
    let store = Arc::new(string_store("before"));
    let seen = Arc::new(Mutex::new(None));

    let output = bind("act", store.clone())
        .reduce(|_, _| "after".to_string())
        .effect({
            let store = store.clone();
            let seen = seen.clone();
            move |old, new, action| {
                // The write has landed before the effect runs.
                let saved = store.saves().len();
                *seen.lock().unwrap() = Some((old, new, action, saved));
                pure::<_, Infallible>("ok")
            }
        })
        .run()
        .await;

    assert_eq!(output, Ok("ok"));
    assert_eq!(
        seen.lock().unwrap().clone(),
        Some(("before".to_string(), "after".to_string(), "act", 1))
    );
}

#[tokio::test]
async fn test_try_reduce_error_skips_save_and_effect() {
    let store = string_store("valid");
    let effect_calls = AtomicU32::new(0);

    let result = bind("bad", &store)
        .try_reduce(|_, _| Err(AppError::new(Kind::Validation, "rejected")))
        .effect(|_, _, _| {
            effect_calls.fetch_add(1, Ordering::SeqCst);
            pure::<(), AppError>(())
        })
        .run()
        .await;

    assert_eq!(result.unwrap_err().kind, Kind::Validation);
    assert!(store.saves().is_empty());
    assert_eq!(effect_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catch_rolls_back_and_substitutes() {
    let store = &string_store("I have $10 in my pocket");

    let result = bind("Buy an ice cream", store)
        .reduce(|_, _| "Now I have $5".to_string())
        .effect(|_, _, _| {
            fail::<u16, _>(AppError::new(Kind::Database, "Failed to persist into database"))
        })
        .catch(Kind::Database, |err, reduction| {
            assert_eq!(err.message, "Failed to persist into database");
            from_async(move || async move {
                reduction.rollback(store).await?;
                Ok(500)
            })
        })
        .run()
        .await;

    assert_eq!(result, Ok(500));
    assert_eq!(
        store.saves(),
        vec![
            (
                "Now I have $5".to_string(),
                "I have $10 in my pocket".to_string()
            ),
            (
                "I have $10 in my pocket".to_string(),
                "Now I have $5".to_string()
            ),
        ]
    );
    assert_eq!(store.state(), "I have $10 in my pocket");
}

#[tokio::test]
async fn test_catch_not_called_on_success() {
    let store = string_store("a");
    let handler_calls = AtomicU32::new(0);

    let result = bind((), &store)
        .reduce(|_, _| "b".to_string())
        .effect(|_, new, _| pure::<_, AppError>(new))
        .catch(Kind::Database, |err, _| {
            handler_calls.fetch_add(1, Ordering::SeqCst);
            fail(err)
        })
        .run()
        .await;

    assert_eq!(result, Ok("b".to_string()));
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_catch_passes_other_kinds_through() {
    let store = string_store("a");

    let result = bind((), &store)
        .reduce(|_, _| "b".to_string())
        .effect(|_, _, _| fail::<(), _>(AppError::new(Kind::Network, "timeout")))
        .catch(Kind::Database, |_, _| pure(()))
        .run()
        .await;

    assert_eq!(result.unwrap_err().kind, Kind::Network);
    assert_eq!(store.saves().len(), 1);
}

#[tokio::test]
async fn test_catch_handler_can_reraise() {
    let store = string_store("a");

    let result = bind((), &store)
        .reduce(|_, _| "b".to_string())
        .effect(|_, _, _| fail::<(), _>(AppError::new(Kind::Database, "down")))
        .catch(Kind::Database, |err, _| {
            fail(AppError::new(Kind::Database, &format!("gave up: {}", err)))
        })
        .run()
        .await;

    assert_eq!(result.unwrap_err().message, "gave up: down");
}

#[tokio::test]
async fn test_store_failure_bypasses_catch() {
    let store = MemoryStore::<String, AppError>::fallible("a".to_string());
    store.push_save_failure(AppError::new(Kind::Database, "write failed"));
    let handler_calls = AtomicU32::new(0);

    let result = bind((), &store)
        .reduce(|_, _| "b".to_string())
        .effect(|_, _, _| pure::<(), AppError>(()))
        .catch(Kind::Database, |_, _| {
            handler_calls.fetch_add(1, Ordering::SeqCst);
            pure(())
        })
        .run()
        .await;

    assert_eq!(result.unwrap_err().message, "write failed");
    assert_eq!(handler_calls.load(Ordering::SeqCst), 0);
    assert_eq!(store.state(), "a");
}

#[tokio::test]
async fn test_pipeline_is_lazy() {
    let store = string_store("a");

    let pipeline = bind((), &store).reduce(|_, _| "b".to_string());
    assert_eq!(store.get_count(), 0);

    pipeline.run().await.unwrap();
    assert_eq!(store.get_count(), 1);
}

#[tokio::test]
async fn test_with_retry_recovers_transient_store_errors() {
    let store = MemoryStore::<String, AppError>::fallible("a".to_string());
    store.push_get_failure(AppError::new(Kind::Store, "busy"));
    store.push_save_failure(AppError::new(Kind::Store, "busy"));
    store.push_save_failure(AppError::new(Kind::Store, "busy"));

    let retrying = (&store).with_retry(RetryPolicy::immediate(3), Kind::Store);

    let reduction = bind((), &retrying)
        .reduce(|_, _| "b".to_string())
        .run()
        .await
        .unwrap();

    assert_eq!(reduction.new_state, "b");
    assert_eq!(store.get_count(), 2);
    assert_eq!(store.saves(), vec![("b".to_string(), "a".to_string())]);
}

#[tokio::test]
async fn test_with_retry_uses_fresh_budget_per_call() {
    let store = MemoryStore::<String, AppError>::fallible("a".to_string());
    let retrying = (&store).with_retry(RetryPolicy::immediate(2), Kind::Store);

    store.push_get_failure(AppError::new(Kind::Store, "busy"));
    assert_eq!(retrying.get_state().await.unwrap(), "a");

    // A second call gets its own two attempts.
    store.push_get_failure(AppError::new(Kind::Store, "busy"));
    assert_eq!(retrying.get_state().await.unwrap(), "a");

    store.push_get_failure(AppError::new(Kind::Store, "busy"));
    store.push_get_failure(AppError::new(Kind::Store, "still busy"));
    assert_eq!(
        retrying.get_state().await.unwrap_err().message,
        "still busy"
    );
}

#[tokio::test]
async fn test_with_retry_ignores_other_kinds() {
    let store = MemoryStore::<String, AppError>::fallible("a".to_string());
    store.push_get_failure(AppError::new(Kind::Validation, "corrupt"));
    let retrying = (&store).with_retry(RetryPolicy::immediate(5), Kind::Store);

    assert_eq!(
        retrying.get_state().await.unwrap_err().kind,
        Kind::Validation
    );
    assert_eq!(store.get_count(), 1);
}
