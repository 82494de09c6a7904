//! Tests for the retry loop.

use super::*;
use crate::effect::prelude::*;
use crate::kind::Kinded;
use proptest::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_test::traced_test;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Transient,
    Permanent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TestError {
    kind: Kind,
    attempt: u32,
}

impl Kinded for TestError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        self.kind
    }
}

/// A factory failing with `kind` for the first `failures` invocations.
fn flaky(
    calls: Arc<AtomicU32>,
    failures: u32,
    kind: Kind,
) -> impl FnMut() -> FromResult<&'static str, TestError> + Send {
    move || {
        let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
        from_result(if attempt <= failures {
            Err(TestError { kind, attempt })
        } else {
            Ok("done")
        })
    }
}

#[test]
fn test_policy_counts_attempts() {
    let mut policy = RetryPolicy::immediate(3);
    assert_eq!(policy.attempts(), 0);
    assert!(policy.should_retry());

    policy.record_attempt();
    policy.record_attempt();
    assert!(policy.should_retry());

    policy.record_attempt();
    assert!(!policy.should_retry());
    assert_eq!(policy.attempts(), 3);

    let fresh = policy.fresh();
    assert_eq!(fresh.attempts(), 0);
    assert_eq!(fresh.max_attempts(), 3);
}

#[test]
fn test_zero_attempt_budget_never_retries() {
    let policy = RetryPolicy::immediate(0);
    assert!(!policy.should_retry());
}

#[test]
fn test_random_delay_stays_in_range() {
    let min = Duration::from_millis(10);
    let max = Duration::from_millis(20);
    let policy = RetryPolicy::random(min, max, 3);

    for _ in 0..200 {
        let delay = policy.next_delay();
        assert!(delay >= min && delay < max, "delay {:?} out of range", delay);
    }
}

#[test]
fn test_random_with_equal_bounds_is_constant() {
    let d = Duration::from_millis(15);
    let policy = RetryPolicy::random(d, d, 3);
    assert_eq!(policy.next_delay(), d);
}

#[test]
#[should_panic(expected = "min <= max")]
fn test_random_rejects_inverted_bounds() {
    let _ = RetryPolicy::random(Duration::from_millis(20), Duration::from_millis(10), 3);
}

#[test]
fn test_custom_backoff_sees_attempt_number() {
    let mut policy = RetryPolicy::custom(|n| Duration::from_millis(u64::from(n) * 10), 5);
    policy.record_attempt();
    assert_eq!(policy.next_delay(), Duration::from_millis(10));
    policy.record_attempt();
    policy.record_attempt();
    assert_eq!(policy.next_delay(), Duration::from_millis(30));
}

#[tokio::test(start_paused = true)]
async fn test_delay_before_next_attempt_sleeps() {
    let start = Instant::now();
    let waited = RetryPolicy::constant(Duration::from_millis(300), 2)
        .delay_before_next_attempt()
        .await;
    assert_eq!(waited, Duration::from_millis(300));
    assert_eq!(start.elapsed(), Duration::from_millis(300));

    let start = Instant::now();
    RetryPolicy::immediate(2).delay_before_next_attempt().await;
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn test_immediate_retry_succeeds_on_third_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = retry(
        flaky(calls.clone(), 2, Kind::Transient),
        RetryPolicy::immediate(3),
        Kind::Transient,
    )
    .run()
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test]
async fn test_exhaustion_returns_final_error() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::immediate(4),
        Kind::Transient,
    )
    .run()
    .await;

    assert_eq!(
        result,
        Err(TestError {
            kind: Kind::Transient,
            attempt: 4
        })
    );
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_non_matching_kind_propagates_without_retry() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Permanent),
        RetryPolicy::immediate(5),
        Kind::Transient,
    )
    .run()
    .await;

    assert_eq!(result.unwrap_err().kind, Kind::Permanent);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_zero_budget_still_invokes_once() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::immediate(0),
        Kind::Transient,
    )
    .run()
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_constant_delay_after_every_failed_attempt() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::constant(Duration::from_millis(100), 3),
        Kind::Transient,
    )
    .run()
    .await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    // One wait per failed attempt, including the exhausting one.
    assert_eq!(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_exhausting_attempt_waits_before_returning() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::custom(|attempt| Duration::from_millis(10 * attempt as u64), 2),
        Kind::Transient,
    )
    .run()
    .await;

    assert_eq!(result.unwrap_err().attempt, 2);
    // 10ms after the first failure, 20ms after the second.
    assert_eq!(start.elapsed(), Duration::from_millis(30));
}

#[tokio::test(start_paused = true)]
async fn test_success_after_backoff_counts_only_failed_waits() {
    let calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = retry(
        flaky(calls.clone(), 2, Kind::Transient),
        RetryPolicy::constant(Duration::from_millis(100), 5),
        Kind::Transient,
    )
    .run()
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(start.elapsed(), Duration::from_millis(200));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_final_backoff_returns_last_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();

    let effect = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::constant(Duration::from_secs(60), 1),
        Kind::Transient,
    )
    .cancel_on(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        token.cancel();
    });

    let start = Instant::now();
    let err = effect.run().await.unwrap_err();
    canceller.await.unwrap();

    assert_eq!(err.attempt, 1);
    assert_eq!(start.elapsed(), Duration::from_secs(5));
}

#[tokio::test]
async fn test_retry_on_extension() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = flaky(calls.clone(), 1, Kind::Transient)
        .retry_on(Kind::Transient, RetryPolicy::immediate(2))
        .run()
        .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_on_retry_hook_sees_each_failure() {
    let events = Arc::new(Mutex::new(Vec::new()));

    let result = retry(
        flaky(Arc::new(AtomicU32::new(0)), u32::MAX, Kind::Transient),
        RetryPolicy::immediate(3),
        Kind::Transient,
    )
    .on_retry({
        let events = events.clone();
        move |event| {
            events.lock().unwrap().push((
                event.attempt,
                event.max_attempts,
                event.error.attempt,
                event.will_retry,
            ));
        }
    })
    .run()
    .await;

    assert!(result.is_err());
    assert_eq!(
        *events.lock().unwrap(),
        vec![
            (1, 3, 1, true),
            (2, 3, 2, true),
            (3, 3, 3, false),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_when_ends_loop_without_waiting() {
    let calls = Arc::new(AtomicU32::new(0));
    let hook_calls = Arc::new(AtomicU32::new(0));
    let start = Instant::now();

    let result = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::constant(Duration::from_secs(1), 10),
        Kind::Transient,
    )
    .on_retry({
        let hook_calls = hook_calls.clone();
        move |_| {
            hook_calls.fetch_add(1, Ordering::SeqCst);
        }
    })
    .stop_when(|event| event.error.attempt == 3)
    .run()
    .await;

    assert_eq!(result.unwrap_err().attempt, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert_eq!(hook_calls.load(Ordering::SeqCst), 3);
    // Waited after attempts 1 and 2 only.
    assert_eq!(start.elapsed(), Duration::from_secs(2));
}

#[tokio::test]
async fn test_stop_when_false_keeps_policy_in_charge() {
    let calls = Arc::new(AtomicU32::new(0));

    let result = retry(
        flaky(calls.clone(), 2, Kind::Transient),
        RetryPolicy::immediate(3),
        Kind::Transient,
    )
    .stop_when(|_| false)
    .run()
    .await;

    assert_eq!(result, Ok("done"));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_cancel_during_backoff_returns_last_error() {
    let calls = Arc::new(AtomicU32::new(0));
    let token = CancellationToken::new();

    let effect = retry(
        flaky(calls.clone(), u32::MAX, Kind::Transient),
        RetryPolicy::constant(Duration::from_secs(60), 10),
        Kind::Transient,
    )
    .cancel_on(token.clone());

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(90)).await;
        token.cancel();
    });

    let start = Instant::now();
    let err = effect.run().await.unwrap_err();
    canceller.await.unwrap();

    assert_eq!(err.attempt, 2);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(start.elapsed(), Duration::from_secs(90));
}

#[tokio::test]
async fn test_retry_composes_with_then() {
    let calls = Arc::new(AtomicU32::new(0));

    let effect = retry(
        flaky(calls.clone(), 1, Kind::Transient),
        RetryPolicy::immediate(2),
        Kind::Transient,
    )
    .then(|s| pure(s.len()));

    assert_eq!(effect.run().await, Ok(4));
}

#[tokio::test]
#[traced_test]
async fn test_exhaustion_is_logged() {
    let _ = retry(
        flaky(Arc::new(AtomicU32::new(0)), u32::MAX, Kind::Transient),
        RetryPolicy::immediate(2),
        Kind::Transient,
    )
    .run()
    .await;

    assert!(logs_contain("attempt failed, backing off"));
    assert!(logs_contain("retry policy exhausted"));
}

proptest! {
    #[test]
    fn prop_invocation_count(failures in 0u32..10, max_attempts in 1u32..10) {
        let calls = Arc::new(AtomicU32::new(0));

        let result = tokio_test::block_on(
            retry(
                flaky(calls.clone(), failures, Kind::Transient),
                RetryPolicy::immediate(max_attempts),
                Kind::Transient,
            )
            .run(),
        );

        let invoked = calls.load(Ordering::SeqCst);
        if failures < max_attempts {
            prop_assert_eq!(result, Ok("done"));
            prop_assert_eq!(invoked, failures + 1);
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(invoked, max_attempts);
        }
    }
}
