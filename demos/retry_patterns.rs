//! Retry strategies against a flaky upstream.
//!
//! Run with: cargo run --example retry_patterns

use std::io;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use tidepool::prelude::*;
use tidepool::retry::{BackoffSettings, RetrySettings};

/// Fails with `ConnectionReset` for the first `failures` calls.
struct Upstream {
    calls: AtomicU32,
    failures: u32,
}

impl Upstream {
    fn new(failures: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            failures,
        }
    }

    fn fetch(&self) -> impl Effect<Output = String, Error = io::Error> + '_ {
        from_async(move || async move {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.failures {
                Err(io::Error::from(io::ErrorKind::ConnectionReset))
            } else {
                Ok(format!("payload after {} calls", n))
            }
        })
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Immediate ===");
    let upstream = Upstream::new(2);
    let result = (|| upstream.fetch())
        .retry_on(io::ErrorKind::ConnectionReset, RetryPolicy::immediate(3))
        .run()
        .await;
    println!("{:?}", result.map_err(|e| e.kind()));

    println!("\n=== Random backoff with a hook ===");
    let upstream = Upstream::new(3);
    let result = retry(
        || upstream.fetch(),
        RetryPolicy::random(Duration::from_millis(10), Duration::from_millis(50), 5),
        io::ErrorKind::ConnectionReset,
    )
    .on_retry(|event| {
        println!(
            "attempt {}/{} failed ({}), retrying: {}",
            event.attempt, event.max_attempts, event.error, event.will_retry
        );
    })
    .run()
    .await;
    println!("{:?}", result.map_err(|e| e.kind()));

    println!("\n=== Giving up early ===");
    let upstream = Upstream::new(u32::MAX);
    let result = retry(
        || upstream.fetch(),
        RetryPolicy::constant(Duration::from_millis(10), 10),
        io::ErrorKind::ConnectionReset,
    )
    .stop_when(|event| event.attempt >= 2)
    .run()
    .await;
    println!("{:?}", result.map_err(|e| e.kind()));

    println!("\n=== Exhaustion from settings ===");
    let settings = RetrySettings {
        max_attempts: 2,
        backoff: BackoffSettings::Constant { delay_ms: 20 },
    };
    let policy = match RetryPolicy::try_from(&settings) {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("bad settings: {}", e);
            return;
        }
    };
    let upstream = Upstream::new(u32::MAX);
    let result = (|| upstream.fetch())
        .retry_on(io::ErrorKind::ConnectionReset, policy)
        .catch_value(io::ErrorKind::ConnectionReset, |_| "cached fallback".to_string())
        .run()
        .await;
    println!("{:?}", result.map_err(|e| e.kind()));
}
