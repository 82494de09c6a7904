//! The ice cream purchase: reduce a wallet, persist the purchase, roll back
//! when persisting fails.
//!
//! Run with: cargo run --example ice_cream

use std::convert::Infallible;

use tidepool::prelude::*;
use tidepool::testing::MemoryStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Database,
}

#[derive(Debug)]
struct DatabaseError(&'static str);

impl Kinded for DatabaseError {
    type Kind = Kind;

    fn kind(&self) -> Kind {
        Kind::Database
    }
}

impl From<Infallible> for DatabaseError {
    fn from(e: Infallible) -> Self {
        match e {}
    }
}

fn persist(purchase: &str) -> impl Effect<Output = u16, Error = DatabaseError> {
    tracing::info!(purchase, "persisting purchase");
    fail(DatabaseError("Failed to persist into database"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let store = &MemoryStore::new("I have $10 in my pocket".to_string());

    let status = bind("Buy an ice cream", store)
        .reduce(|_, _| "Now I have $5".to_string())
        .effect(|_old, _new, action| persist(action))
        .catch(Kind::Database, |err, reduction| {
            tracing::warn!(reason = err.0, "purchase failed, refunding");
            from_async(move || async move {
                reduction.rollback(store).await?;
                Ok(500)
            })
        })
        .instrument(tracing::info_span!("purchase"))
        .run()
        .await;

    match status {
        Ok(code) => tracing::info!(code, state = %store.state(), "purchase finished"),
        Err(e) => tracing::error!(?e, "purchase failed"),
    }

    for (new, old) in store.saves() {
        println!("save_state({:?}, {:?})", new, old);
    }
}
