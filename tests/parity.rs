//! Cross-mode behavioral parity.
//!
//! For one configuration and option set, the blocking and non-blocking
//! handles must exhibit identical observable behavior for the same
//! operation sequence against the same backend. Run with
//! `cargo test -- --ignored` against a local Redis.

mod common;

use common::{connector, redis_url, test_key};
use memdb_connector::{ConnectOptions, Payload};

/// Observations from the canonical sequence:
/// set, get, delete, get-after-delete.
#[derive(Debug, PartialEq)]
struct Observed {
    ping: bool,
    fetched: Option<Payload>,
    deleted: bool,
    after_delete: Option<Payload>,
    backend: &'static str,
    supports_db: bool,
}

fn run_blocking(options: &ConnectOptions, key: &str) -> Observed {
    let factory = connector(&redis_url());
    let mut conn = factory.connect(options).unwrap();
    conn.set(key, b"v").unwrap();
    Observed {
        ping: conn.ping().unwrap(),
        fetched: conn.get(key).unwrap(),
        deleted: conn.delete(key).unwrap(),
        after_delete: conn.get(key).unwrap(),
        backend: conn.backend_name(),
        supports_db: conn.supports_database_selection(),
    }
}

async fn run_async(options: &ConnectOptions, key: &str) -> Observed {
    let factory = connector(&redis_url());
    let mut conn = factory.connect_async(options).await.unwrap();
    conn.set(key, b"v").await.unwrap();
    let observed = Observed {
        ping: conn.ping().await.unwrap(),
        fetched: conn.get(key).await.unwrap(),
        deleted: conn.delete(key).await.unwrap(),
        after_delete: conn.get(key).await.unwrap(),
        backend: conn.backend_name(),
        supports_db: conn.supports_database_selection(),
    };
    conn.release().await.unwrap();
    observed
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn blocking_and_async_handles_observe_the_same_results() {
    let options = ConnectOptions::new();

    let blocking_key = test_key("parity_blocking");
    let async_key = test_key("parity_async");

    let blocking = tokio::task::spawn_blocking({
        let options = options.clone();
        move || run_blocking(&options, &blocking_key)
    })
    .await
    .unwrap();
    let asynchronous = run_async(&options, &async_key).await;

    assert_eq!(blocking, asynchronous);
    assert_eq!(blocking.fetched, Some(Payload::Text("v".to_owned())));
    assert!(blocking.ping);
    assert!(blocking.deleted);
    assert_eq!(blocking.after_delete, None);
}

#[tokio::test]
#[ignore = "requires a running Redis instance"]
async fn parity_holds_in_binary_mode() {
    let options = ConnectOptions::new().with_decode_responses(false);

    let blocking_key = test_key("parity_bin_blocking");
    let async_key = test_key("parity_bin_async");

    let blocking = tokio::task::spawn_blocking({
        let options = options.clone();
        move || run_blocking(&options, &blocking_key)
    })
    .await
    .unwrap();
    let asynchronous = run_async(&options, &async_key).await;

    assert_eq!(blocking, asynchronous);
    assert_eq!(blocking.fetched, Some(Payload::Binary(b"v".to_vec())));
}
