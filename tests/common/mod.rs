//! Common utilities for integration tests.

#![allow(dead_code)]

use memdb_connector::{ConnectOptions, Connector, RawSettings, ResolvedConfig};

/// Build raw settings around a connection string.
pub fn raw(url: &str) -> RawSettings {
    RawSettings {
        url: Some(url.to_owned()),
        ..RawSettings::default()
    }
}

/// Resolve a connection string with no other inputs.
pub fn resolve(url: &str) -> ResolvedConfig {
    ResolvedConfig::resolve(&raw(url)).expect("configuration should resolve")
}

/// Connector over a bare connection string.
pub fn connector(url: &str) -> Connector {
    Connector::new(resolve(url))
}

/// Get Redis URL from environment or use default
pub fn redis_url() -> String {
    std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string())
}

/// Get Memcached URL from environment or use default
pub fn memcached_url() -> String {
    std::env::var("MEMCACHED_URL").unwrap_or_else(|_| "memcached://127.0.0.1:11211".to_string())
}

/// Create a test key with unique suffix to avoid conflicts between tests
pub fn test_key(name: &str) -> String {
    format!("memdb_test_{}_{}", name, rand::random::<u32>())
}

/// Default options used by the round-trip tests.
pub fn options() -> ConnectOptions {
    ConnectOptions::new()
}
