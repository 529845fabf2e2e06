//! memdb-connector
//!
//! A unified connection factory for Redis-protocol in-memory stores
//! (Redis, Dragonfly, Valkey) and Memcached:
//! - **One configuration surface**: a connection string plus optional
//!   environment-driven overrides, validated fail-fast into an immutable
//!   [`ResolvedConfig`]
//! - **Family inference**: the URL scheme selects the backend family; an
//!   explicit `DB_TYPE` override wins
//! - **Direct and sentinel topologies** for redis-protocol families
//! - **Blocking and non-blocking modes** with equivalent behavior for the
//!   same configuration
//! - **No pooling**: every connect call returns an independent handle
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use memdb_connector::{ConnectOptions, Connector};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // DB_URL=redis://localhost:6379/0
//!     let connector = Connector::from_env()?;
//!
//!     let mut conn = connector
//!         .connect_async(&ConnectOptions::new())
//!         .await?;
//!
//!     conn.set("user:1", b"alice").await?;
//!     if let Some(value) = conn.get("user:1").await? {
//!         tracing::info!("cached value: {:?}", value.as_text());
//!     }
//!     conn.delete("user:1").await?;
//!
//!     // Async handles have no implicit release point.
//!     conn.release().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! DB_URL, DB_TYPE, ...  →  ResolvedConfig  →  Connector
//!                                               │ dispatch on (family, topology)
//!                         ┌─────────────────────┼──────────────────────┐
//!                      RedisStore          AsyncRedisStore       MemcachedStore /
//!                  (direct | sentinel)  (direct | sentinel)   AsyncMemcachedStore
//! ```
//!
//! Configuration failures ([`ConfigError`]) are distinguishable from
//! setup misuse and connectivity failures ([`ConnectError`],
//! [`BackendError`]) so operators can tell "my setup is wrong" from "the
//! server is down".

pub mod backends;
pub mod config;
pub mod connector;
pub mod error;
pub mod options;
pub mod traits;

pub use backends::{AsyncMemcachedStore, AsyncRedisStore, MemcachedStore, RedisStore};
pub use config::{DbFamily, HostSpec, RawSettings, ResolvedConfig, Topology, DEFAULT_TIMEOUT};
pub use connector::Connector;
pub use error::{BackendError, ConfigError, ConnectError};
pub use options::ConnectOptions;
pub use traits::{AsyncKeyValueStore, KeyValueStore, Payload};

// Re-export async_trait for custom handle implementations.
pub use async_trait::async_trait;
