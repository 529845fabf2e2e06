//! Connection handle implementations.
//!
//! One module per backend family and execution mode:
//!
//! - **Redis protocol** (Redis, Dragonfly, Valkey): [`RedisStore`]
//!   (blocking) and [`AsyncRedisStore`] (tokio), each supporting direct
//!   and sentinel topologies.
//! - **Memcached**: [`MemcachedStore`] (blocking) and
//!   [`AsyncMemcachedStore`] (tokio). Memcached has no sentinel and no
//!   numbered databases.
//!
//! Handles are constructed by [`Connector`](crate::Connector); the
//! constructors here take the parameter set the connector computed so the
//! blocking and non-blocking paths cannot drift apart.

pub mod memcached_async;
pub mod memcached_blocking;
pub mod redis_async;
pub mod redis_blocking;

pub use memcached_async::AsyncMemcachedStore;
pub use memcached_blocking::MemcachedStore;
pub use redis_async::AsyncRedisStore;
pub use redis_blocking::RedisStore;
