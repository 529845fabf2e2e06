//! Error taxonomy for configuration resolution and connection construction.
//!
//! Three layers, matching the three places a caller can fail:
//!
//! - [`ConfigError`]: the configuration inputs are missing, malformed, or
//!   mutually inconsistent. Surfaced at resolution time, before any I/O.
//! - [`ConnectError`]: a `connect` call was structurally unsupported
//!   (setup misuse) or the backend could not be reached.
//! - [`BackendError`]: a live handle failed mid-operation (transport error,
//!   timeout, use after release).
//!
//! The split lets operators tell "my setup is wrong" apart from "the server
//! is down": setup problems are [`ConfigError`] or a `ConnectError` for
//! which [`ConnectError::is_setup`] returns `true`; everything else is an
//! availability problem.

use std::time::Duration;

use thiserror::Error;

use crate::config::DbFamily;

/// Invalid, missing, or inconsistent configuration inputs.
///
/// Always surfaced at resolution time and never retried. Callers are
/// expected to treat this as a startup-time fatal condition.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No connection string was supplied (`DB_URL` unset or empty).
    #[error("missing connection string (set DB_URL)")]
    MissingUrl,

    /// The URL scheme is not one of `redis`, `memcached`, `dragonfly`,
    /// `valkey`.
    #[error("unsupported connection scheme: {0}")]
    UnsupportedScheme(String),

    /// An explicit `DB_TYPE` override names no known backend family.
    #[error("unknown backend family: {0}")]
    UnknownFamily(String),

    /// `REDIS_CONNECTION_TYPE` is neither `direct` nor `sentinel`.
    #[error("unknown connection type: {0} (expected \"direct\" or \"sentinel\")")]
    UnknownConnectionType(String),

    /// Sentinel topology requested for a family that has no sentinel.
    #[error("sentinel topology is not supported for {0}")]
    SentinelUnsupported(DbFamily),

    /// Sentinel topology requested without a master service name.
    #[error("sentinel topology requires a master service name")]
    MissingMasterService,

    /// The connection string could not be parsed into endpoints.
    #[error("malformed connection string: {0}")]
    MalformedUrl(String),

    /// `DB_TIMEOUT` is not a positive number of seconds.
    #[error("invalid timeout: {0} (expected a positive number of seconds)")]
    InvalidTimeout(String),
}

/// Failure to construct a connection handle.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The requested family/topology combination is structurally
    /// unsupported (e.g. Memcached + Sentinel). Never retried.
    #[error("sentinel topology is not supported for {0}")]
    SentinelUnsupported(DbFamily),

    /// Sentinel dispatch reached without a master service name.
    #[error("sentinel topology requires a master service name")]
    MissingMasterService,

    /// The host specification holds no endpoints.
    #[error("no endpoints in host specification")]
    NoEndpoints,

    /// The backend could not be reached or rejected the connection.
    #[error(transparent)]
    Unavailable(#[from] BackendError),
}

impl ConnectError {
    /// `true` for construction-time misuse, `false` for availability
    /// failures.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::SentinelUnsupported(_) | Self::MissingMasterService | Self::NoEndpoints
        )
    }
}

/// A live handle operation failed.
///
/// Underlying library errors are carried as sources rather than swallowed.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from the Redis protocol client.
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    /// Error from the Memcached client.
    #[error("memcached error: {0}")]
    Memcached(#[from] memcache::MemcacheError),

    /// The operation exceeded its configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// The fetched payload was requested as text but is not valid UTF-8.
    #[error("response is not valid UTF-8: {0}")]
    Decode(#[from] std::string::FromUtf8Error),

    /// An offloaded blocking task failed to complete.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The handle was explicitly released and can no longer be used.
    #[error("connection has been released")]
    Released,
}

impl From<redis::RedisError> for ConnectError {
    fn from(err: redis::RedisError) -> Self {
        Self::Unavailable(BackendError::Redis(err))
    }
}

impl From<memcache::MemcacheError> for ConnectError {
    fn from(err: memcache::MemcacheError) -> Self {
        Self::Unavailable(BackendError::Memcached(err))
    }
}
