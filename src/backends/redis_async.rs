//! Non-blocking Redis-protocol handles, direct and sentinel.

use std::future::Future;
use std::time::Duration;

use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, ConnectionAddr, IntoConnectionInfo, RedisResult};
use tracing::debug;

use super::redis_blocking::{redis_info, sentinel_client};
use crate::config::DbFamily;
use crate::connector::ConnectionParams;
use crate::error::{BackendError, ConnectError};
use crate::traits::{AsyncKeyValueStore, Payload};

/// Non-blocking handle for Redis, Dragonfly, and Valkey.
///
/// Every operation, including connection establishment, is bounded by the
/// effective timeout via `tokio::time::timeout`. The handle must be
/// released with [`AsyncKeyValueStore::release`]; an unreleased handle
/// keeps its socket until the runtime reaps it.
pub struct AsyncRedisStore {
    conn: Option<MultiplexedConnection>,
    decode: bool,
    timeout: Duration,
    family: DbFamily,
}

impl AsyncRedisStore {
    pub(crate) async fn connect_direct(
        params: &ConnectionParams<'_>,
    ) -> Result<Self, ConnectError> {
        let (host, port) = params.hosts.primary().ok_or(ConnectError::NoEndpoints)?;
        let info = ConnectionAddr::Tcp(host.to_owned(), port)
            .into_connection_info()?
            .set_redis_settings(redis_info(params));
        let client = redis::Client::open(info)?;
        let conn = bound(params.timeout, client.get_multiplexed_async_connection()).await?;
        Self::establish(conn, params).await
    }

    pub(crate) async fn connect_sentinel(
        params: &ConnectionParams<'_>,
    ) -> Result<Self, ConnectError> {
        let mut sentinel = sentinel_client(params)?;
        let conn = bound(params.timeout, sentinel.get_async_connection()).await?;
        Self::establish(conn, params).await
    }

    async fn establish(
        mut conn: MultiplexedConnection,
        params: &ConnectionParams<'_>,
    ) -> Result<Self, ConnectError> {
        let pong: String = bound(params.timeout, redis::cmd("PING").query_async(&mut conn)).await?;
        debug!(family = %params.family, db = params.db, pong = %pong, "async connection established");
        Ok(Self {
            conn: Some(conn),
            decode: params.decode,
            timeout: params.timeout,
            family: params.family,
        })
    }

    fn live(&mut self) -> Result<&mut MultiplexedConnection, BackendError> {
        self.conn.as_mut().ok_or(BackendError::Released)
    }
}

/// Bound a redis future by the effective timeout.
async fn bound<T>(
    limit: Duration,
    op: impl Future<Output = RedisResult<T>>,
) -> Result<T, BackendError> {
    match tokio::time::timeout(limit, op).await {
        Ok(result) => result.map_err(BackendError::from),
        Err(_) => Err(BackendError::Timeout(limit)),
    }
}

impl std::fmt::Debug for AsyncRedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncRedisStore")
            .field("decode", &self.decode)
            .field("timeout", &self.timeout)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AsyncKeyValueStore for AsyncRedisStore {
    async fn ping(&mut self) -> Result<bool, BackendError> {
        let limit = self.timeout;
        let conn = self.live()?;
        let pong: String = bound(limit, redis::cmd("PING").query_async(conn)).await?;
        Ok(pong.eq_ignore_ascii_case("pong"))
    }

    async fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError> {
        let limit = self.timeout;
        let decode = self.decode;
        let conn = self.live()?;
        let bytes: Option<Vec<u8>> = bound(limit, conn.get(key)).await?;
        bytes.map(|raw| Payload::from_raw(raw, decode)).transpose()
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let limit = self.timeout;
        let conn = self.live()?;
        bound(limit, conn.set::<_, _, ()>(key, value)).await
    }

    async fn delete(&mut self, key: &str) -> Result<bool, BackendError> {
        let limit = self.timeout;
        let conn = self.live()?;
        let removed: i64 = bound(limit, conn.del(key)).await?;
        Ok(removed > 0)
    }

    async fn release(&mut self) -> Result<(), BackendError> {
        if self.conn.take().is_some() {
            debug!(family = %self.family, "async connection released");
        }
        Ok(())
    }

    fn supports_database_selection(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        self.family.scheme()
    }
}
