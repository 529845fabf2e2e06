//! Blocking Redis-protocol handles, direct and sentinel.

use redis::sentinel::{SentinelClient, SentinelNodeConnectionInfo, SentinelServerType};
use redis::{
    Commands, Connection, ConnectionAddr, ConnectionInfo, IntoConnectionInfo, RedisConnectionInfo,
    RedisResult,
};
use tracing::debug;

use crate::config::DbFamily;
use crate::connector::ConnectionParams;
use crate::error::{BackendError, ConnectError};
use crate::traits::{KeyValueStore, Payload};

/// Blocking handle for Redis, Dragonfly, and Valkey.
///
/// Owns a dedicated `redis::Connection`; socket read/write timeouts are
/// set to the effective timeout at construction. Dropping the handle
/// closes the connection.
pub struct RedisStore {
    conn: Connection,
    decode: bool,
    family: DbFamily,
}

impl RedisStore {
    pub(crate) fn connect_direct(params: &ConnectionParams<'_>) -> Result<Self, ConnectError> {
        let (host, port) = params.hosts.primary().ok_or(ConnectError::NoEndpoints)?;
        let info = ConnectionAddr::Tcp(host.to_owned(), port)
            .into_connection_info()?
            .set_redis_settings(redis_info(params));
        let client = redis::Client::open(info)?;
        let conn = client.get_connection()?;
        Self::establish(conn, params)
    }

    pub(crate) fn connect_sentinel(params: &ConnectionParams<'_>) -> Result<Self, ConnectError> {
        let mut sentinel = sentinel_client(params)?;
        let conn = sentinel.get_connection()?;
        Self::establish(conn, params)
    }

    fn establish(mut conn: Connection, params: &ConnectionParams<'_>) -> Result<Self, ConnectError> {
        conn.set_read_timeout(Some(params.timeout))
            .map_err(BackendError::from)?;
        conn.set_write_timeout(Some(params.timeout))
            .map_err(BackendError::from)?;
        let pong: String = redis::cmd("PING").query(&mut conn).map_err(BackendError::from)?;
        debug!(family = %params.family, db = params.db, pong = %pong, "blocking connection established");
        Ok(Self {
            conn,
            decode: params.decode,
            family: params.family,
        })
    }
}

impl std::fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("decode", &self.decode)
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for RedisStore {
    fn ping(&mut self) -> Result<bool, BackendError> {
        let pong: String = redis::cmd("PING").query(&mut self.conn)?;
        Ok(pong.eq_ignore_ascii_case("pong"))
    }

    fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError> {
        let bytes: Option<Vec<u8>> = self.conn.get(key)?;
        bytes.map(|raw| Payload::from_raw(raw, self.decode)).transpose()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        self.conn.set::<_, _, ()>(key, value)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, BackendError> {
        let removed: i64 = self.conn.del(key)?;
        Ok(removed > 0)
    }

    fn supports_database_selection(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        self.family.scheme()
    }
}

/// Connection parameters for the server the sentinel resolves to, and for
/// direct connections: database, credentials.
pub(crate) fn redis_info(params: &ConnectionParams<'_>) -> RedisConnectionInfo {
    let mut info = RedisConnectionInfo::default().set_db(params.db);
    if let Some(username) = &params.hosts.username {
        info = info.set_username(username);
    }
    if let Some(password) = &params.hosts.password {
        info = info.set_password(password);
    }
    info
}

/// Build a sentinel client over every configured endpoint, resolving the
/// master for the configured service.
pub(crate) fn sentinel_client(
    params: &ConnectionParams<'_>,
) -> Result<SentinelClient, ConnectError> {
    let service = params
        .master_service
        .ok_or(ConnectError::MissingMasterService)?;
    if params.hosts.endpoints.is_empty() {
        return Err(ConnectError::NoEndpoints);
    }
    let nodes: Vec<ConnectionInfo> = params
        .hosts
        .endpoints
        .iter()
        .map(|(host, port)| ConnectionAddr::Tcp(host.clone(), *port).into_connection_info())
        .collect::<RedisResult<Vec<ConnectionInfo>>>()?;
    let client = SentinelClient::build(
        nodes,
        service.to_owned(),
        Some(SentinelNodeConnectionInfo::default().set_redis_connection_info(redis_info(params))),
        SentinelServerType::Master,
    )?;
    debug!(service = %service, sentinels = params.hosts.endpoints.len(), "sentinel client built");
    Ok(client)
}
