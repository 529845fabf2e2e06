//! Blocking Memcached handle.

use tracing::debug;

use crate::connector::ConnectionParams;
use crate::error::{BackendError, ConnectError};
use crate::traits::{KeyValueStore, Payload};

/// Blocking handle for Memcached.
///
/// Memcached has no numbered databases and no sentinel; a requested
/// database index is ignored by the connector before this handle is
/// built. Values are stored without expiry.
pub struct MemcachedStore {
    client: memcache::Client,
    decode: bool,
}

impl MemcachedStore {
    pub(crate) fn connect(params: &ConnectionParams<'_>) -> Result<Self, ConnectError> {
        if params.hosts.endpoints.is_empty() {
            return Err(ConnectError::NoEndpoints);
        }
        let client = memcache::connect(connect_urls(params))?;
        client.set_read_timeout(Some(params.timeout))?;
        client.set_write_timeout(Some(params.timeout))?;
        let versions = client.version()?;
        debug!(servers = versions.len(), "memcached connection established");
        Ok(Self {
            client,
            decode: params.decode,
        })
    }
}

/// The `memcache` crate speaks `memcache://` URLs with the timeout as a
/// query parameter.
pub(crate) fn connect_urls(params: &ConnectionParams<'_>) -> Vec<String> {
    params
        .hosts
        .endpoints
        .iter()
        .map(|(host, port)| {
            format!(
                "memcache://{host}:{port}?timeout={}&protocol=ascii",
                params.timeout.as_secs()
            )
        })
        .collect()
}

impl std::fmt::Debug for MemcachedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemcachedStore")
            .field("decode", &self.decode)
            .finish_non_exhaustive()
    }
}

impl KeyValueStore for MemcachedStore {
    fn ping(&mut self) -> Result<bool, BackendError> {
        let versions = self.client.version()?;
        Ok(!versions.is_empty())
    }

    fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError> {
        let bytes: Option<Vec<u8>> = self.client.get(key)?;
        bytes.map(|raw| Payload::from_raw(raw, self.decode)).transpose()
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        self.client.set(key, value, 0)?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<bool, BackendError> {
        Ok(self.client.delete(key)?)
    }

    fn supports_database_selection(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memcached"
    }
}
