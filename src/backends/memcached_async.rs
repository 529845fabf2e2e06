//! Non-blocking Memcached handle.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::memcached_blocking::connect_urls;
use crate::connector::ConnectionParams;
use crate::error::{BackendError, ConnectError};
use crate::traits::{AsyncKeyValueStore, Payload};

/// Non-blocking handle for Memcached.
///
/// The `memcache` client is synchronous, so every operation is offloaded
/// to the tokio blocking pool and bounded by the effective timeout; the
/// calling task suspends instead of blocking the executor. The handle
/// must be released with [`AsyncKeyValueStore::release`].
pub struct AsyncMemcachedStore {
    client: Option<Arc<memcache::Client>>,
    decode: bool,
    timeout: Duration,
}

impl AsyncMemcachedStore {
    pub(crate) async fn connect(params: &ConnectionParams<'_>) -> Result<Self, ConnectError> {
        if params.hosts.endpoints.is_empty() {
            return Err(ConnectError::NoEndpoints);
        }
        let urls = connect_urls(params);
        let timeout = params.timeout;
        let client = offload(timeout, move || {
            let client = memcache::connect(urls)?;
            client.set_read_timeout(Some(timeout))?;
            client.set_write_timeout(Some(timeout))?;
            let versions = client.version()?;
            debug!(servers = versions.len(), "memcached async connection established");
            Ok(client)
        })
        .await?;
        Ok(Self {
            client: Some(Arc::new(client)),
            decode: params.decode,
            timeout,
        })
    }

    fn live(&self) -> Result<&Arc<memcache::Client>, BackendError> {
        self.client.as_ref().ok_or(BackendError::Released)
    }
}

/// Run a synchronous memcache call on the blocking pool, bounded by the
/// effective timeout.
async fn offload<T, F>(limit: Duration, task: F) -> Result<T, BackendError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, memcache::MemcacheError> + Send + 'static,
{
    match tokio::time::timeout(limit, tokio::task::spawn_blocking(task)).await {
        Ok(joined) => joined?.map_err(BackendError::from),
        Err(_) => Err(BackendError::Timeout(limit)),
    }
}

impl std::fmt::Debug for AsyncMemcachedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncMemcachedStore")
            .field("decode", &self.decode)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl AsyncKeyValueStore for AsyncMemcachedStore {
    async fn ping(&mut self) -> Result<bool, BackendError> {
        let client = Arc::clone(self.live()?);
        let versions = offload(self.timeout, move || client.version()).await?;
        Ok(!versions.is_empty())
    }

    async fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError> {
        let decode = self.decode;
        let client = Arc::clone(self.live()?);
        let key = key.to_owned();
        let bytes: Option<Vec<u8>> = offload(self.timeout, move || client.get(&key)).await?;
        bytes.map(|raw| Payload::from_raw(raw, decode)).transpose()
    }

    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError> {
        let client = Arc::clone(self.live()?);
        let key = key.to_owned();
        let value = value.to_vec();
        offload(self.timeout, move || client.set(&key, value.as_slice(), 0)).await
    }

    async fn delete(&mut self, key: &str) -> Result<bool, BackendError> {
        let client = Arc::clone(self.live()?);
        let key = key.to_owned();
        offload(self.timeout, move || client.delete(&key)).await
    }

    async fn release(&mut self) -> Result<(), BackendError> {
        if self.client.take().is_some() {
            debug!("memcached async connection released");
        }
        Ok(())
    }

    fn supports_database_selection(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memcached"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn release_is_idempotent_and_fences_operations() {
        let mut store = AsyncMemcachedStore {
            client: None,
            decode: true,
            timeout: Duration::from_secs(1),
        };

        store.release().await.unwrap();
        store.release().await.unwrap();

        assert!(matches!(store.ping().await, Err(BackendError::Released)));
        assert!(matches!(store.get("k").await, Err(BackendError::Released)));
        assert!(matches!(store.set("k", b"v").await, Err(BackendError::Released)));
        assert!(matches!(store.delete("k").await, Err(BackendError::Released)));
    }
}
