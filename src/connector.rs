//! Connection construction and dispatch.
//!
//! [`Connector`] holds an immutable [`ResolvedConfig`] and builds one
//! independent connection handle per `connect` call. There is no pooling
//! and no reuse: callers needing pooling layer it externally.
//!
//! Dispatch branches on `(family, topology)`; blocking and non-blocking
//! paths share the same parameter computation, so a given configuration
//! and option set produces behaviorally equivalent handles in both
//! execution modes.

use std::time::Duration;

use tracing::{debug, info};

use crate::backends::{AsyncMemcachedStore, AsyncRedisStore, MemcachedStore, RedisStore};
use crate::config::{DbFamily, HostSpec, ResolvedConfig, Topology};
use crate::error::{ConfigError, ConnectError};
use crate::options::ConnectOptions;
use crate::traits::{AsyncKeyValueStore, KeyValueStore};

/// Connection factory over a resolved configuration.
///
/// # Example
///
/// ```rust,no_run
/// use memdb_connector::{ConnectOptions, Connector};
///
/// fn main() -> anyhow::Result<()> {
///     let connector = Connector::from_env()?;
///     let mut conn = connector.connect(&ConnectOptions::new())?;
///     conn.set("greeting", b"hello")?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Connector {
    config: ResolvedConfig,
    topology: Topology,
    master_service: Option<String>,
}

/// Effective parameters for one connect call, computed once and handed to
/// whichever backend constructor the dispatch selects.
pub(crate) struct ConnectionParams<'a> {
    pub family: DbFamily,
    pub hosts: &'a HostSpec,
    pub master_service: Option<&'a str>,
    pub db: i64,
    pub decode: bool,
    pub timeout: Duration,
}

impl Connector {
    /// Build a connector over a resolved configuration.
    pub fn new(config: ResolvedConfig) -> Self {
        let topology = config.topology;
        let master_service = config.master_service.clone();
        info!(family = %config.family, topology = ?topology, "connector initialized");
        Self {
            config,
            topology,
            master_service,
        }
    }

    /// Resolve the process environment and build a connector over it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when resolution fails; callers are
    /// expected to treat that as a startup-time fatal condition.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(ResolvedConfig::from_env()?))
    }

    /// Override the resolved topology for this connector instance.
    ///
    /// A sentinel override falls back to the resolved master service name
    /// when `master_service` is `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when sentinel is requested for a family
    /// without sentinel support, or without any master service name.
    pub fn with_topology(
        mut self,
        topology: Topology,
        master_service: Option<String>,
    ) -> Result<Self, ConfigError> {
        let master_service = master_service
            .or_else(|| self.master_service.clone())
            .filter(|service| !service.trim().is_empty());
        if topology == Topology::Sentinel {
            if !self.config.family.is_redis_protocol() {
                return Err(ConfigError::SentinelUnsupported(self.config.family));
            }
            if master_service.is_none() {
                return Err(ConfigError::MissingMasterService);
            }
        }
        self.topology = topology;
        self.master_service = master_service;
        Ok(self)
    }

    /// The configuration this connector was built over.
    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// The effective topology, after any override.
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// The effective sentinel master service name, after any override.
    pub fn master_service(&self) -> Option<&str> {
        self.master_service.as_deref()
    }

    /// Open a blocking connection handle.
    ///
    /// # Errors
    ///
    /// [`ConnectError::SentinelUnsupported`] for sentinel on a family
    /// without it; [`ConnectError::Unavailable`] when the backend cannot
    /// be reached.
    pub fn connect(&self, options: &ConnectOptions) -> Result<Box<dyn KeyValueStore>, ConnectError> {
        let params = self.params(options)?;
        debug!(
            family = %params.family,
            topology = ?self.topology,
            db = params.db,
            timeout_secs = params.timeout.as_secs(),
            "opening blocking connection"
        );
        match self.topology {
            Topology::Direct if params.family == DbFamily::Memcached => {
                Ok(Box::new(MemcachedStore::connect(&params)?))
            }
            Topology::Direct => Ok(Box::new(RedisStore::connect_direct(&params)?)),
            Topology::Sentinel => Ok(Box::new(RedisStore::connect_sentinel(&params)?)),
        }
    }

    /// Open a non-blocking connection handle.
    ///
    /// The caller owns the handle and must invoke `release` when done;
    /// nothing reclaims it implicitly.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Connector::connect`].
    pub async fn connect_async(
        &self,
        options: &ConnectOptions,
    ) -> Result<Box<dyn AsyncKeyValueStore>, ConnectError> {
        let params = self.params(options)?;
        debug!(
            family = %params.family,
            topology = ?self.topology,
            db = params.db,
            timeout_secs = params.timeout.as_secs(),
            "opening async connection"
        );
        match self.topology {
            Topology::Direct if params.family == DbFamily::Memcached => {
                Ok(Box::new(AsyncMemcachedStore::connect(&params).await?))
            }
            Topology::Direct => Ok(Box::new(AsyncRedisStore::connect_direct(&params).await?)),
            Topology::Sentinel => Ok(Box::new(AsyncRedisStore::connect_sentinel(&params).await?)),
        }
    }

    fn params<'a>(&'a self, options: &ConnectOptions) -> Result<ConnectionParams<'a>, ConnectError> {
        if self.topology == Topology::Sentinel {
            if !self.config.family.is_redis_protocol() {
                return Err(ConnectError::SentinelUnsupported(self.config.family));
            }
            if self.master_service.is_none() {
                return Err(ConnectError::MissingMasterService);
            }
        }
        let db = match options.database_index {
            Some(index) if !self.config.family.supports_database_selection() => {
                debug!(family = %self.config.family, index, "database index ignored for this backend family");
                0
            }
            Some(index) => i64::from(index),
            None => self.config.hosts.url_db.map_or(0, i64::from),
        };
        Ok(ConnectionParams {
            family: self.config.family,
            hosts: &self.config.hosts,
            master_service: self.master_service.as_deref(),
            db,
            decode: options.decode_responses,
            timeout: options.timeout.unwrap_or(self.config.default_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RawSettings;

    fn resolved(url: &str) -> ResolvedConfig {
        let raw = RawSettings {
            url: Some(url.to_owned()),
            ..RawSettings::default()
        };
        ResolvedConfig::resolve(&raw).unwrap()
    }

    #[test]
    fn database_index_prefers_options_then_url_then_zero() {
        let connector = Connector::new(resolved("redis://localhost/4"));

        let from_url = connector.params(&ConnectOptions::new()).unwrap();
        assert_eq!(from_url.db, 4);

        let from_options = connector
            .params(&ConnectOptions::new().with_database(9))
            .unwrap();
        assert_eq!(from_options.db, 9);

        let bare = Connector::new(resolved("redis://localhost"));
        assert_eq!(bare.params(&ConnectOptions::new()).unwrap().db, 0);
    }

    #[test]
    fn database_index_is_ignored_for_memcached() {
        let connector = Connector::new(resolved("memcached://localhost"));
        let params = connector
            .params(&ConnectOptions::new().with_database(5))
            .unwrap();
        assert_eq!(params.db, 0);
    }

    #[test]
    fn timeout_override_beats_resolved_default() {
        let connector = Connector::new(resolved("redis://localhost"));

        let default = connector.params(&ConnectOptions::new()).unwrap();
        assert_eq!(default.timeout, Duration::from_secs(30));

        let overridden = connector
            .params(&ConnectOptions::new().with_timeout(Duration::from_secs(3)))
            .unwrap();
        assert_eq!(overridden.timeout, Duration::from_secs(3));
    }

    #[test]
    fn sentinel_override_requires_master_service() {
        let err = Connector::new(resolved("redis://localhost"))
            .with_topology(Topology::Sentinel, None)
            .unwrap_err();
        assert_eq!(err, ConfigError::MissingMasterService);

        let connector = Connector::new(resolved("redis://localhost"))
            .with_topology(Topology::Sentinel, Some("mymaster".to_owned()))
            .unwrap();
        assert_eq!(connector.topology(), Topology::Sentinel);
        assert_eq!(connector.master_service(), Some("mymaster"));
    }

    #[test]
    fn sentinel_override_rejected_for_memcached() {
        let err = Connector::new(resolved("memcached://localhost"))
            .with_topology(Topology::Sentinel, Some("mymaster".to_owned()))
            .unwrap_err();
        assert_eq!(err, ConfigError::SentinelUnsupported(DbFamily::Memcached));
    }
}
