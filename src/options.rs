//! Per-call connection options.

use std::time::Duration;

/// Options for a single `connect` call.
///
/// Created fresh per invocation and discarded after the handle is
/// returned. Execution mode is not an option: blocking and non-blocking
/// handles are obtained through [`Connector::connect`] and
/// [`Connector::connect_async`] respectively, with identical semantics
/// for the same options.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use memdb_connector::ConnectOptions;
///
/// let options = ConnectOptions::new()
///     .with_database(2)
///     .with_decode_responses(false)
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(options.database_index, Some(2));
/// ```
///
/// [`Connector::connect`]: crate::Connector::connect
/// [`Connector::connect_async`]: crate::Connector::connect_async
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectOptions {
    /// Numbered database to select. Meaningful for redis-protocol
    /// families only; silently ignored for Memcached. When unset, the
    /// database embedded in the URL path applies, then 0.
    pub database_index: Option<u32>,
    /// Whether fetched payloads are decoded to text. Defaults to `true`.
    pub decode_responses: bool,
    /// Per-operation timeout override; the resolved default applies when
    /// unset.
    pub timeout: Option<Duration>,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            database_index: None,
            decode_responses: true,
            timeout: None,
        }
    }
}

impl ConnectOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a numbered database.
    pub fn with_database(mut self, index: u32) -> Self {
        self.database_index = Some(index);
        self
    }

    /// Control text decoding of fetched payloads.
    pub fn with_decode_responses(mut self, decode: bool) -> Self {
        self.decode_responses = decode;
        self
    }

    /// Override the resolved default timeout for handles built from this
    /// call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
