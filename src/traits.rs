//! Connection handle traits.
//!
//! The factory returns trait objects so callers program against one small
//! capability surface regardless of backend family:
//!
//! - [`KeyValueStore`]: blocking handles. Dropping the handle closes the
//!   connection.
//! - [`AsyncKeyValueStore`]: non-blocking handles. There is no implicit
//!   release point in async mode, so callers must invoke
//!   [`AsyncKeyValueStore::release`] when done; an unreleased handle keeps
//!   its socket until the runtime reaps it.
//!
//! Handles are exclusively owned (`&mut self` operations) and never
//! pooled or shared; every `connect` call produces an independent handle.

use async_trait::async_trait;

use crate::error::BackendError;

/// A fetched value.
///
/// Payloads are decoded to [`Payload::Text`] when the handle was built
/// with `decode_responses` (the default), and returned as raw
/// [`Payload::Binary`] bytes otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
}

impl Payload {
    /// The decoded text, when this payload is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Binary(_) => None,
        }
    }

    /// The payload bytes, regardless of decode mode.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes,
        }
    }

    pub(crate) fn from_raw(bytes: Vec<u8>, decode: bool) -> Result<Self, BackendError> {
        if decode {
            Ok(Self::Text(String::from_utf8(bytes)?))
        } else {
            Ok(Self::Binary(bytes))
        }
    }
}

impl PartialEq<&str> for Payload {
    fn eq(&self, other: &&str) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

/// Blocking connection handle.
///
/// Operations suspend the calling thread; concurrency is achieved by
/// running independent handles on independent threads. Sequential
/// operations on one handle observe the backend's per-connection
/// ordering.
pub trait KeyValueStore: Send + std::fmt::Debug {
    /// Liveness probe. `Ok(true)` means the backend answered.
    fn ping(&mut self) -> Result<bool, BackendError>;

    /// Fetch a value; `None` when the key is absent.
    fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError>;

    /// Store a value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// Remove a key; `Ok(true)` when a value was actually removed.
    fn delete(&mut self, key: &str) -> Result<bool, BackendError>;

    /// Whether this handle's family honors numbered database selection.
    fn supports_database_selection(&self) -> bool;

    /// The backend family name, for logging.
    fn backend_name(&self) -> &'static str;
}

/// Non-blocking connection handle.
///
/// Every operation is a suspension point; while network I/O is
/// outstanding, other tasks on the same runtime make progress.
/// Cancellation of the enclosing task is the only cancellation mechanism;
/// its effect on an in-flight operation is backend-dependent.
#[async_trait]
pub trait AsyncKeyValueStore: Send + std::fmt::Debug {
    /// Liveness probe. `Ok(true)` means the backend answered.
    async fn ping(&mut self) -> Result<bool, BackendError>;

    /// Fetch a value; `None` when the key is absent.
    async fn get(&mut self, key: &str) -> Result<Option<Payload>, BackendError>;

    /// Store a value.
    async fn set(&mut self, key: &str, value: &[u8]) -> Result<(), BackendError>;

    /// Remove a key; `Ok(true)` when a value was actually removed.
    async fn delete(&mut self, key: &str) -> Result<bool, BackendError>;

    /// Release the underlying connection.
    ///
    /// Idempotent: releasing an already-released handle succeeds.
    /// Operations after release fail with [`BackendError::Released`].
    async fn release(&mut self) -> Result<(), BackendError>;

    /// Whether this handle's family honors numbered database selection.
    fn supports_database_selection(&self) -> bool;

    /// The backend family name, for logging.
    fn backend_name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_decodes_to_text_on_request() {
        let decoded = Payload::from_raw(b"hello".to_vec(), true).unwrap();
        assert_eq!(decoded, Payload::Text("hello".to_owned()));
        assert_eq!(decoded.as_text(), Some("hello"));

        let raw = Payload::from_raw(b"hello".to_vec(), false).unwrap();
        assert_eq!(raw, Payload::Binary(b"hello".to_vec()));
        assert_eq!(raw.as_text(), None);
        assert_eq!(raw.as_bytes(), b"hello");
    }

    #[test]
    fn payload_rejects_invalid_utf8_only_when_decoding() {
        let invalid = vec![0xff, 0xfe];
        assert!(matches!(
            Payload::from_raw(invalid.clone(), true),
            Err(BackendError::Decode(_))
        ));
        assert!(Payload::from_raw(invalid, false).is_ok());
    }

    #[test]
    fn payload_compares_against_str() {
        assert_eq!(Payload::Text("v".to_owned()), "v");
        assert_eq!(Payload::Binary(b"v".to_vec()), "v");
    }
}
