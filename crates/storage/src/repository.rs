use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable string key-value storage, the local equivalent of browser
/// `localStorage`.
///
/// `set` replaces the whole value for a key; a reader never observes a
/// partially written value.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` when the key has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Simple in-memory store for tests and throwaway sessions.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Where persisted state lives, parsed from a store URL.
///
/// Accepted forms: `memory:`, `file:<path>` and any `sqlite:` URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocator {
    Memory,
    JsonFile(PathBuf),
    Sqlite(String),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreLocatorError {
    #[error("store url is empty")]
    Empty,
    #[error("file store url needs a path: {0}")]
    MissingPath(String),
    #[error("unsupported store url scheme: {0}")]
    UnsupportedScheme(String),
}

impl FromStr for StoreLocator {
    type Err = StoreLocatorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(StoreLocatorError::Empty);
        }
        if raw == "memory:" || raw == "memory" {
            return Ok(Self::Memory);
        }
        if raw.starts_with("sqlite:") {
            return Ok(Self::Sqlite(raw.to_owned()));
        }
        if let Some(path) = raw.strip_prefix("file:") {
            let path = path.strip_prefix("//").unwrap_or(path);
            if path.is_empty() {
                return Err(StoreLocatorError::MissingPath(raw.to_owned()));
            }
            return Ok(Self::JsonFile(PathBuf::from(path)));
        }
        Err(StoreLocatorError::UnsupportedScheme(raw.to_owned()))
    }
}

impl fmt::Display for StoreLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => f.write_str("memory:"),
            Self::JsonFile(path) => write!(f, "file:{}", path.display()),
            Self::Sqlite(url) => f.write_str(url),
        }
    }
}

/// Holds the active key-value backend behind a trait object for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub kv: Arc<dyn KeyValueStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            kv: Arc::new(InMemoryStore::new()),
        }
    }

    #[must_use]
    pub fn from_store(store: Arc<dyn KeyValueStore>) -> Self {
        Self { kv: store }
    }
}
