use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::repository::{KeyValueStore, Storage, StorageError};

type Entries = BTreeMap<String, String>;

/// Key-value store kept as one JSON object in a single file.
///
/// Every write rewrites the whole document through a temp file and a rename,
/// so readers see either the previous or the new document.
#[derive(Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<Entries, StorageError> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Entries::new()),
            Err(err) => return Err(err.into()),
        };
        serde_json::from_slice(&bytes).map_err(|err| {
            StorageError::Serialization(format!(
                "parse store file {} failed: {err}",
                self.path.display()
            ))
        })
    }

    /// Entries to start a write from; an unreadable document is replaced.
    async fn entries_for_write(&self) -> Result<Entries, StorageError> {
        match self.read_entries().await {
            Ok(entries) => Ok(entries),
            Err(StorageError::Serialization(reason)) => {
                warn!(path = %self.path.display(), %reason, "replacing corrupt store file");
                Ok(Entries::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Replace the document through a uniquely named temp file in the same
    /// directory followed by a rename.
    async fn write_entries(&self, entries: &Entries) -> Result<(), StorageError> {
        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).await?;
                parent.to_path_buf()
            }
            None => PathBuf::from("."),
        };
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        let target = self.path.clone();
        tokio::task::spawn_blocking(move || -> Result<(), StorageError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(&bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(&target).map_err(|err| StorageError::Io(err.error))?;
            Ok(())
        })
        .await
        .map_err(|err| StorageError::Connection(format!("store writer task failed: {err}")))??;
        debug!(path = %self.path.display(), keys = entries.len(), "store file written");
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut entries = self.read_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries_for_write().await?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_entries(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.entries_for_write().await?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries).await?;
        }
        Ok(())
    }
}

impl Storage {
    /// Build a `Storage` backed by a JSON document at `path`.
    #[must_use]
    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        Self::from_store(Arc::new(JsonFileStore::new(path)))
    }
}
