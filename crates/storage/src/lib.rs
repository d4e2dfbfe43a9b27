#![forbid(unsafe_code)]

pub mod file;
pub mod repository;
pub mod sqlite;

pub use file::JsonFileStore;
pub use repository::{
    InMemoryStore, KeyValueStore, Storage, StorageError, StoreLocator, StoreLocatorError,
};

impl Storage {
    /// Open the backend named by `locator`.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` when a `SQLite` backend cannot be connected
    /// or migrated; the memory and file backends open lazily and never fail
    /// here.
    pub async fn open(locator: &StoreLocator) -> Result<Self, sqlite::SqliteInitError> {
        match locator {
            StoreLocator::Memory => Ok(Self::in_memory()),
            StoreLocator::JsonFile(path) => Ok(Self::json_file(path.clone())),
            StoreLocator::Sqlite(url) => Self::sqlite(url).await,
        }
    }
}
