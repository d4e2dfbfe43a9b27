//! Shared error types for the services crate.

use std::path::PathBuf;

use thiserror::Error;

use roadmap_core::GraphError;
use storage::StoreLocatorError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading catalog content.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("read catalog {path} failed: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("catalog is not a topic -> videos object: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted while loading a roadmap definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RoadmapLoadError {
    #[error("read roadmap {path} failed: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("roadmap definition is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Errors emitted while reading configuration from the environment.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Store(#[from] StoreLocatorError),
    #[error("invalid viewport width: {0}")]
    ViewportWidth(String),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Roadmap(#[from] RoadmapLoadError),
}
