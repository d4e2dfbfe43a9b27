//! Loading of the read-only catalog and roadmap definitions.

use std::collections::HashMap;
use std::path::Path;

use roadmap_core::model::{Catalog, VideoDraft};
use roadmap_core::{Roadmap, RoadmapConfig, ValidationMode};
use tracing::info;

use crate::error::{CatalogError, RoadmapLoadError};

/// Parse a `{ "<topic>": [ { "url", "title" } ] }` document.
///
/// # Errors
///
/// Returns `CatalogError::Parse` if the document does not have that shape.
pub fn parse_catalog(raw: &str) -> Result<Catalog, CatalogError> {
    let drafts: HashMap<String, Vec<VideoDraft>> = serde_json::from_str(raw)?;
    Ok(Catalog::from_drafts(drafts))
}

/// # Errors
///
/// Returns `CatalogError` if the file cannot be read or parsed.
pub async fn load_catalog(path: &Path) -> Result<Catalog, CatalogError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog = parse_catalog(&raw)?;
    info!(path = %path.display(), videos = catalog.total_videos(), "catalog loaded");
    Ok(catalog)
}

/// Parse a `{ "topics": [...], "edges": [...] }` roadmap definition.
///
/// # Errors
///
/// Returns `RoadmapLoadError::Parse` for malformed JSON and
/// `RoadmapLoadError::Graph` when validation rejects the definition.
pub fn parse_roadmap(raw: &str, mode: ValidationMode) -> Result<Roadmap, RoadmapLoadError> {
    let config: RoadmapConfig = serde_json::from_str(raw)?;
    Ok(Roadmap::from_config(config, mode)?)
}

/// # Errors
///
/// Returns `RoadmapLoadError` if the file cannot be read, parsed or
/// validated.
pub async fn load_roadmap(path: &Path, mode: ValidationMode) -> Result<Roadmap, RoadmapLoadError> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RoadmapLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let roadmap = parse_roadmap(&raw, mode)?;
    info!(
        path = %path.display(),
        topics = roadmap.topics().len(),
        edges = roadmap.edges().len(),
        rejected = roadmap.rejected_edges().len(),
        "roadmap loaded"
    );
    Ok(roadmap)
}
