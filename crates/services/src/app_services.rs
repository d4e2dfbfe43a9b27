use roadmap_core::Roadmap;
use roadmap_core::model::Catalog;
use storage::Storage;
use tracing::info;

use crate::config::AppConfig;
use crate::content::{load_catalog, load_roadmap};
use crate::controller::RoadmapController;
use crate::error::AppServicesError;
use crate::preferences_service::PreferencesService;
use crate::progress_store::ProgressStore;

/// Assembles storage, content and services from configuration.
#[derive(Clone)]
pub struct AppServices {
    roadmap: Roadmap,
    catalog: Catalog,
    progress: ProgressStore,
    preferences: PreferencesService,
    viewport_width: u32,
}

impl AppServices {
    /// Open the configured backend and load catalog and roadmap content.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the store cannot be opened or content
    /// files cannot be loaded.
    pub async fn open(config: &AppConfig) -> Result<Self, AppServicesError> {
        let storage = Storage::open(&config.store).await?;
        let catalog = match &config.catalog_path {
            Some(path) => load_catalog(path).await?,
            None => Catalog::empty(),
        };
        let roadmap = match &config.roadmap_path {
            Some(path) => load_roadmap(path, config.validation).await?,
            None => Roadmap::prerequisites(),
        };
        info!(store = %config.store, "app services ready");
        Ok(Self::from_parts(storage, roadmap, catalog, config.viewport_width))
    }

    #[must_use]
    pub fn from_parts(
        storage: Storage,
        roadmap: Roadmap,
        catalog: Catalog,
        viewport_width: u32,
    ) -> Self {
        Self {
            roadmap,
            catalog,
            progress: ProgressStore::new(storage.kv.clone()),
            preferences: PreferencesService::new(storage.kv),
            viewport_width,
        }
    }

    /// Build a controller initialized from persisted state.
    pub async fn controller(&self) -> RoadmapController {
        RoadmapController::initialize(
            self.roadmap.clone(),
            self.catalog.clone(),
            self.progress.clone(),
            self.preferences.clone(),
            self.viewport_width,
        )
        .await
    }
}
