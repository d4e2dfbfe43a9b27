use std::sync::Arc;

use roadmap_core::model::{IntroState, Theme};
use storage::{KeyValueStore, StorageError};
use tracing::warn;

/// Storage key of the dark-mode flag.
pub const DARK_MODE_KEY: &str = "darkMode";
/// Storage key of the first-visit introduction state.
pub const INTRO_KEY: &str = "roadmapIntro";

/// Persisted learner preferences: theme and introduction state.
#[derive(Clone)]
pub struct PreferencesService {
    kv: Arc<dyn KeyValueStore>,
}

impl PreferencesService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Load the theme, falling back to light mode on missing or bad state.
    pub async fn load_theme(&self) -> Theme {
        Theme::from_flag(self.read(DARK_MODE_KEY).await.as_deref())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the flag cannot be written.
    pub async fn save_theme(&self, theme: Theme) -> Result<(), StorageError> {
        self.kv.set(DARK_MODE_KEY, theme.as_flag()).await
    }

    /// Load the introduction state, `Unknown` when never recorded.
    pub async fn load_intro(&self) -> IntroState {
        IntroState::parse(self.read(INTRO_KEY).await.as_deref())
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be written.
    pub async fn save_intro(&self, state: IntroState) -> Result<(), StorageError> {
        self.kv.set(INTRO_KEY, state.as_str()).await
    }

    async fn read(&self, key: &str) -> Option<String> {
        self.kv.get(key).await.unwrap_or_else(|err| {
            warn!(key, error = %err, "preference unavailable, using default");
            None
        })
    }
}
