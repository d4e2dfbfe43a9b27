use std::path::PathBuf;

use roadmap_core::ValidationMode;
use storage::StoreLocator;

use crate::error::ConfigError;

pub const ENV_STORE: &str = "ROADMAP_STORE";
pub const ENV_CATALOG: &str = "ROADMAP_CATALOG";
pub const ENV_GRAPH: &str = "ROADMAP_GRAPH";
pub const ENV_VIEWPORT_WIDTH: &str = "ROADMAP_VIEWPORT_WIDTH";
pub const ENV_STRICT: &str = "ROADMAP_STRICT";

pub const DEFAULT_STORE_PATH: &str = "roadmap-state.json";
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1280;

/// Runtime configuration for [`crate::AppServices`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreLocator,
    /// Catalog JSON; without one every topic has zero videos.
    pub catalog_path: Option<PathBuf>,
    /// Roadmap JSON; without one the built-in prerequisites roadmap is used.
    pub roadmap_path: Option<PathBuf>,
    pub viewport_width: u32,
    pub validation: ValidationMode,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreLocator::JsonFile(PathBuf::from(DEFAULT_STORE_PATH)),
            catalog_path: None,
            roadmap_path: None,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            validation: ValidationMode::default(),
        }
    }
}

impl AppConfig {
    /// Defaults overridden by `ROADMAP_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(raw) = var(ENV_STORE) {
            config.store = raw.parse()?;
        }
        config.catalog_path = var(ENV_CATALOG).map(PathBuf::from);
        config.roadmap_path = var(ENV_GRAPH).map(PathBuf::from);
        if let Some(raw) = var(ENV_VIEWPORT_WIDTH) {
            config.viewport_width = parse_width(&raw)?;
        }
        if let Some(raw) = var(ENV_STRICT) {
            config.validation = if is_truthy(&raw) {
                ValidationMode::Strict
            } else {
                ValidationMode::Lenient
            };
        }
        Ok(config)
    }
}

/// # Errors
///
/// Returns `ConfigError::ViewportWidth` unless `raw` is a whole pixel count.
pub fn parse_width(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::ViewportWidth(raw.to_owned()))
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.store,
            StoreLocator::JsonFile(PathBuf::from("roadmap-state.json"))
        );
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_STORE, "sqlite://progress.sqlite3"),
            (ENV_CATALOG, "content/catalog.json"),
            (ENV_VIEWPORT_WIDTH, "600"),
            (ENV_STRICT, "0"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreLocator::Sqlite("sqlite://progress.sqlite3".into())
        );
        assert_eq!(config.catalog_path, Some(PathBuf::from("content/catalog.json")));
        assert_eq!(config.roadmap_path, None);
        assert_eq!(config.viewport_width, 600);
        assert_eq!(config.validation, ValidationMode::Lenient);
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_STORE, "  "), (ENV_GRAPH, "")])).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn bad_values_are_errors() {
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_VIEWPORT_WIDTH, "wide")])),
            Err(ConfigError::ViewportWidth(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[(ENV_STORE, "redis://x")])),
            Err(ConfigError::Store(_))
        ));
    }
}
