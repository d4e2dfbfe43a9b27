#![forbid(unsafe_code)]

pub mod app_services;
pub mod config;
pub mod content;
pub mod controller;
pub mod error;
pub mod preferences_service;
pub mod progress_store;
pub mod view;

pub use app_services::AppServices;
pub use config::AppConfig;
pub use controller::{IntentOutcome, ProgressUpdate, RoadmapController, RoadmapIntent};
pub use error::{AppServicesError, CatalogError, ConfigError, RoadmapLoadError};
pub use preferences_service::PreferencesService;
pub use progress_store::ProgressStore;
pub use view::{EdgeView, NodeView, RoadmapView, TopicDetail, VideoRow};
