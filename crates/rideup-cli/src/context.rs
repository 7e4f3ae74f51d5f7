//! Wiring shared by every command.

use anyhow::{Context, Result};
use rideup_application::{ProfileReconciler, ProfileService};
use rideup_core::config::RootConfig;
use rideup_infrastructure::{ConfigService, JsonDirDocumentStore};
use std::path::PathBuf;
use std::sync::Arc;

pub struct AppContext {
    pub config_service: ConfigService,
    pub config: RootConfig,
    pub store: Arc<JsonDirDocumentStore>,
    /// True when this run wrote the default config file.
    pub created_config: bool,
}

impl AppContext {
    pub fn load(config_path: Option<PathBuf>, store_dir: Option<PathBuf>) -> Result<Self> {
        let config_service = match config_path {
            Some(path) => ConfigService::new(path),
            None => ConfigService::default_location()?,
        };
        let created_config = !config_service.path().exists();
        let config = config_service.load().with_context(|| {
            format!(
                "Failed to load configuration from {}",
                config_service.path().display()
            )
        })?;

        let store = match resolve_store_dir(store_dir, &config) {
            Some(root) => JsonDirDocumentStore::new(root),
            None => JsonDirDocumentStore::default_location()?,
        };
        Ok(Self {
            config_service,
            config,
            store: Arc::new(store),
            created_config,
        })
    }

    /// Reports where configuration and documents come from.
    ///
    /// Runs once logging is up, since loading happens before the subscriber exists.
    pub fn log_startup(&self) {
        let config_path = self.config_service.path().display();
        if self.created_config {
            tracing::info!("[Config] Wrote default configuration to {}", config_path);
        } else {
            tracing::debug!("[Config] Loaded configuration from {}", config_path);
        }
        tracing::debug!("[Config] Document store at {}", self.store.root().display());
    }

    pub fn reconciler(&self) -> ProfileReconciler {
        ProfileReconciler::new(self.store.clone(), self.config.reconciler.clone())
    }

    pub fn profiles(&self) -> ProfileService {
        ProfileService::with_collection(self.store.clone(), self.config.reconciler.collection.clone())
    }
}

/// Command-line flag first, then the config file. `None` means the platform data dir.
fn resolve_store_dir(flag: Option<PathBuf>, config: &RootConfig) -> Option<PathBuf> {
    flag.or_else(|| config.store_dir.clone())
}
