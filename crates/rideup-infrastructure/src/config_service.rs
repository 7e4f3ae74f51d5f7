//! Configuration service implementation.
//!
//! Loads the root configuration from config.toml through version-migrate's
//! FileStorage, migrating files written by older versions on the way in.

use crate::dto::create_config_root_migrator;
use crate::paths::RideupPaths;
use rideup_core::config::RootConfig;
use rideup_core::error::Result;
use std::path::{Path, PathBuf};
use version_migrate::{FileStorage, FileStorageStrategy, FormatStrategy, LoadBehavior};

const CONFIG_ENTITY: &str = "config_root";

/// Configuration service bound to one config file.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    /// Creates a service reading and writing `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Creates a service for the platform config file (`~/.config/rideup/config.toml`).
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(RideupPaths::config_file()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration, writing defaults if the file does not exist.
    pub fn load(&self) -> Result<RootConfig> {
        let mut storage = self.open()?;
        let configs: Vec<RootConfig> = storage.query(CONFIG_ENTITY)?;

        match configs.into_iter().next() {
            Some(config) => Ok(config),
            None => {
                let default_config = RootConfig::default();
                storage.update_and_save(CONFIG_ENTITY, vec![default_config.clone()])?;
                tracing::info!(
                    "[ConfigService] Wrote default configuration to {}",
                    self.path.display()
                );
                Ok(default_config)
            }
        }
    }

    /// Persists `config` in the current schema version.
    pub fn save(&self, config: &RootConfig) -> Result<()> {
        let mut storage = self.open()?;
        storage.update_and_save(CONFIG_ENTITY, vec![config.clone()])?;
        Ok(())
    }

    fn open(&self) -> Result<FileStorage> {
        let migrator = create_config_root_migrator()?;
        let strategy = FileStorageStrategy::new()
            .with_format(FormatStrategy::Toml)
            .with_load_behavior(LoadBehavior::CreateIfMissing);

        Ok(FileStorage::new(self.path.clone(), migrator, strategy)?)
    }
}
