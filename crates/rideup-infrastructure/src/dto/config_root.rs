//! ConfigRoot DTOs and migrations
//!
//! This module defines versioned DTOs for the configuration file (config.toml).
//!
//! - V1.0.0: Flat `collection` and `log_level`
//! - V1.1.0: Added `store_dir` and `log_to_file`
//! - V2.0.0: Grouped into `reconciler` / `logging` tables, added `missing_document_policy`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use rideup_core::config::{LoggingSettings, MissingDocumentPolicy, ReconcilerSettings, RootConfig};
use rideup_core::profile::USERS_COLLECTION;

fn default_collection() -> String {
    USERS_COLLECTION.to_string()
}

fn default_log_level() -> String {
    LoggingSettings::default().level
}

// ============================================================================
// ConfigRoot DTOs
// ============================================================================

/// Configuration V1.0.0 (initial version, flat keys).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct ConfigRootV1_0_0 {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Configuration V1.1.0 (added store location and file logging).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct ConfigRootV1_1_0 {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,
    #[serde(default)]
    pub log_to_file: bool,
}

/// Reconciler table of V2.0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerSectionV2 {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default)]
    pub missing_document_policy: MissingDocumentPolicy,
}

/// Logging table of V2.0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSectionV2 {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub to_file: bool,
}

/// Configuration V2.0.0 (current).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "2.0.0")]
pub struct ConfigRootV2_0_0 {
    pub reconciler: ReconcilerSectionV2,
    pub logging: LoggingSectionV2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<String>,
}

/// Type alias for the latest ConfigRoot version.
pub type ConfigRoot = ConfigRootV2_0_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Adds `store_dir` (unset) and `log_to_file` (off).
impl MigratesTo<ConfigRootV1_1_0> for ConfigRootV1_0_0 {
    fn migrate(self) -> ConfigRootV1_1_0 {
        ConfigRootV1_1_0 {
            collection: self.collection,
            log_level: self.log_level,
            store_dir: None,
            log_to_file: false,
        }
    }
}

/// Groups flat keys into tables; existing installs keep backfilling missing
/// documents.
impl MigratesTo<ConfigRootV2_0_0> for ConfigRootV1_1_0 {
    fn migrate(self) -> ConfigRootV2_0_0 {
        ConfigRootV2_0_0 {
            reconciler: ReconcilerSectionV2 {
                collection: self.collection,
                missing_document_policy: MissingDocumentPolicy::Backfill,
            },
            logging: LoggingSectionV2 {
                level: self.log_level,
                to_file: self.log_to_file,
            },
            store_dir: self.store_dir,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl IntoDomain<RootConfig> for ConfigRootV2_0_0 {
    fn into_domain(self) -> RootConfig {
        RootConfig {
            reconciler: ReconcilerSettings {
                collection: self.reconciler.collection,
                missing_document_policy: self.reconciler.missing_document_policy,
            },
            logging: LoggingSettings {
                level: self.logging.level,
                to_file: self.logging.to_file,
            },
            store_dir: self.store_dir.map(PathBuf::from),
        }
    }
}

impl FromDomain<RootConfig> for ConfigRootV2_0_0 {
    fn from_domain(config: RootConfig) -> Self {
        ConfigRootV2_0_0 {
            reconciler: ReconcilerSectionV2 {
                collection: config.reconciler.collection,
                missing_document_policy: config.reconciler.missing_document_policy,
            },
            logging: LoggingSectionV2 {
                level: config.logging.level,
                to_file: config.logging.to_file,
            },
            store_dir: config
                .store_dir
                .map(|dir| dir.to_string_lossy().into_owned()),
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates and configures a Migrator instance for ConfigRoot.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: Adds `store_dir` and `log_to_file`
/// - V1.1.0 → V2.0.0: Groups settings, adds `missing_document_policy`
/// - V2.0.0 → RootConfig: Converts DTO to domain model
pub fn create_config_root_migrator()
-> Result<version_migrate::Migrator, version_migrate::MigrationError> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let config_path = version_migrate::Migrator::define("config_root")
        .from::<ConfigRootV1_0_0>()
        .step::<ConfigRootV1_1_0>()
        .step::<ConfigRootV2_0_0>()
        .into_with_save::<RootConfig>();

    migrator.register(config_path)?;

    Ok(migrator)
}
