//! Configuration domain models.
//!
//! These are version-agnostic; the persisted, versioned form lives in the
//! infrastructure crate's DTOs.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use version_migrate::DeriveQueryable as Queryable;

use crate::profile::USERS_COLLECTION;

/// What the reconciler does when a signed-in user has no profile document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingDocumentPolicy {
    /// Reconcile as if the document were empty, writing a partial document.
    #[default]
    Backfill,
    /// Leave creation to the signup flow and write nothing.
    Skip,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcilerSettings {
    /// Collection holding profile documents.
    pub collection: String,
    #[serde(default)]
    pub missing_document_policy: MissingDocumentPolicy,
}

impl Default for ReconcilerSettings {
    fn default() -> Self {
        Self {
            collection: USERS_COLLECTION.to_string(),
            missing_document_policy: MissingDocumentPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`.
    pub level: String,
    /// Also write daily-rotated log files under the logs directory.
    #[serde(default)]
    pub to_file: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            to_file: false,
        }
    }
}

/// Root configuration loaded from `config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, Queryable)]
#[queryable(entity = "config_root")]
pub struct RootConfig {
    #[serde(default)]
    pub reconciler: ReconcilerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    /// Overrides the default JSON document store directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_dir: Option<PathBuf>,
}
