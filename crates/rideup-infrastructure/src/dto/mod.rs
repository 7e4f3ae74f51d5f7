//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of files this crate owns. They
//! are private to the infrastructure layer and handle the evolution of the
//! storage format over time.
//!
//! Profile documents are not versioned here: they are schemaless and are
//! upgraded in place by the reconciler's backfill patch.
//!
//! ### ConfigRoot Version History
//! - **1.0.0**: Flat `collection` and `log_level`
//! - **1.1.0**: Added `store_dir` and `log_to_file`
//! - **2.0.0**: Grouped into tables, added `missing_document_policy`

mod config_root;

pub use config_root::{
    ConfigRoot, ConfigRootV1_0_0, ConfigRootV1_1_0, ConfigRootV2_0_0, LoggingSectionV2,
    ReconcilerSectionV2, create_config_root_migrator,
};
