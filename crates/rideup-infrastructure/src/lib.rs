pub mod clock;
pub mod config_service;
pub mod dto;
pub mod json_dir_store;
pub mod local_auth_source;
pub mod memory_store;
pub mod paths;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::json_dir_store::JsonDirDocumentStore;
pub use crate::local_auth_source::LocalAuthSessionSource;
pub use crate::memory_store::InMemoryDocumentStore;
pub use crate::paths::RideupPaths;
