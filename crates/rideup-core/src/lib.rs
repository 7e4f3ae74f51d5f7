pub mod auth;
pub mod config;
pub mod error;
pub mod profile;

// Re-export common error type
pub use error::RideupError;
