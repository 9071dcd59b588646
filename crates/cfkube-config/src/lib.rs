//! Configuration for the cfkube manifest engine.
//!
//! Settings come from an optional TOML file overlaid with `CFKUBE__*`
//! environment variables:
//!
//! ```text
//!   cfkube.toml ──► CFKUBE__MANIFEST__* env ──► validate() ──► AppConfig
//! ```

mod app_config;
pub mod loader;

pub use app_config::{
    AppConfig, LoggingConfig, ManifestSettings, ProcessDefaultsConfig, StorageSettings,
};

/// Error types for configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl ConfigError {
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
