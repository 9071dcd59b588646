use crate::{AppConfig, ConfigError, Result};
use config::{Config, Environment, File};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "cfkube.toml";
pub const ENV_PREFIX: &str = "CFKUBE";

pub fn load_config(path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();
    let pathbuf = PathBuf::from(path.unwrap_or(DEFAULT_CONFIG_PATH));
    if pathbuf.exists() {
        builder = builder.add_source(File::from(pathbuf));
    }
    // Environment variable overrides, e.g., CFKUBE__MANIFEST__DEFAULT_DOMAIN_NAME=apps.example.com
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .separator("__"),
    );
    let cfg = builder
        .build()
        .map_err(|e| ConfigError::parse(format!("config build error: {e}")))?;
    let merged: AppConfig = cfg
        .try_deserialize()
        .map_err(|e| ConfigError::parse(format!("config deserialize error: {e}")))?;
    merged.validate()?;
    Ok(merged)
}

pub fn load_config_with_default_path<P: AsRef<Path>>(path: Option<P>) -> Result<AppConfig> {
    let p = path
        .as_ref()
        .map(|p| p.as_ref().to_string_lossy().to_string());
    load_config(p.as_deref())
}
