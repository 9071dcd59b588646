use crate::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub manifest: ManifestSettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.manifest.default_domain_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "manifest.default_domain_name must be set",
            ));
        }
        let defaults = &self.storage.process_defaults;
        if defaults.memory_mb <= 0 || defaults.disk_quota_mb <= 0 {
            return Err(ConfigError::validation(
                "storage.process_defaults memory_mb and disk_quota_mb must be > 0",
            ));
        }
        if defaults.timeout_seconds < 0 {
            return Err(ConfigError::validation(
                "storage.process_defaults.timeout_seconds must be >= 0",
            ));
        }
        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(ConfigError::validation(format!(
                "logging.level must be one of {valid_levels:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ManifestSettings {
    /// Domain used for default routes and random routes.
    #[serde(default)]
    pub default_domain_name: String,
    /// Upper bound on a single apply. Zero disables the deadline.
    #[serde(default)]
    pub apply_timeout_ms: u64,
}

impl ManifestSettings {
    pub fn apply_timeout(&self) -> Option<Duration> {
        (self.apply_timeout_ms > 0).then(|| Duration::from_millis(self.apply_timeout_ms))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageSettings {
    #[serde(default)]
    pub process_defaults: ProcessDefaultsConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProcessDefaultsConfig {
    #[serde(default = "default_memory_mb")]
    pub memory_mb: i64,
    #[serde(default = "default_disk_quota_mb")]
    pub disk_quota_mb: i64,
    #[serde(default)]
    pub timeout_seconds: i64,
}

fn default_memory_mb() -> i64 {
    1024
}
fn default_disk_quota_mb() -> i64 {
    1024
}
impl Default for ProcessDefaultsConfig {
    fn default() -> Self {
        Self {
            memory_mb: default_memory_mb(),
            disk_quota_mb: default_disk_quota_mb(),
            timeout_seconds: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            manifest: ManifestSettings {
                default_domain_name: "apps.example.com".into(),
                apply_timeout_ms: 0,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_need_a_domain() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("default_domain_name"));
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut cfg = valid();
        cfg.logging.level = "chatty".into();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_apply_timeout() {
        let mut cfg = valid();
        assert_eq!(cfg.manifest.apply_timeout(), None);
        cfg.manifest.apply_timeout_ms = 1500;
        assert_eq!(
            cfg.manifest.apply_timeout(),
            Some(Duration::from_millis(1500))
        );
    }
}
