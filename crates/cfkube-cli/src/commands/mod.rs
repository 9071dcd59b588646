pub mod apply;
pub mod state;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use cfkube_config::AppConfig;
use cfkube_db_memory::{InMemoryStore, ProcessDefaults, StoreSnapshot};
use cfkube_manifest::Manifest;

fn read_manifest(path: Option<&Path>) -> Result<Manifest> {
    let content = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read manifest from stdin")?;
            buf
        }
    };
    Manifest::from_yaml(&content).context("Invalid manifest")
}

fn process_defaults(cfg: &AppConfig) -> ProcessDefaults {
    let defaults = &cfg.storage.process_defaults;
    ProcessDefaults {
        memory_mb: defaults.memory_mb,
        disk_quota_mb: defaults.disk_quota_mb,
        timeout_seconds: defaults.timeout_seconds,
    }
}

/// Loads the store from a snapshot. Without one, starts from an empty store
/// that only knows the configured default domain.
fn open_store(path: Option<&Path>, cfg: &AppConfig) -> Result<InMemoryStore> {
    match path {
        Some(path) => {
            let snapshot = StoreSnapshot::read_file(path)
                .with_context(|| format!("Failed to load state: {}", path.display()))?;
            Ok(InMemoryStore::from_snapshot(snapshot, process_defaults(cfg)))
        }
        None => {
            let store = InMemoryStore::with_process_defaults(process_defaults(cfg));
            store.add_domain(cfg.manifest.default_domain_name.clone());
            Ok(store)
        }
    }
}
