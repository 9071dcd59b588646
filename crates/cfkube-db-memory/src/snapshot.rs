//! Whole-store snapshots.
//!
//! A snapshot is a plain serde document listing every record in the store.
//! The CLI loads one before applying a manifest and optionally writes the
//! result back, which makes the in-memory store usable across invocations.

use crate::storage::{InMemoryStore, ProcessDefaults};
use cfkube_storage::{
    AppRecord, DomainRecord, ProcessRecord, RouteRecord, ServiceBindingRecord,
    ServiceInstanceRecord,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML snapshot: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid JSON snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Serialized form of an [`InMemoryStore`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub domains: Vec<DomainRecord>,
    #[serde(default)]
    pub apps: Vec<AppRecord>,
    #[serde(default)]
    pub processes: Vec<ProcessRecord>,
    #[serde(default)]
    pub routes: Vec<RouteRecord>,
    #[serde(default)]
    pub service_instances: Vec<ServiceInstanceRecord>,
    #[serde(default)]
    pub service_bindings: Vec<ServiceBindingRecord>,
}

impl StoreSnapshot {
    pub fn from_yaml(input: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_json(input: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_yaml(&self) -> Result<String, SnapshotError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reads a snapshot file. Files ending in `.json` are parsed as JSON,
    /// anything else as YAML.
    pub fn read_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })?;
        if is_json(path) {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    pub fn write_file(&self, path: &Path) -> Result<(), SnapshotError> {
        let content = if is_json(path) {
            self.to_json()?
        } else {
            self.to_yaml()?
        };
        std::fs::write(path, content).map_err(|source| SnapshotError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

impl InMemoryStore {
    pub fn from_snapshot(snapshot: StoreSnapshot, process_defaults: ProcessDefaults) -> Self {
        let store = Self::with_process_defaults(process_defaults);
        for domain in snapshot.domains {
            store.insert_domain(domain);
        }
        for app in snapshot.apps {
            store.insert_app(app);
        }
        for process in snapshot.processes {
            store.insert_process(process);
        }
        for route in snapshot.routes {
            store.insert_route(route);
        }
        for instance in snapshot.service_instances {
            store.insert_service_instance(instance);
        }
        for binding in snapshot.service_bindings {
            store.insert_service_binding(binding);
        }
        store
    }

    /// Captures every record, ordered by GUID so repeated snapshots of the
    /// same state are identical.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            domains: sorted(&self.domains, |r| &r.guid),
            apps: sorted(&self.apps, |r| &r.guid),
            processes: sorted(&self.processes, |r| &r.guid),
            routes: sorted(&self.routes, |r| &r.guid),
            service_instances: sorted(&self.service_instances, |r| &r.guid),
            service_bindings: sorted(&self.service_bindings, |r| &r.guid),
        }
    }
}

fn sorted<R: Clone>(
    map: &papaya::HashMap<String, R>,
    key: impl Fn(&R) -> &String,
) -> Vec<R> {
    let mut records: Vec<R> = map.pin().iter().map(|(_, r)| r.clone()).collect();
    records.sort_by(|a, b| key(a).cmp(key(b)));
    records
}
