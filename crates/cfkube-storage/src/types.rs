//! Record and message types for the repository abstraction layer.
//!
//! Records are what the stores return; messages are what callers send to
//! create or change records.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use time::OffsetDateTime;

pub const APP_RESOURCE_TYPE: &str = "App";
pub const DOMAIN_RESOURCE_TYPE: &str = "Domain";
pub const PROCESS_RESOURCE_TYPE: &str = "Process";
pub const ROUTE_RESOURCE_TYPE: &str = "Route";
pub const SERVICE_INSTANCE_RESOURCE_TYPE: &str = "Service Instance";
pub const SERVICE_BINDING_RESOURCE_TYPE: &str = "Service Binding";

/// The process type that receives route traffic.
pub const PROCESS_TYPE_WEB: &str = "web";

fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

// ==================== Metadata ====================

/// Labels and annotations attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub labels: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub annotations: HashMap<String, String>,
}

impl Metadata {
    /// Applies a patch: `Some` sets the key, `None` removes it, keys absent
    /// from the patch are left untouched.
    pub fn apply_patch(&mut self, patch: &MetadataPatch) {
        apply_patch_map(&mut self.labels, &patch.labels);
        apply_patch_map(&mut self.annotations, &patch.annotations);
    }
}

fn apply_patch_map(target: &mut HashMap<String, String>, patch: &HashMap<String, Option<String>>) {
    for (key, value) in patch {
        match value {
            Some(value) => {
                target.insert(key.clone(), value.clone());
            }
            None => {
                target.remove(key);
            }
        }
    }
}

/// Three-way metadata patch. A present-but-`None` value removes the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataPatch {
    #[serde(default)]
    pub labels: HashMap<String, Option<String>>,
    #[serde(default)]
    pub annotations: HashMap<String, Option<String>>,
}

impl MetadataPatch {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.annotations.is_empty()
    }

    /// Metadata for a record that does not exist yet: removals are dropped.
    pub fn to_metadata(&self) -> Metadata {
        let mut metadata = Metadata::default();
        metadata.apply_patch(self);
        metadata
    }
}

// ==================== Apps ====================

/// Desired run state of an app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DesiredState {
    #[default]
    Stopped,
    Started,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleType {
    #[default]
    Buildpack,
    Docker,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    #[serde(rename = "type", default)]
    pub lifecycle_type: LifecycleType,
    #[serde(default)]
    pub buildpacks: Vec<String>,
    #[serde(default)]
    pub stack: String,
}

impl Lifecycle {
    pub fn buildpack(buildpacks: Vec<String>) -> Self {
        Self {
            lifecycle_type: LifecycleType::Buildpack,
            buildpacks,
            stack: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppRecord {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    #[serde(default)]
    pub state: DesiredState,
    #[serde(default)]
    pub lifecycle: Lifecycle,
    #[serde(default)]
    pub env_vars: HashMap<String, String>,
    #[serde(default)]
    pub metadata: Metadata,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateAppMessage {
    pub name: String,
    pub space_guid: String,
    pub state: DesiredState,
    pub lifecycle: Lifecycle,
    pub env_vars: HashMap<String, String>,
    pub metadata: Metadata,
}

/// Changes to an existing app. `None` leaves the field untouched; `Some`
/// replaces it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatchAppMessage {
    pub app_guid: String,
    pub space_guid: String,
    pub buildpacks: Option<Vec<String>>,
    pub env_vars: Option<HashMap<String, String>>,
    pub metadata: MetadataPatch,
}

// ==================== Domains ====================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRecord {
    pub guid: String,
    pub name: String,
    #[serde(default)]
    pub namespace: String,
}

// ==================== Processes ====================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheckData {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub http_endpoint: String,
    #[serde(default)]
    pub invocation_timeout_seconds: i64,
    #[serde(default)]
    pub timeout_seconds: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
    #[serde(rename = "type", default)]
    pub check_type: String,
    #[serde(default)]
    pub data: HealthCheckData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub guid: String,
    pub space_guid: String,
    pub app_guid: String,
    #[serde(rename = "type")]
    pub process_type: String,
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub desired_instances: i32,
    #[serde(default)]
    pub memory_mb: i64,
    #[serde(default)]
    pub disk_quota_mb: i64,
    #[serde(default)]
    pub health_check: HealthCheck,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub updated_at: OffsetDateTime,
}

/// Filter for listing processes. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListProcessesMessage {
    pub app_guids: Vec<String>,
    pub space_guids: Vec<String>,
}

/// A new process. Unset memory and disk quota, and a zero health-check
/// timeout, are filled in by the store's process defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProcessMessage {
    pub app_guid: String,
    pub space_guid: String,
    pub process_type: String,
    pub command: String,
    pub desired_instances: i32,
    pub memory_mb: Option<i64>,
    pub disk_quota_mb: Option<i64>,
    pub health_check: HealthCheck,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchProcessMessage {
    pub process_guid: String,
    pub space_guid: String,
    pub command: Option<String>,
    pub desired_instances: Option<i32>,
    pub memory_mb: Option<i64>,
    pub disk_quota_mb: Option<i64>,
    pub health_check_type: Option<String>,
    pub health_check_http_endpoint: Option<String>,
    pub health_check_invocation_timeout_seconds: Option<i64>,
    pub health_check_timeout_seconds: Option<i64>,
}

// ==================== Routes ====================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestinationRecord {
    pub guid: String,
    pub app_guid: String,
    pub process_type: String,
    pub port: i32,
    pub protocol: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub guid: String,
    pub space_guid: String,
    pub domain: DomainRecord,
    #[serde(default)]
    pub host: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub destinations: Vec<DestinationRecord>,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRouteMessage {
    pub host: String,
    pub path: String,
    pub space_guid: String,
    pub domain_guid: String,
    pub domain_namespace: String,
    pub domain_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesiredDestination {
    pub app_guid: String,
    pub process_type: String,
    pub port: i32,
    pub protocol: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddDestinationsMessage {
    pub route_guid: String,
    pub space_guid: String,
    /// The destination list the caller observed; the new destinations are
    /// appended to it.
    pub existing_destinations: Vec<DestinationRecord>,
    pub new_destinations: Vec<DesiredDestination>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveDestinationMessage {
    pub route_guid: String,
    pub space_guid: String,
    /// GUID of the destination to remove.
    pub guid: String,
}

// ==================== Services ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceInstanceType {
    #[default]
    UserProvided,
    Managed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstanceRecord {
    pub guid: String,
    pub name: String,
    pub space_guid: String,
    #[serde(rename = "type", default)]
    pub instance_type: ServiceInstanceType,
}

/// Filter for listing service instances. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListServiceInstancesMessage {
    pub names: Vec<String>,
    pub guids: Vec<String>,
    pub space_guids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceBindingType {
    #[default]
    App,
    Key,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceBindingRecord {
    pub guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub binding_type: ServiceBindingType,
    pub app_guid: String,
    pub service_instance_guid: String,
    pub space_guid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
    #[serde(with = "time::serde::rfc3339", default = "now")]
    pub created_at: OffsetDateTime,
}

/// Filter for listing service bindings. Empty lists do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListServiceBindingsMessage {
    pub app_guids: Vec<String>,
    pub service_instance_guids: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateServiceBindingMessage {
    pub binding_type: ServiceBindingType,
    pub name: Option<String>,
    pub service_instance_guid: String,
    pub app_guid: String,
    pub space_guid: String,
    pub parameters: Option<Value>,
}
