//! Manifest documents and their translation into store messages.
//!
//! Field names follow the manifest format authors write by hand, which mixes
//! kebab-case (`health-check-type`, `no-route`) with snake_case
//! (`disk_quota`, `binding_name`).

use crate::error::{ManifestError, Result};
use cfkube_core::to_megabytes;
use cfkube_storage::{
    CreateAppMessage, CreateProcessMessage, DesiredState, HealthCheck, HealthCheckData, Lifecycle,
    MetadataPatch, PROCESS_TYPE_WEB, PatchAppMessage, PatchProcessMessage,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

const HEALTH_CHECK_TYPE_NONE: &str = "none";
const HEALTH_CHECK_TYPE_PROCESS: &str = "process";
const HEALTH_CHECK_TYPE_PORT: &str = "port";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i32>,
    #[serde(default)]
    pub applications: Vec<ManifestApplication>,
}

impl Manifest {
    pub fn from_yaml(input: &str) -> std::result::Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(input)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestApplication {
    pub name: String,
    #[serde(
        default,
        deserialize_with = "deserialize_env",
        skip_serializing_if = "Option::is_none"
    )]
    pub env: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpacks: Option<Vec<String>>,
    /// Deprecated single-buildpack form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildpack: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_quota: Option<String>,
    /// Legacy spelling of `disk_quota`.
    #[serde(
        rename = "disk-quota",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_disk_quota: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(
        rename = "health-check-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_type: Option<String>,
    #[serde(
        rename = "health-check-http-endpoint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_http_endpoint: Option<String>,
    #[serde(
        rename = "health-check-invocation-timeout",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_invocation_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(rename = "default-route", default)]
    pub default_route: bool,
    #[serde(rename = "random-route", default)]
    pub random_route: bool,
    #[serde(rename = "no-route", default)]
    pub no_route: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<ManifestRoute>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub processes: Vec<ManifestApplicationProcess>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub services: Vec<ManifestApplicationService>,
    #[serde(default)]
    pub metadata: MetadataPatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestApplicationProcess {
    #[serde(rename = "type")]
    pub process_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk_quota: Option<String>,
    #[serde(
        rename = "disk-quota",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub alt_disk_quota: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instances: Option<i32>,
    #[serde(
        rename = "health-check-type",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_type: Option<String>,
    #[serde(
        rename = "health-check-http-endpoint",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_http_endpoint: Option<String>,
    #[serde(
        rename = "health-check-invocation-timeout",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub health_check_invocation_timeout: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRoute {
    pub route: String,
}

impl ManifestRoute {
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

/// A service reference. Accepts either a bare name or a map with
/// `name`, `binding_name` and `parameters`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ManifestApplicationService {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl ManifestApplicationService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ServiceReference {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        binding_name: Option<String>,
        #[serde(default)]
        parameters: Option<Value>,
    },
}

impl<'de> Deserialize<'de> for ManifestApplicationService {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match ServiceReference::deserialize(deserializer)? {
            ServiceReference::Name(name) => Self::new(name),
            ServiceReference::Full {
                name,
                binding_name,
                parameters,
            } => Self {
                name,
                binding_name,
                parameters,
            },
        })
    }
}

/// Env values may be written as YAML scalars of any type; they are stored as
/// strings.
fn deserialize_env<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<HashMap<String, String>>, D::Error> {
    let raw: Option<HashMap<String, Value>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|env| {
        env.into_iter()
            .map(|(key, value)| {
                let value = match value {
                    Value::String(s) => s,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (key, value)
            })
            .collect()
    }))
}

fn megabytes(field: &str, quantity: Option<&String>) -> Result<Option<i64>> {
    quantity
        .map(|q| {
            to_megabytes(q).map_err(|err| ManifestError::UnprocessableEntity {
                message: format!("{field}: {err}"),
                source: Some(Box::new(err)),
            })
        })
        .transpose()
}

/// `none` is the legacy spelling of the `process` health check.
fn health_check_type(check_type: Option<&String>) -> Option<String> {
    check_type.map(|t| {
        if t == HEALTH_CHECK_TYPE_NONE {
            HEALTH_CHECK_TYPE_PROCESS.to_string()
        } else {
            t.clone()
        }
    })
}

impl ManifestApplication {
    pub fn to_app_create_message(&self, space_guid: &str) -> CreateAppMessage {
        CreateAppMessage {
            name: self.name.clone(),
            space_guid: space_guid.to_string(),
            state: DesiredState::Stopped,
            lifecycle: Lifecycle::buildpack(self.buildpacks.clone().unwrap_or_default()),
            env_vars: self.env.clone().unwrap_or_default(),
            metadata: self.metadata.to_metadata(),
        }
    }

    pub fn to_app_patch_message(&self, app_guid: &str, space_guid: &str) -> PatchAppMessage {
        PatchAppMessage {
            app_guid: app_guid.to_string(),
            space_guid: space_guid.to_string(),
            buildpacks: self.buildpacks.clone(),
            env_vars: self.env.clone(),
            metadata: self.metadata.clone(),
        }
    }
}

impl ManifestApplicationProcess {
    pub fn new(process_type: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
            ..Default::default()
        }
    }

    fn is_web(&self) -> bool {
        self.process_type == PROCESS_TYPE_WEB
    }

    fn disk_quota_field(&self) -> (&str, Option<&String>) {
        match (&self.disk_quota, &self.alt_disk_quota) {
            (Some(quota), _) => ("disk_quota", Some(quota)),
            (None, Some(quota)) => ("disk-quota", Some(quota)),
            (None, None) => ("disk_quota", None),
        }
    }

    /// Builds a create message. Unset instances and health-check type take
    /// the defaults for the process type: web processes get one instance and
    /// a port check, everything else zero instances and a process check.
    pub fn to_process_create_message(
        &self,
        app_guid: &str,
        space_guid: &str,
    ) -> Result<CreateProcessMessage> {
        let (disk_field, disk_quota) = self.disk_quota_field();
        let default_check_type = if self.is_web() {
            HEALTH_CHECK_TYPE_PORT
        } else {
            HEALTH_CHECK_TYPE_PROCESS
        };

        Ok(CreateProcessMessage {
            app_guid: app_guid.to_string(),
            space_guid: space_guid.to_string(),
            process_type: self.process_type.clone(),
            command: self.command.clone().unwrap_or_default(),
            desired_instances: self.instances.unwrap_or(if self.is_web() { 1 } else { 0 }),
            memory_mb: megabytes("memory", self.memory.as_ref())?,
            disk_quota_mb: megabytes(disk_field, disk_quota)?,
            health_check: HealthCheck {
                check_type: health_check_type(self.health_check_type.as_ref())
                    .unwrap_or_else(|| default_check_type.to_string()),
                data: HealthCheckData {
                    http_endpoint: self.health_check_http_endpoint.clone().unwrap_or_default(),
                    invocation_timeout_seconds: self.health_check_invocation_timeout.unwrap_or(0),
                    timeout_seconds: self.timeout.unwrap_or(0),
                },
            },
        })
    }

    pub fn to_process_patch_message(
        &self,
        process_guid: &str,
        space_guid: &str,
    ) -> Result<PatchProcessMessage> {
        let (disk_field, disk_quota) = self.disk_quota_field();
        Ok(PatchProcessMessage {
            process_guid: process_guid.to_string(),
            space_guid: space_guid.to_string(),
            command: self.command.clone(),
            desired_instances: self.instances,
            memory_mb: megabytes("memory", self.memory.as_ref())?,
            disk_quota_mb: megabytes(disk_field, disk_quota)?,
            health_check_type: health_check_type(self.health_check_type.as_ref()),
            health_check_http_endpoint: self.health_check_http_endpoint.clone(),
            health_check_invocation_timeout_seconds: self.health_check_invocation_timeout,
            health_check_timeout_seconds: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    const MANIFEST: &str = r#"
version: 1
applications:
  - name: my-app
    buildpack: ruby_buildpack
    memory: 512M
    disk-quota: 1G
    env:
      GREETING: hello
      PORT: 8080
      DEBUG: true
    routes:
      - route: my-app.apps.example.com/api
    processes:
      - type: worker
        command: bundle exec work
        health-check-type: none
    services:
      - db
      - name: cache
        binding_name: redis
        parameters:
          pool: 5
    metadata:
      labels:
        team: core
        stale: null
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = Manifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(manifest.version, Some(1));
        let app = &manifest.applications[0];

        assert_eq!(app.name, "my-app");
        assert_eq!(app.buildpack.as_deref(), Some("ruby_buildpack"));
        assert_eq!(app.alt_disk_quota.as_deref(), Some("1G"));
        assert!(app.disk_quota.is_none());

        let env = app.env.as_ref().unwrap();
        assert_eq!(env["PORT"], "8080");
        assert_eq!(env["DEBUG"], "true");

        assert_eq!(app.routes[0].route, "my-app.apps.example.com/api");
        assert_eq!(app.processes[0].process_type, "worker");
        assert_eq!(app.services[0], ManifestApplicationService::new("db"));
        assert_eq!(app.services[1].binding_name.as_deref(), Some("redis"));
        assert_eq!(
            app.services[1].parameters,
            Some(serde_json::json!({"pool": 5}))
        );
        assert_eq!(app.metadata.labels["team"], Some("core".to_string()));
        assert_eq!(app.metadata.labels["stale"], None);
    }

    #[test]
    fn test_process_create_message_with_all_fields() {
        let process = ManifestApplicationProcess {
            process_type: "web".into(),
            command: Some("start-web.sh".into()),
            disk_quota: Some("512M".into()),
            health_check_http_endpoint: Some("/stuff".into()),
            health_check_invocation_timeout: Some(90),
            health_check_type: Some("http".into()),
            instances: Some(3),
            memory: Some("1G".into()),
            timeout: Some(60),
            ..Default::default()
        };

        let message = process
            .to_process_create_message("the-app-guid", "the-space-guid")
            .unwrap();

        assert_eq!(
            message,
            CreateProcessMessage {
                app_guid: "the-app-guid".into(),
                space_guid: "the-space-guid".into(),
                process_type: "web".into(),
                command: "start-web.sh".into(),
                desired_instances: 3,
                memory_mb: Some(1024),
                disk_quota_mb: Some(512),
                health_check: HealthCheck {
                    check_type: "http".into(),
                    data: HealthCheckData {
                        http_endpoint: "/stuff".into(),
                        invocation_timeout_seconds: 90,
                        timeout_seconds: 60,
                    },
                },
            }
        );
    }

    #[test]
    fn test_process_create_message_type_defaults() {
        let web = ManifestApplicationProcess::new("web")
            .to_process_create_message("app", "space")
            .unwrap();
        assert_eq!(web.desired_instances, 1);
        assert_eq!(web.health_check.check_type, "port");
        assert_eq!(web.memory_mb, None);

        let worker = ManifestApplicationProcess::new("worker")
            .to_process_create_message("app", "space")
            .unwrap();
        assert_eq!(worker.desired_instances, 0);
        assert_eq!(worker.health_check.check_type, "process");
    }

    #[test]
    fn test_none_health_check_becomes_process() {
        let process = ManifestApplicationProcess {
            health_check_type: Some("none".into()),
            ..ManifestApplicationProcess::new("web")
        };

        let create = process.to_process_create_message("app", "space").unwrap();
        assert_eq!(create.health_check.check_type, "process");

        let patch = process.to_process_patch_message("proc", "space").unwrap();
        assert_eq!(patch.health_check_type.as_deref(), Some("process"));
    }

    #[test]
    fn test_process_patch_message_leaves_unset_fields_alone() {
        let process = ManifestApplicationProcess {
            alt_disk_quota: Some("1G".into()),
            ..ManifestApplicationProcess::new("web")
        };

        let patch = process.to_process_patch_message("proc", "space").unwrap();
        assert_eq!(patch.disk_quota_mb, Some(1024));
        assert_eq!(patch.memory_mb, None);
        assert_eq!(patch.desired_instances, None);
        assert_eq!(patch.health_check_type, None);
        assert_eq!(patch.command, None);
    }

    #[test]
    fn test_bad_quantity_is_unprocessable() {
        let process = ManifestApplicationProcess {
            memory: Some("lots".into()),
            ..ManifestApplicationProcess::new("web")
        };

        let err = process
            .to_process_create_message("app", "space")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnprocessableEntity);
        assert!(err.to_string().contains("memory"));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_app_messages() {
        let mut app = ManifestApplication {
            name: "my-app".into(),
            buildpacks: Some(vec!["go_buildpack".into()]),
            env: Some([("A".to_string(), "1".to_string())].into()),
            ..Default::default()
        };
        app.metadata.labels.insert("team".into(), Some("core".into()));
        app.metadata.labels.insert("old".into(), None);

        let create = app.to_app_create_message("space-1");
        assert_eq!(create.state, DesiredState::Stopped);
        assert_eq!(create.lifecycle.buildpacks, vec!["go_buildpack".to_string()]);
        assert_eq!(create.metadata.labels.len(), 1);

        let patch = app.to_app_patch_message("app-1", "space-1");
        assert_eq!(patch.buildpacks, Some(vec!["go_buildpack".to_string()]));
        assert_eq!(patch.metadata.labels.get("old"), Some(&None));
    }
}
