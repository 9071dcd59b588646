//! Reads the observed state of one application.

use crate::error::{ManifestError, Result};
use crate::routes::route_record_key;
use cfkube_core::AuthInfo;
use cfkube_storage::{
    AppRecord, ListProcessesMessage, ListServiceBindingsMessage, ListServiceInstancesMessage,
    ProcessRecord, Repositories, RouteRecord, ServiceBindingRecord,
};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument};

/// Snapshot of an application's records for one apply cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    /// `None` when the app does not exist yet.
    pub app: Option<AppRecord>,
    /// Keyed by process type.
    pub processes: HashMap<String, ProcessRecord>,
    /// Keyed by canonical route key.
    pub routes: HashMap<String, RouteRecord>,
    /// Keyed by service instance name.
    pub service_bindings: HashMap<String, ServiceBindingRecord>,
}

impl AppState {
    pub fn for_app(app: AppRecord) -> Self {
        Self {
            app: Some(app),
            ..Default::default()
        }
    }

    pub fn exists(&self) -> bool {
        self.app.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct StateCollector {
    repositories: Repositories,
}

impl StateCollector {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    /// Collects the app and everything attached to it. A missing app yields
    /// an empty state rather than an error.
    #[instrument(skip(self, auth))]
    pub async fn collect_state(
        &self,
        auth: &AuthInfo,
        app_name: &str,
        space_guid: &str,
    ) -> Result<AppState> {
        let app = match self
            .repositories
            .apps
            .get_app_by_name_and_space(auth, app_name, space_guid)
            .await
        {
            Ok(app) => app,
            Err(err) if err.is_not_found() => {
                debug!(app_name, space_guid, "App does not exist yet");
                return Ok(AppState::default());
            }
            Err(err) => return Err(ManifestError::forbidden_as_not_found(err)),
        };

        let processes = self.index_processes_by_type(auth, &app).await?;
        let routes = self.index_routes_by_key(auth, &app).await?;
        let service_bindings = self.index_bindings_by_service_name(auth, &app).await?;

        debug!(
            app_guid = %app.guid,
            processes = processes.len(),
            routes = routes.len(),
            service_bindings = service_bindings.len(),
            "Collected app state"
        );

        Ok(AppState {
            app: Some(app),
            processes,
            routes,
            service_bindings,
        })
    }

    async fn index_processes_by_type(
        &self,
        auth: &AuthInfo,
        app: &AppRecord,
    ) -> Result<HashMap<String, ProcessRecord>> {
        let processes = self
            .repositories
            .processes
            .list_processes(
                auth,
                ListProcessesMessage {
                    app_guids: vec![app.guid.clone()],
                    space_guids: vec![app.space_guid.clone()],
                },
            )
            .await?;

        Ok(processes
            .into_iter()
            .map(|process| (process.process_type.clone(), process))
            .collect())
    }

    async fn index_routes_by_key(
        &self,
        auth: &AuthInfo,
        app: &AppRecord,
    ) -> Result<HashMap<String, RouteRecord>> {
        let routes = self
            .repositories
            .routes
            .list_routes_for_app(auth, &app.guid, &app.space_guid)
            .await?;

        Ok(routes
            .into_iter()
            .map(|route| (route_record_key(&route), route))
            .collect())
    }

    async fn index_bindings_by_service_name(
        &self,
        auth: &AuthInfo,
        app: &AppRecord,
    ) -> Result<HashMap<String, ServiceBindingRecord>> {
        let bindings = self
            .repositories
            .service_bindings
            .list_service_bindings(
                auth,
                ListServiceBindingsMessage {
                    app_guids: vec![app.guid.clone()],
                    ..Default::default()
                },
            )
            .await?;
        if bindings.is_empty() {
            return Ok(HashMap::new());
        }

        let mut seen = HashSet::new();
        let instance_guids: Vec<String> = bindings
            .iter()
            .map(|binding| binding.service_instance_guid.clone())
            .filter(|guid| seen.insert(guid.clone()))
            .collect();

        let instances = self
            .repositories
            .service_instances
            .list_service_instances(
                auth,
                ListServiceInstancesMessage {
                    guids: instance_guids,
                    ..Default::default()
                },
            )
            .await?;
        let names_by_guid: HashMap<&str, &str> = instances
            .iter()
            .map(|instance| (instance.guid.as_str(), instance.name.as_str()))
            .collect();

        bindings
            .into_iter()
            .map(|binding| {
                let name = names_by_guid
                    .get(binding.service_instance_guid.as_str())
                    .ok_or_else(|| {
                        ManifestError::internal(format!(
                            "no service instance found with guid {:?} for service binding {:?}",
                            binding.service_instance_guid, binding.guid
                        ))
                    })?;
                Ok((name.to_string(), binding))
            })
            .collect()
    }
}
