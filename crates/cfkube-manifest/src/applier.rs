//! Converges one application's stored records to a normalized manifest.
//!
//! Phases run in order (app, processes, routes, services). The first failure
//! stops the remaining phases; completed phases are not rolled back.

use crate::error::{ManifestError, Result};
use crate::payloads::{ManifestApplication, ManifestApplicationService};
use crate::routes::split_route;
use crate::state_collector::AppState;
use cfkube_core::AuthInfo;
use cfkube_storage::{
    AddDestinationsMessage, AppRecord, CreateRouteMessage, CreateServiceBindingMessage,
    DesiredDestination, ListServiceInstancesMessage, PROCESS_TYPE_WEB, RemoveDestinationMessage,
    Repositories, SERVICE_INSTANCE_RESOURCE_TYPE, ServiceBindingType, ServiceInstanceRecord,
};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, instrument, warn};

pub const DESTINATION_PORT: i32 = 8080;
pub const DESTINATION_PROTOCOL: &str = "http1";

#[derive(Debug, Clone)]
pub struct Applier {
    repositories: Repositories,
}

impl Applier {
    pub fn new(repositories: Repositories) -> Self {
        Self { repositories }
    }

    #[instrument(skip_all, fields(app_name = %desired.name, space_guid = %space_guid))]
    pub async fn apply(
        &self,
        auth: &AuthInfo,
        space_guid: &str,
        desired: &ManifestApplication,
        observed: AppState,
    ) -> Result<()> {
        let state = self.apply_app(auth, space_guid, desired, observed).await?;
        let Some(app) = state.app.as_ref() else {
            return Err(ManifestError::internal(format!(
                "app {:?} missing after app phase",
                desired.name
            )));
        };

        self.apply_processes(auth, desired, app, &state).await?;
        self.apply_routes(auth, desired, app, &state).await?;
        self.apply_services(auth, desired, app, &state).await
    }

    async fn apply_app(
        &self,
        auth: &AuthInfo,
        space_guid: &str,
        desired: &ManifestApplication,
        observed: AppState,
    ) -> Result<AppState> {
        match &observed.app {
            None => {
                let app = self
                    .repositories
                    .apps
                    .create_app(auth, desired.to_app_create_message(space_guid))
                    .await?;
                info!(app_guid = %app.guid, "Created app");
                Ok(AppState::for_app(app))
            }
            Some(app) => {
                self.repositories
                    .apps
                    .patch_app(auth, desired.to_app_patch_message(&app.guid, space_guid))
                    .await?;
                debug!(app_guid = %app.guid, "Patched app");
                Ok(observed)
            }
        }
    }

    async fn apply_processes(
        &self,
        auth: &AuthInfo,
        desired: &ManifestApplication,
        app: &AppRecord,
        state: &AppState,
    ) -> Result<()> {
        for process in &desired.processes {
            match state.processes.get(&process.process_type) {
                Some(existing) => {
                    let message =
                        process.to_process_patch_message(&existing.guid, &app.space_guid)?;
                    self.repositories
                        .processes
                        .patch_process(auth, message)
                        .await?;
                    debug!(process_type = %process.process_type, "Patched process");
                }
                None => {
                    let message = process.to_process_create_message(&app.guid, &app.space_guid)?;
                    self.repositories
                        .processes
                        .create_process(auth, message)
                        .await?;
                    debug!(process_type = %process.process_type, "Created process");
                }
            }
        }
        Ok(())
    }

    async fn apply_routes(
        &self,
        auth: &AuthInfo,
        desired: &ManifestApplication,
        app: &AppRecord,
        state: &AppState,
    ) -> Result<()> {
        if desired.no_route {
            return self.remove_app_destinations(auth, app, state).await;
        }

        for route in &desired.routes {
            let parts = split_route(&route.route)?;
            if state.routes.contains_key(&parts.canonical_key()) {
                debug!(route = %route.route, "Route already mapped");
                continue;
            }

            let domain = self
                .repositories
                .domains
                .get_domain_by_name(auth, &parts.domain)
                .await?;
            let route_record = self
                .repositories
                .routes
                .get_or_create_route(
                    auth,
                    CreateRouteMessage {
                        host: parts.host,
                        path: parts.path,
                        space_guid: app.space_guid.clone(),
                        domain_guid: domain.guid,
                        domain_namespace: domain.namespace,
                        domain_name: domain.name,
                    },
                )
                .await?;

            self.repositories
                .routes
                .add_destinations_to_route(
                    auth,
                    AddDestinationsMessage {
                        route_guid: route_record.guid.clone(),
                        space_guid: route_record.space_guid.clone(),
                        existing_destinations: route_record.destinations,
                        new_destinations: vec![DesiredDestination {
                            app_guid: app.guid.clone(),
                            process_type: PROCESS_TYPE_WEB.to_string(),
                            port: DESTINATION_PORT,
                            protocol: DESTINATION_PROTOCOL.to_string(),
                        }],
                    },
                )
                .await?;
            info!(route = %route.route, route_guid = %route_record.guid, "Mapped route");
        }
        Ok(())
    }

    /// Removes this app's destinations from every route it is mapped to.
    /// Destinations of other apps on shared routes are kept.
    async fn remove_app_destinations(
        &self,
        auth: &AuthInfo,
        app: &AppRecord,
        state: &AppState,
    ) -> Result<()> {
        for route in state.routes.values() {
            for destination in route
                .destinations
                .iter()
                .filter(|d| d.app_guid == app.guid)
            {
                self.repositories
                    .routes
                    .remove_destination_from_route(
                        auth,
                        RemoveDestinationMessage {
                            route_guid: route.guid.clone(),
                            space_guid: route.space_guid.clone(),
                            guid: destination.guid.clone(),
                        },
                    )
                    .await?;
                info!(
                    route_guid = %route.guid,
                    destination_guid = %destination.guid,
                    "Removed destination"
                );
            }
        }
        Ok(())
    }

    async fn apply_services(
        &self,
        auth: &AuthInfo,
        desired: &ManifestApplication,
        app: &AppRecord,
        state: &AppState,
    ) -> Result<()> {
        let mut seen = HashSet::new();
        let to_bind: Vec<&ManifestApplicationService> = desired
            .services
            .iter()
            .filter(|s| !state.service_bindings.contains_key(&s.name))
            .filter(|s| seen.insert(s.name.clone()))
            .collect();
        if to_bind.is_empty() {
            return Ok(());
        }

        let instances = self
            .repositories
            .service_instances
            .list_service_instances(
                auth,
                ListServiceInstancesMessage {
                    names: to_bind.iter().map(|s| s.name.clone()).collect(),
                    space_guids: vec![app.space_guid.clone()],
                    ..Default::default()
                },
            )
            .await?;
        let instances_by_name: HashMap<&str, &ServiceInstanceRecord> = instances
            .iter()
            .map(|instance| (instance.name.as_str(), instance))
            .collect();

        // Every reference must resolve before anything is bound.
        if let Some(missing) = to_bind
            .iter()
            .find(|s| !instances_by_name.contains_key(s.name.as_str()))
        {
            warn!(service = %missing.name, "Service instance not found");
            return Err(ManifestError::not_found(
                SERVICE_INSTANCE_RESOURCE_TYPE,
                format!(
                    "service {:?} referenced by application {:?}",
                    missing.name, desired.name
                ),
            ));
        }

        for service in to_bind {
            let Some(instance) = instances_by_name.get(service.name.as_str()) else {
                continue;
            };
            self.repositories
                .service_bindings
                .create_service_binding(
                    auth,
                    CreateServiceBindingMessage {
                        binding_type: ServiceBindingType::App,
                        name: service.binding_name.clone(),
                        service_instance_guid: instance.guid.clone(),
                        app_guid: app.guid.clone(),
                        space_guid: app.space_guid.clone(),
                        parameters: service.parameters.clone(),
                    },
                )
                .await?;
            info!(service = %service.name, "Bound service");
        }
        Ok(())
    }
}
