//! Mock collaborators shared by the unit tests.

use async_trait::async_trait;
use cfkube_core::AuthInfo;
use cfkube_storage::{
    AddDestinationsMessage, AppRecord, AppRepository, CreateAppMessage, CreateProcessMessage,
    CreateRouteMessage, CreateServiceBindingMessage, DesiredState, DestinationRecord,
    DomainRecord, DomainRepository, Lifecycle, ListProcessesMessage, ListServiceBindingsMessage,
    ListServiceInstancesMessage, Metadata, PatchAppMessage, PatchProcessMessage, ProcessRecord,
    ProcessRepository, RemoveDestinationMessage, RouteRecord, RouteRepository,
    ServiceBindingRecord, ServiceBindingRepository, ServiceBindingType, ServiceInstanceRecord,
    ServiceInstanceRepository, StorageError, StorageResult,
};
use std::collections::HashMap;
use std::sync::Mutex;
use time::OffsetDateTime;

pub const SPACE_GUID: &str = "space-1";

pub fn app_record(guid: &str, name: &str) -> AppRecord {
    AppRecord {
        guid: guid.to_string(),
        name: name.to_string(),
        space_guid: SPACE_GUID.to_string(),
        state: DesiredState::Stopped,
        lifecycle: Lifecycle::default(),
        env_vars: HashMap::new(),
        metadata: Metadata::default(),
        created_at: OffsetDateTime::now_utc(),
        updated_at: OffsetDateTime::now_utc(),
    }
}

pub fn process_record(guid: &str, app_guid: &str, process_type: &str) -> ProcessRecord {
    ProcessRecord {
        guid: guid.to_string(),
        space_guid: SPACE_GUID.to_string(),
        app_guid: app_guid.to_string(),
        process_type: process_type.to_string(),
        command: String::new(),
        desired_instances: 1,
        memory_mb: 1024,
        disk_quota_mb: 1024,
        health_check: Default::default(),
        created_at: OffsetDateTime::now_utc(),
        updated_at: OffsetDateTime::now_utc(),
    }
}

/// A route with one web destination per listed app GUID. Destination GUIDs
/// are `<route guid>-dest-<index>`.
pub fn route_record(
    guid: &str,
    host: &str,
    domain: &str,
    path: &str,
    app_guids: &[&str],
) -> RouteRecord {
    RouteRecord {
        guid: guid.to_string(),
        space_guid: SPACE_GUID.to_string(),
        domain: DomainRecord {
            guid: format!("{domain}-guid"),
            name: domain.to_string(),
            namespace: String::new(),
        },
        host: host.to_string(),
        path: path.to_string(),
        destinations: app_guids
            .iter()
            .enumerate()
            .map(|(i, app_guid)| DestinationRecord {
                guid: format!("{guid}-dest-{i}"),
                app_guid: app_guid.to_string(),
                process_type: "web".to_string(),
                port: 8080,
                protocol: "http1".to_string(),
            })
            .collect(),
        created_at: OffsetDateTime::now_utc(),
        updated_at: OffsetDateTime::now_utc(),
    }
}

pub fn binding_record(guid: &str, app_guid: &str, instance_guid: &str) -> ServiceBindingRecord {
    ServiceBindingRecord {
        guid: guid.to_string(),
        name: None,
        binding_type: ServiceBindingType::App,
        app_guid: app_guid.to_string(),
        service_instance_guid: instance_guid.to_string(),
        space_guid: SPACE_GUID.to_string(),
        parameters: None,
        created_at: OffsetDateTime::now_utc(),
    }
}

/// Canned-response store that records every call it receives.
#[derive(Default)]
pub struct MockStore {
    app: Mutex<Option<AppRecord>>,
    domains: Mutex<Vec<DomainRecord>>,
    processes: Mutex<Vec<ProcessRecord>>,
    routes: Mutex<Vec<RouteRecord>>,
    instances: Mutex<Vec<ServiceInstanceRecord>>,
    bindings: Mutex<Vec<ServiceBindingRecord>>,
    failures: Mutex<HashMap<&'static str, StorageError>>,
    calls: Mutex<Vec<&'static str>>,

    pub created_apps: Mutex<Vec<CreateAppMessage>>,
    pub patched_apps: Mutex<Vec<PatchAppMessage>>,
    pub created_processes: Mutex<Vec<CreateProcessMessage>>,
    pub patched_processes: Mutex<Vec<PatchProcessMessage>>,
    pub created_routes: Mutex<Vec<CreateRouteMessage>>,
    pub added_destinations: Mutex<Vec<AddDestinationsMessage>>,
    pub removed_destinations: Mutex<Vec<RemoveDestinationMessage>>,
    pub created_bindings: Mutex<Vec<CreateServiceBindingMessage>>,
}

impl MockStore {
    pub fn set_app(&self, app: AppRecord) {
        *self.app.lock().unwrap() = Some(app);
    }

    pub fn add_domain(&self, name: &str) {
        self.domains.lock().unwrap().push(DomainRecord {
            guid: format!("{name}-guid"),
            name: name.to_string(),
            namespace: "cf".to_string(),
        });
    }

    pub fn set_processes(&self, processes: Vec<ProcessRecord>) {
        *self.processes.lock().unwrap() = processes;
    }

    pub fn set_routes(&self, routes: Vec<RouteRecord>) {
        *self.routes.lock().unwrap() = routes;
    }

    pub fn set_instances(&self, instances: Vec<ServiceInstanceRecord>) {
        *self.instances.lock().unwrap() = instances;
    }

    pub fn set_bindings(&self, bindings: Vec<ServiceBindingRecord>) {
        *self.bindings.lock().unwrap() = bindings;
    }

    /// Makes every later call to `operation` fail with `err`.
    pub fn fail(&self, operation: &'static str, err: StorageError) {
        self.failures.lock().unwrap().insert(operation, err);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| **c == operation)
            .count()
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str) -> StorageResult<()> {
        self.calls.lock().unwrap().push(operation);
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AppRepository for MockStore {
    async fn get_app_by_name_and_space(
        &self,
        _auth: &AuthInfo,
        app_name: &str,
        _space_guid: &str,
    ) -> StorageResult<AppRecord> {
        self.record("get_app_by_name_and_space")?;
        self.app
            .lock()
            .unwrap()
            .clone()
            .filter(|app| app.name == app_name)
            .ok_or_else(|| StorageError::not_found("App", app_name))
    }

    async fn create_app(
        &self,
        _auth: &AuthInfo,
        message: CreateAppMessage,
    ) -> StorageResult<AppRecord> {
        self.record("create_app")?;
        let mut app = app_record(&format!("{}-guid", message.name), &message.name);
        app.space_guid = message.space_guid.clone();
        app.env_vars = message.env_vars.clone();
        self.created_apps.lock().unwrap().push(message);
        Ok(app)
    }

    async fn patch_app(
        &self,
        _auth: &AuthInfo,
        message: PatchAppMessage,
    ) -> StorageResult<AppRecord> {
        self.record("patch_app")?;
        let app = app_record(&message.app_guid, "patched");
        self.patched_apps.lock().unwrap().push(message);
        Ok(app)
    }
}

#[async_trait]
impl DomainRepository for MockStore {
    async fn get_domain_by_name(
        &self,
        _auth: &AuthInfo,
        name: &str,
    ) -> StorageResult<DomainRecord> {
        self.record("get_domain_by_name")?;
        self.domains
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| StorageError::not_found("Domain", name))
    }
}

#[async_trait]
impl ProcessRepository for MockStore {
    async fn list_processes(
        &self,
        _auth: &AuthInfo,
        _message: ListProcessesMessage,
    ) -> StorageResult<Vec<ProcessRecord>> {
        self.record("list_processes")?;
        Ok(self.processes.lock().unwrap().clone())
    }

    async fn create_process(
        &self,
        _auth: &AuthInfo,
        message: CreateProcessMessage,
    ) -> StorageResult<()> {
        self.record("create_process")?;
        self.created_processes.lock().unwrap().push(message);
        Ok(())
    }

    async fn patch_process(
        &self,
        _auth: &AuthInfo,
        message: PatchProcessMessage,
    ) -> StorageResult<ProcessRecord> {
        self.record("patch_process")?;
        let process = process_record(&message.process_guid, "app", "web");
        self.patched_processes.lock().unwrap().push(message);
        Ok(process)
    }
}

#[async_trait]
impl RouteRepository for MockStore {
    async fn list_routes_for_app(
        &self,
        _auth: &AuthInfo,
        _app_guid: &str,
        _space_guid: &str,
    ) -> StorageResult<Vec<RouteRecord>> {
        self.record("list_routes_for_app")?;
        Ok(self.routes.lock().unwrap().clone())
    }

    async fn get_or_create_route(
        &self,
        _auth: &AuthInfo,
        message: CreateRouteMessage,
    ) -> StorageResult<RouteRecord> {
        self.record("get_or_create_route")?;
        let existing = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .find(|r| {
                r.host == message.host
                    && r.domain.name == message.domain_name
                    && r.path == message.path
            })
            .cloned();
        let route = existing.unwrap_or_else(|| {
            let mut route = route_record(
                &format!("route-{}", message.host),
                &message.host,
                &message.domain_name,
                &message.path,
                &[],
            );
            route.domain.guid = message.domain_guid.clone();
            route
        });
        self.created_routes.lock().unwrap().push(message);
        Ok(route)
    }

    async fn add_destinations_to_route(
        &self,
        _auth: &AuthInfo,
        message: AddDestinationsMessage,
    ) -> StorageResult<RouteRecord> {
        self.record("add_destinations_to_route")?;
        let route = route_record(&message.route_guid, "host", "domain", "", &[]);
        self.added_destinations.lock().unwrap().push(message);
        Ok(route)
    }

    async fn remove_destination_from_route(
        &self,
        _auth: &AuthInfo,
        message: RemoveDestinationMessage,
    ) -> StorageResult<RouteRecord> {
        self.record("remove_destination_from_route")?;
        let route = route_record(&message.route_guid, "host", "domain", "", &[]);
        self.removed_destinations.lock().unwrap().push(message);
        Ok(route)
    }
}

#[async_trait]
impl ServiceInstanceRepository for MockStore {
    async fn list_service_instances(
        &self,
        _auth: &AuthInfo,
        message: ListServiceInstancesMessage,
    ) -> StorageResult<Vec<ServiceInstanceRecord>> {
        self.record("list_service_instances")?;
        Ok(self
            .instances
            .lock()
            .unwrap()
            .iter()
            .filter(|i| message.names.is_empty() || message.names.contains(&i.name))
            .filter(|i| message.guids.is_empty() || message.guids.contains(&i.guid))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ServiceBindingRepository for MockStore {
    async fn list_service_bindings(
        &self,
        _auth: &AuthInfo,
        _message: ListServiceBindingsMessage,
    ) -> StorageResult<Vec<ServiceBindingRecord>> {
        self.record("list_service_bindings")?;
        Ok(self.bindings.lock().unwrap().clone())
    }

    async fn create_service_binding(
        &self,
        _auth: &AuthInfo,
        message: CreateServiceBindingMessage,
    ) -> StorageResult<ServiceBindingRecord> {
        self.record("create_service_binding")?;
        let mut binding = binding_record(
            &format!("binding-{}", message.service_instance_guid),
            &message.app_guid,
            &message.service_instance_guid,
        );
        binding.name = message.name.clone();
        binding.parameters = message.parameters.clone();
        self.created_bindings.lock().unwrap().push(message);
        Ok(binding)
    }
}
