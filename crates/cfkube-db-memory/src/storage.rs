use crate::query::RecordFilter;
use cfkube_core::{AuthInfo, generate_guid};
use cfkube_storage::{
    APP_RESOURCE_TYPE, AddDestinationsMessage, AppRecord, AppRepository, CreateAppMessage,
    CreateProcessMessage, CreateRouteMessage, CreateServiceBindingMessage,
    DOMAIN_RESOURCE_TYPE, DestinationRecord, DomainRecord, DomainRepository, HealthCheckData,
    ListProcessesMessage, ListServiceBindingsMessage, ListServiceInstancesMessage,
    PROCESS_RESOURCE_TYPE, PatchAppMessage, PatchProcessMessage, ProcessRecord, ProcessRepository,
    ROUTE_RESOURCE_TYPE, RemoveDestinationMessage, RouteRecord, RouteRepository,
    SERVICE_BINDING_RESOURCE_TYPE, SERVICE_INSTANCE_RESOURCE_TYPE, ServiceBindingRecord,
    ServiceBindingRepository, ServiceInstanceRecord, ServiceInstanceRepository, ServiceInstanceType,
    StorageError, StorageResult,
};
use papaya::{HashMap as PapayaHashMap, HashSet as PapayaHashSet};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Values filled into a new process when the create message leaves them
/// unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDefaults {
    pub memory_mb: i64,
    pub disk_quota_mb: i64,
    /// Health-check timeout applied when the create message carries zero.
    pub timeout_seconds: i64,
}

impl Default for ProcessDefaults {
    fn default() -> Self {
        Self {
            memory_mb: 1024,
            disk_quota_mb: 1024,
            timeout_seconds: 0,
        }
    }
}

/// In-memory store backend using papaya lock-free HashMaps.
///
/// Records are keyed by GUID. Reads are lock-free; mutations are serialized
/// through a single write lock so read-modify-write sequences (get-or-create
/// of routes, destination appends) cannot interleave.
#[derive(Debug)]
pub struct InMemoryStore {
    pub(crate) apps: Arc<PapayaHashMap<String, AppRecord>>,
    pub(crate) domains: Arc<PapayaHashMap<String, DomainRecord>>,
    pub(crate) processes: Arc<PapayaHashMap<String, ProcessRecord>>,
    pub(crate) routes: Arc<PapayaHashMap<String, RouteRecord>>,
    pub(crate) service_instances: Arc<PapayaHashMap<String, ServiceInstanceRecord>>,
    pub(crate) service_bindings: Arc<PapayaHashMap<String, ServiceBindingRecord>>,
    /// Spaces every caller is denied access to.
    forbidden_spaces: Arc<PapayaHashSet<String>>,
    process_defaults: ProcessDefaults,
    write_lock: Mutex<()>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_process_defaults(ProcessDefaults::default())
    }

    pub fn with_process_defaults(process_defaults: ProcessDefaults) -> Self {
        Self {
            apps: Arc::new(PapayaHashMap::new()),
            domains: Arc::new(PapayaHashMap::new()),
            processes: Arc::new(PapayaHashMap::new()),
            routes: Arc::new(PapayaHashMap::new()),
            service_instances: Arc::new(PapayaHashMap::new()),
            service_bindings: Arc::new(PapayaHashMap::new()),
            forbidden_spaces: Arc::new(PapayaHashSet::new()),
            process_defaults,
            write_lock: Mutex::new(()),
        }
    }

    pub fn process_defaults(&self) -> ProcessDefaults {
        self.process_defaults
    }

    /// Registers a shared domain.
    pub fn add_domain(&self, name: impl Into<String>) -> DomainRecord {
        let domain = DomainRecord {
            guid: generate_guid(),
            name: name.into(),
            namespace: String::new(),
        };
        self.insert_domain(domain.clone());
        domain
    }

    /// Registers a user-provided service instance in a space.
    pub fn add_service_instance(
        &self,
        name: impl Into<String>,
        space_guid: impl Into<String>,
    ) -> ServiceInstanceRecord {
        let instance = ServiceInstanceRecord {
            guid: generate_guid(),
            name: name.into(),
            space_guid: space_guid.into(),
            instance_type: ServiceInstanceType::UserProvided,
        };
        self.insert_service_instance(instance.clone());
        instance
    }

    /// Makes every operation touching the space fail with `Forbidden`.
    pub fn forbid_space(&self, space_guid: impl Into<String>) {
        self.forbidden_spaces.pin().insert(space_guid.into());
    }

    pub(crate) fn insert_app(&self, app: AppRecord) {
        self.apps.pin().insert(app.guid.clone(), app);
    }

    pub(crate) fn insert_domain(&self, domain: DomainRecord) {
        self.domains.pin().insert(domain.guid.clone(), domain);
    }

    pub(crate) fn insert_process(&self, process: ProcessRecord) {
        self.processes.pin().insert(process.guid.clone(), process);
    }

    pub(crate) fn insert_route(&self, route: RouteRecord) {
        self.routes.pin().insert(route.guid.clone(), route);
    }

    pub(crate) fn insert_service_instance(&self, instance: ServiceInstanceRecord) {
        self.service_instances
            .pin()
            .insert(instance.guid.clone(), instance);
    }

    pub(crate) fn insert_service_binding(&self, binding: ServiceBindingRecord) {
        self.service_bindings
            .pin()
            .insert(binding.guid.clone(), binding);
    }

    /// Lists every app, route, process and binding in the space. Used by the
    /// CLI to render the stored state of a space.
    pub fn apps_in_space(&self, space_guid: &str) -> Vec<AppRecord> {
        let mut apps: Vec<AppRecord> = self
            .apps
            .pin()
            .iter()
            .filter(|(_, app)| app.space_guid == space_guid)
            .map(|(_, app)| app.clone())
            .collect();
        apps.sort_by(|a, b| a.name.cmp(&b.name));
        apps
    }

    pub fn count(&self) -> usize {
        self.apps.len()
            + self.domains.len()
            + self.processes.len()
            + self.routes.len()
            + self.service_instances.len()
            + self.service_bindings.len()
    }

    fn check_space(&self, resource_type: &str, space_guid: &str) -> StorageResult<()> {
        if self.forbidden_spaces.pin().contains(space_guid) {
            return Err(StorageError::forbidden(
                resource_type,
                format!("access to space {space_guid} denied"),
            ));
        }
        Ok(())
    }

    fn list<R: Clone, F: RecordFilter<R>>(map: &PapayaHashMap<String, R>, filter: &F) -> Vec<R> {
        map.pin()
            .iter()
            .filter(|(_, record)| filter.matches(record))
            .map(|(_, record)| record.clone())
            .collect()
    }

    fn get_route(&self, route_guid: &str) -> StorageResult<RouteRecord> {
        self.routes
            .pin()
            .get(route_guid)
            .cloned()
            .ok_or_else(|| StorageError::not_found(ROUTE_RESOURCE_TYPE, route_guid))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl AppRepository for InMemoryStore {
    async fn get_app_by_name_and_space(
        &self,
        _auth: &AuthInfo,
        app_name: &str,
        space_guid: &str,
    ) -> StorageResult<AppRecord> {
        self.check_space(APP_RESOURCE_TYPE, space_guid)?;
        self.apps
            .pin()
            .iter()
            .find(|(_, app)| app.name == app_name && app.space_guid == space_guid)
            .map(|(_, app)| app.clone())
            .ok_or_else(|| StorageError::not_found(APP_RESOURCE_TYPE, app_name))
    }

    async fn create_app(
        &self,
        _auth: &AuthInfo,
        message: CreateAppMessage,
    ) -> StorageResult<AppRecord> {
        self.check_space(APP_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let exists = self
            .apps
            .pin()
            .iter()
            .any(|(_, app)| app.name == message.name && app.space_guid == message.space_guid);
        if exists {
            return Err(StorageError::already_exists(APP_RESOURCE_TYPE, message.name));
        }

        let now = OffsetDateTime::now_utc();
        let app = AppRecord {
            guid: generate_guid(),
            name: message.name,
            space_guid: message.space_guid,
            state: message.state,
            lifecycle: message.lifecycle,
            env_vars: message.env_vars,
            metadata: message.metadata,
            created_at: now,
            updated_at: now,
        };
        self.insert_app(app.clone());
        Ok(app)
    }

    async fn patch_app(
        &self,
        _auth: &AuthInfo,
        message: PatchAppMessage,
    ) -> StorageResult<AppRecord> {
        self.check_space(APP_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let mut app = self
            .apps
            .pin()
            .get(&message.app_guid)
            .cloned()
            .ok_or_else(|| StorageError::not_found(APP_RESOURCE_TYPE, &message.app_guid))?;

        if let Some(buildpacks) = message.buildpacks {
            app.lifecycle.buildpacks = buildpacks;
        }
        if let Some(env_vars) = message.env_vars {
            app.env_vars = env_vars;
        }
        app.metadata.apply_patch(&message.metadata);
        app.updated_at = OffsetDateTime::now_utc();

        self.insert_app(app.clone());
        Ok(app)
    }
}

#[async_trait::async_trait]
impl DomainRepository for InMemoryStore {
    async fn get_domain_by_name(
        &self,
        _auth: &AuthInfo,
        name: &str,
    ) -> StorageResult<DomainRecord> {
        self.domains
            .pin()
            .iter()
            .find(|(_, domain)| domain.name == name)
            .map(|(_, domain)| domain.clone())
            .ok_or_else(|| StorageError::not_found(DOMAIN_RESOURCE_TYPE, name))
    }
}

#[async_trait::async_trait]
impl ProcessRepository for InMemoryStore {
    async fn list_processes(
        &self,
        _auth: &AuthInfo,
        message: ListProcessesMessage,
    ) -> StorageResult<Vec<ProcessRecord>> {
        for space_guid in &message.space_guids {
            self.check_space(PROCESS_RESOURCE_TYPE, space_guid)?;
        }
        let mut processes = Self::list(&self.processes, &message);
        processes.sort_by(|a, b| a.process_type.cmp(&b.process_type));
        Ok(processes)
    }

    async fn create_process(
        &self,
        _auth: &AuthInfo,
        message: CreateProcessMessage,
    ) -> StorageResult<()> {
        self.check_space(PROCESS_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        if !self.apps.pin().contains_key(&message.app_guid) {
            return Err(StorageError::not_found(APP_RESOURCE_TYPE, message.app_guid));
        }
        let exists = self.processes.pin().iter().any(|(_, process)| {
            process.app_guid == message.app_guid && process.process_type == message.process_type
        });
        if exists {
            return Err(StorageError::already_exists(
                PROCESS_RESOURCE_TYPE,
                format!("{}/{}", message.app_guid, message.process_type),
            ));
        }

        let defaults = self.process_defaults;
        let mut health_check = message.health_check;
        if health_check.data.timeout_seconds == 0 {
            health_check.data.timeout_seconds = defaults.timeout_seconds;
        }

        let now = OffsetDateTime::now_utc();
        self.insert_process(ProcessRecord {
            guid: generate_guid(),
            space_guid: message.space_guid,
            app_guid: message.app_guid,
            process_type: message.process_type,
            command: message.command,
            desired_instances: message.desired_instances,
            memory_mb: message.memory_mb.unwrap_or(defaults.memory_mb),
            disk_quota_mb: message.disk_quota_mb.unwrap_or(defaults.disk_quota_mb),
            health_check,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn patch_process(
        &self,
        _auth: &AuthInfo,
        message: PatchProcessMessage,
    ) -> StorageResult<ProcessRecord> {
        self.check_space(PROCESS_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let mut process = self
            .processes
            .pin()
            .get(&message.process_guid)
            .cloned()
            .ok_or_else(|| StorageError::not_found(PROCESS_RESOURCE_TYPE, &message.process_guid))?;

        if let Some(command) = message.command {
            process.command = command;
        }
        if let Some(instances) = message.desired_instances {
            process.desired_instances = instances;
        }
        if let Some(memory_mb) = message.memory_mb {
            process.memory_mb = memory_mb;
        }
        if let Some(disk_quota_mb) = message.disk_quota_mb {
            process.disk_quota_mb = disk_quota_mb;
        }
        if let Some(check_type) = message.health_check_type {
            process.health_check.check_type = check_type;
        }
        let HealthCheckData {
            http_endpoint,
            invocation_timeout_seconds,
            timeout_seconds,
        } = &mut process.health_check.data;
        if let Some(endpoint) = message.health_check_http_endpoint {
            *http_endpoint = endpoint;
        }
        if let Some(timeout) = message.health_check_invocation_timeout_seconds {
            *invocation_timeout_seconds = timeout;
        }
        if let Some(timeout) = message.health_check_timeout_seconds {
            *timeout_seconds = timeout;
        }
        process.updated_at = OffsetDateTime::now_utc();

        self.insert_process(process.clone());
        Ok(process)
    }
}

#[async_trait::async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_routes_for_app(
        &self,
        _auth: &AuthInfo,
        app_guid: &str,
        space_guid: &str,
    ) -> StorageResult<Vec<RouteRecord>> {
        self.check_space(ROUTE_RESOURCE_TYPE, space_guid)?;
        let mut routes: Vec<RouteRecord> = self
            .routes
            .pin()
            .iter()
            .filter(|(_, route)| {
                route.space_guid == space_guid
                    && route.destinations.iter().any(|d| d.app_guid == app_guid)
            })
            .map(|(_, route)| route.clone())
            .collect();
        routes.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(routes)
    }

    async fn get_or_create_route(
        &self,
        _auth: &AuthInfo,
        message: CreateRouteMessage,
    ) -> StorageResult<RouteRecord> {
        self.check_space(ROUTE_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let existing = self
            .routes
            .pin()
            .iter()
            .find(|(_, route)| {
                route.space_guid == message.space_guid
                    && route.domain.guid == message.domain_guid
                    && route.host == message.host
                    && route.path == message.path
            })
            .map(|(_, route)| route.clone());
        if let Some(route) = existing {
            return Ok(route);
        }

        let now = OffsetDateTime::now_utc();
        let route = RouteRecord {
            guid: generate_guid(),
            space_guid: message.space_guid,
            domain: DomainRecord {
                guid: message.domain_guid,
                name: message.domain_name,
                namespace: message.domain_namespace,
            },
            host: message.host,
            path: message.path,
            destinations: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        self.insert_route(route.clone());
        Ok(route)
    }

    async fn add_destinations_to_route(
        &self,
        _auth: &AuthInfo,
        message: AddDestinationsMessage,
    ) -> StorageResult<RouteRecord> {
        self.check_space(ROUTE_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let mut route = self.get_route(&message.route_guid)?;
        let mut destinations = message.existing_destinations;
        for desired in message.new_destinations {
            let duplicate = destinations.iter().any(|d| {
                d.app_guid == desired.app_guid
                    && d.process_type == desired.process_type
                    && d.port == desired.port
                    && d.protocol == desired.protocol
            });
            if duplicate {
                continue;
            }
            destinations.push(DestinationRecord {
                guid: generate_guid(),
                app_guid: desired.app_guid,
                process_type: desired.process_type,
                port: desired.port,
                protocol: desired.protocol,
            });
        }
        route.destinations = destinations;
        route.updated_at = OffsetDateTime::now_utc();

        self.insert_route(route.clone());
        Ok(route)
    }

    async fn remove_destination_from_route(
        &self,
        _auth: &AuthInfo,
        message: RemoveDestinationMessage,
    ) -> StorageResult<RouteRecord> {
        self.check_space(ROUTE_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        let mut route = self.get_route(&message.route_guid)?;
        let before = route.destinations.len();
        route.destinations.retain(|d| d.guid != message.guid);
        if route.destinations.len() == before {
            return Err(StorageError::not_found("Destination", message.guid));
        }
        route.updated_at = OffsetDateTime::now_utc();

        self.insert_route(route.clone());
        Ok(route)
    }
}

#[async_trait::async_trait]
impl ServiceInstanceRepository for InMemoryStore {
    async fn list_service_instances(
        &self,
        _auth: &AuthInfo,
        message: ListServiceInstancesMessage,
    ) -> StorageResult<Vec<ServiceInstanceRecord>> {
        for space_guid in &message.space_guids {
            self.check_space(SERVICE_INSTANCE_RESOURCE_TYPE, space_guid)?;
        }
        let mut instances = Self::list(&self.service_instances, &message);
        instances.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(instances)
    }
}

#[async_trait::async_trait]
impl ServiceBindingRepository for InMemoryStore {
    async fn list_service_bindings(
        &self,
        _auth: &AuthInfo,
        message: ListServiceBindingsMessage,
    ) -> StorageResult<Vec<ServiceBindingRecord>> {
        let mut bindings = Self::list(&self.service_bindings, &message);
        bindings.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(bindings)
    }

    async fn create_service_binding(
        &self,
        _auth: &AuthInfo,
        message: CreateServiceBindingMessage,
    ) -> StorageResult<ServiceBindingRecord> {
        self.check_space(SERVICE_BINDING_RESOURCE_TYPE, &message.space_guid)?;
        let _lock = self.write_lock.lock().await;

        if !self
            .service_instances
            .pin()
            .contains_key(&message.service_instance_guid)
        {
            return Err(StorageError::not_found(
                SERVICE_INSTANCE_RESOURCE_TYPE,
                message.service_instance_guid,
            ));
        }
        if !self.apps.pin().contains_key(&message.app_guid) {
            return Err(StorageError::not_found(APP_RESOURCE_TYPE, message.app_guid));
        }
        let exists = self.service_bindings.pin().iter().any(|(_, binding)| {
            binding.app_guid == message.app_guid
                && binding.service_instance_guid == message.service_instance_guid
        });
        if exists {
            return Err(StorageError::already_exists(
                SERVICE_BINDING_RESOURCE_TYPE,
                format!("{}/{}", message.app_guid, message.service_instance_guid),
            ));
        }

        let binding = ServiceBindingRecord {
            guid: generate_guid(),
            name: message.name,
            binding_type: message.binding_type,
            app_guid: message.app_guid,
            service_instance_guid: message.service_instance_guid,
            space_guid: message.space_guid,
            parameters: message.parameters,
            created_at: OffsetDateTime::now_utc(),
        };
        self.insert_service_binding(binding.clone());
        Ok(binding)
    }
}
