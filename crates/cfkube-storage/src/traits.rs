//! Repository traits for the stores the manifest engine reads and writes.
//!
//! Each trait covers one record kind. Every call carries the caller's
//! [`AuthInfo`]; stores enforce access and report denial as
//! [`StorageError::Forbidden`](crate::StorageError::Forbidden).

use async_trait::async_trait;
use cfkube_core::AuthInfo;

use crate::StorageResult;
use crate::types::{
    AddDestinationsMessage, AppRecord, CreateAppMessage, CreateProcessMessage, CreateRouteMessage,
    CreateServiceBindingMessage, DomainRecord, ListProcessesMessage, ListServiceBindingsMessage,
    ListServiceInstancesMessage, PatchAppMessage, PatchProcessMessage, ProcessRecord, RouteRecord,
    RemoveDestinationMessage, ServiceBindingRecord, ServiceInstanceRecord,
};

#[async_trait]
pub trait AppRepository: Send + Sync {
    /// Looks up an app by name within a space.
    ///
    /// Returns `NotFound` when no such app exists.
    async fn get_app_by_name_and_space(
        &self,
        auth: &AuthInfo,
        app_name: &str,
        space_guid: &str,
    ) -> StorageResult<AppRecord>;

    async fn create_app(&self, auth: &AuthInfo, message: CreateAppMessage)
    -> StorageResult<AppRecord>;

    async fn patch_app(
        &self,
        auth: &AuthInfo,
        message: PatchAppMessage,
    ) -> StorageResult<AppRecord>;
}

#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn get_domain_by_name(&self, auth: &AuthInfo, name: &str) -> StorageResult<DomainRecord>;
}

#[async_trait]
pub trait ProcessRepository: Send + Sync {
    async fn list_processes(
        &self,
        auth: &AuthInfo,
        message: ListProcessesMessage,
    ) -> StorageResult<Vec<ProcessRecord>>;

    async fn create_process(&self, auth: &AuthInfo, message: CreateProcessMessage)
    -> StorageResult<()>;

    async fn patch_process(
        &self,
        auth: &AuthInfo,
        message: PatchProcessMessage,
    ) -> StorageResult<ProcessRecord>;
}

#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Lists every route in the space that has a destination for the app.
    async fn list_routes_for_app(
        &self,
        auth: &AuthInfo,
        app_guid: &str,
        space_guid: &str,
    ) -> StorageResult<Vec<RouteRecord>>;

    /// Returns the route matching host, path and domain in the space,
    /// creating it without destinations if it does not exist.
    async fn get_or_create_route(
        &self,
        auth: &AuthInfo,
        message: CreateRouteMessage,
    ) -> StorageResult<RouteRecord>;

    async fn add_destinations_to_route(
        &self,
        auth: &AuthInfo,
        message: AddDestinationsMessage,
    ) -> StorageResult<RouteRecord>;

    async fn remove_destination_from_route(
        &self,
        auth: &AuthInfo,
        message: RemoveDestinationMessage,
    ) -> StorageResult<RouteRecord>;
}

#[async_trait]
pub trait ServiceInstanceRepository: Send + Sync {
    async fn list_service_instances(
        &self,
        auth: &AuthInfo,
        message: ListServiceInstancesMessage,
    ) -> StorageResult<Vec<ServiceInstanceRecord>>;
}

#[async_trait]
pub trait ServiceBindingRepository: Send + Sync {
    async fn list_service_bindings(
        &self,
        auth: &AuthInfo,
        message: ListServiceBindingsMessage,
    ) -> StorageResult<Vec<ServiceBindingRecord>>;

    async fn create_service_binding(
        &self,
        auth: &AuthInfo,
        message: CreateServiceBindingMessage,
    ) -> StorageResult<ServiceBindingRecord>;
}

/// A backend that implements every repository.
///
/// Blanket-implemented, so any type implementing the six repository traits
/// can be handed to [`Repositories::from_store`](crate::Repositories::from_store).
pub trait CfStore:
    AppRepository
    + DomainRepository
    + ProcessRepository
    + RouteRepository
    + ServiceInstanceRepository
    + ServiceBindingRepository
{
}

impl<T> CfStore for T where
    T: AppRepository
        + DomainRepository
        + ProcessRepository
        + RouteRepository
        + ServiceInstanceRepository
        + ServiceBindingRepository
{
}
