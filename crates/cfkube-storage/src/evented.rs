//! EventedStore - a store wrapper that emits events after mutations.
//!
//! Reads are delegated untouched. Every successful mutation is followed by a
//! [`StoreEvent`](cfkube_core::StoreEvent) on the broadcaster; failed
//! mutations emit nothing.
//!
//! # Example
//!
//! ```ignore
//! use cfkube_storage::EventedStore;
//! use cfkube_core::EventBroadcaster;
//!
//! let broadcaster = EventBroadcaster::new_shared();
//! let store = EventedStore::new(memory_store, broadcaster.clone());
//! let mut events = broadcaster.subscribe();
//!
//! store.create_app(&auth, message).await?;
//! // events.recv() now yields an `app.create` event
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use cfkube_core::{AuthInfo, EventBroadcaster, StoreOperation};
use tracing::debug;

use crate::StorageResult;
use crate::traits::{
    AppRepository, CfStore, DomainRepository, ProcessRepository, RouteRepository,
    ServiceBindingRepository, ServiceInstanceRepository,
};
use crate::types::{
    AddDestinationsMessage, AppRecord, CreateAppMessage, CreateProcessMessage, CreateRouteMessage,
    CreateServiceBindingMessage, DomainRecord, ListProcessesMessage, ListServiceBindingsMessage,
    ListServiceInstancesMessage, PatchAppMessage, PatchProcessMessage, ProcessRecord,
    RemoveDestinationMessage, RouteRecord, ServiceBindingRecord, ServiceInstanceRecord,
};

/// A store wrapper that publishes a `StoreEvent` after each successful
/// mutation of the inner store.
pub struct EventedStore<S: CfStore> {
    inner: S,
    broadcaster: Arc<EventBroadcaster>,
}

impl<S: CfStore> EventedStore<S> {
    pub fn new(inner: S, broadcaster: Arc<EventBroadcaster>) -> Self {
        Self { inner, broadcaster }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn broadcaster(&self) -> &Arc<EventBroadcaster> {
        &self.broadcaster
    }

    fn emit(&self, operation: StoreOperation, resource_guid: &str, space_guid: &str) {
        if !self.broadcaster.has_subscribers() {
            return;
        }
        let count = self
            .broadcaster
            .send_operation(operation, resource_guid, space_guid);
        debug!(
            operation = %operation,
            resource_guid = %resource_guid,
            space_guid = %space_guid,
            subscribers = count,
            "Emitted store event"
        );
    }
}

#[async_trait]
impl<S: CfStore> AppRepository for EventedStore<S> {
    async fn get_app_by_name_and_space(
        &self,
        auth: &AuthInfo,
        app_name: &str,
        space_guid: &str,
    ) -> StorageResult<AppRecord> {
        self.inner
            .get_app_by_name_and_space(auth, app_name, space_guid)
            .await
    }

    async fn create_app(
        &self,
        auth: &AuthInfo,
        message: CreateAppMessage,
    ) -> StorageResult<AppRecord> {
        let app = self.inner.create_app(auth, message).await?;
        self.emit(StoreOperation::CreateApp, &app.guid, &app.space_guid);
        Ok(app)
    }

    async fn patch_app(
        &self,
        auth: &AuthInfo,
        message: PatchAppMessage,
    ) -> StorageResult<AppRecord> {
        let app = self.inner.patch_app(auth, message).await?;
        self.emit(StoreOperation::PatchApp, &app.guid, &app.space_guid);
        Ok(app)
    }
}

#[async_trait]
impl<S: CfStore> DomainRepository for EventedStore<S> {
    async fn get_domain_by_name(&self, auth: &AuthInfo, name: &str) -> StorageResult<DomainRecord> {
        self.inner.get_domain_by_name(auth, name).await
    }
}

#[async_trait]
impl<S: CfStore> ProcessRepository for EventedStore<S> {
    async fn list_processes(
        &self,
        auth: &AuthInfo,
        message: ListProcessesMessage,
    ) -> StorageResult<Vec<ProcessRecord>> {
        self.inner.list_processes(auth, message).await
    }

    async fn create_process(
        &self,
        auth: &AuthInfo,
        message: CreateProcessMessage,
    ) -> StorageResult<()> {
        let space_guid = message.space_guid.clone();
        self.inner.create_process(auth, message).await?;
        self.emit(StoreOperation::CreateProcess, "", &space_guid);
        Ok(())
    }

    async fn patch_process(
        &self,
        auth: &AuthInfo,
        message: PatchProcessMessage,
    ) -> StorageResult<ProcessRecord> {
        let process = self.inner.patch_process(auth, message).await?;
        self.emit(StoreOperation::PatchProcess, &process.guid, &process.space_guid);
        Ok(process)
    }
}

#[async_trait]
impl<S: CfStore> RouteRepository for EventedStore<S> {
    async fn list_routes_for_app(
        &self,
        auth: &AuthInfo,
        app_guid: &str,
        space_guid: &str,
    ) -> StorageResult<Vec<RouteRecord>> {
        self.inner.list_routes_for_app(auth, app_guid, space_guid).await
    }

    async fn get_or_create_route(
        &self,
        auth: &AuthInfo,
        message: CreateRouteMessage,
    ) -> StorageResult<RouteRecord> {
        let route = self.inner.get_or_create_route(auth, message).await?;
        self.emit(StoreOperation::GetOrCreateRoute, &route.guid, &route.space_guid);
        Ok(route)
    }

    async fn add_destinations_to_route(
        &self,
        auth: &AuthInfo,
        message: AddDestinationsMessage,
    ) -> StorageResult<RouteRecord> {
        let route = self.inner.add_destinations_to_route(auth, message).await?;
        self.emit(StoreOperation::AddDestinations, &route.guid, &route.space_guid);
        Ok(route)
    }

    async fn remove_destination_from_route(
        &self,
        auth: &AuthInfo,
        message: RemoveDestinationMessage,
    ) -> StorageResult<RouteRecord> {
        let route = self.inner.remove_destination_from_route(auth, message).await?;
        self.emit(StoreOperation::RemoveDestination, &route.guid, &route.space_guid);
        Ok(route)
    }
}

#[async_trait]
impl<S: CfStore> ServiceInstanceRepository for EventedStore<S> {
    async fn list_service_instances(
        &self,
        auth: &AuthInfo,
        message: ListServiceInstancesMessage,
    ) -> StorageResult<Vec<ServiceInstanceRecord>> {
        self.inner.list_service_instances(auth, message).await
    }
}

#[async_trait]
impl<S: CfStore> ServiceBindingRepository for EventedStore<S> {
    async fn list_service_bindings(
        &self,
        auth: &AuthInfo,
        message: ListServiceBindingsMessage,
    ) -> StorageResult<Vec<ServiceBindingRecord>> {
        self.inner.list_service_bindings(auth, message).await
    }

    async fn create_service_binding(
        &self,
        auth: &AuthInfo,
        message: CreateServiceBindingMessage,
    ) -> StorageResult<ServiceBindingRecord> {
        let binding = self.inner.create_service_binding(auth, message).await?;
        self.emit(
            StoreOperation::CreateServiceBinding,
            &binding.guid,
            &binding.space_guid,
        );
        Ok(binding)
    }
}
