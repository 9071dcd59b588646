//! # cfkube-storage
//!
//! Repository abstraction layer for the cfkube manifest engine.
//!
//! This crate defines the traits and record types that every store backend
//! must implement. It does not contain a backend; see `cfkube-db-memory`.
//!
//! ## Overview
//!
//! One trait per record kind:
//! - [`AppRepository`]
//! - [`DomainRepository`]
//! - [`ProcessRepository`]
//! - [`RouteRepository`]
//! - [`ServiceInstanceRepository`]
//! - [`ServiceBindingRepository`]
//!
//! A type implementing all six is a [`CfStore`] and can be shared through
//! [`Repositories::from_store`].
//!
//! ## Example
//!
//! ```ignore
//! use cfkube_storage::{AppRepository, StorageResult, AppRecord};
//!
//! async fn find_app(
//!     apps: &dyn AppRepository,
//!     auth: &AuthInfo,
//! ) -> StorageResult<AppRecord> {
//!     apps.get_app_by_name_and_space(auth, "my-app", "space-guid").await
//! }
//! ```

mod error;
pub mod evented;
mod traits;
mod types;

use std::sync::Arc;

pub use error::{ErrorCategory, StorageError};
pub use evented::EventedStore;
pub use traits::{
    AppRepository, CfStore, DomainRepository, ProcessRepository, RouteRepository,
    ServiceBindingRepository, ServiceInstanceRepository,
};
pub use types::*;

/// Type alias for a storage result.
pub type StorageResult<T> = Result<T, StorageError>;

pub type DynAppRepository = Arc<dyn AppRepository>;
pub type DynDomainRepository = Arc<dyn DomainRepository>;
pub type DynProcessRepository = Arc<dyn ProcessRepository>;
pub type DynRouteRepository = Arc<dyn RouteRepository>;
pub type DynServiceInstanceRepository = Arc<dyn ServiceInstanceRepository>;
pub type DynServiceBindingRepository = Arc<dyn ServiceBindingRepository>;

/// The full set of repositories the manifest engine works against.
///
/// Each handle may point at a different backend; tests commonly mix a real
/// store with a failing mock for a single record kind.
#[derive(Clone)]
pub struct Repositories {
    pub apps: DynAppRepository,
    pub domains: DynDomainRepository,
    pub processes: DynProcessRepository,
    pub routes: DynRouteRepository,
    pub service_instances: DynServiceInstanceRepository,
    pub service_bindings: DynServiceBindingRepository,
}

impl Repositories {
    /// Points every repository at the same store.
    pub fn from_store<S: CfStore + 'static>(store: Arc<S>) -> Self {
        Self {
            apps: store.clone(),
            domains: store.clone(),
            processes: store.clone(),
            routes: store.clone(),
            service_instances: store.clone(),
            service_bindings: store,
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}

/// Prelude module for convenient imports.
///
/// ```ignore
/// use cfkube_storage::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, StorageError};
    pub use crate::evented::EventedStore;
    pub use crate::traits::{
        AppRepository, CfStore, DomainRepository, ProcessRepository, RouteRepository,
        ServiceBindingRepository, ServiceInstanceRepository,
    };
    pub use crate::{Repositories, StorageResult};
}
