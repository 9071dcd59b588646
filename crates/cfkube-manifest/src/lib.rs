//! # cfkube-manifest
//!
//! Applies application manifests to a space.
//!
//! An apply runs once per application, in manifest order:
//!
//! ```text
//!   StateCollector ──► Normalizer ──► Applier
//!   (observed state)   (defaults)     (app, processes, routes, services)
//! ```
//!
//! The [`Orchestrator`] drives the pipeline and stops at the first error.
//! Every store access goes through the repository traits of
//! `cfkube-storage`, so any backend implementing them can be used.
//!
//! ## Example
//!
//! ```ignore
//! use cfkube_manifest::{Manifest, Orchestrator};
//! use cfkube_storage::Repositories;
//!
//! let orchestrator = Orchestrator::new(Repositories::from_store(store), "apps.example.com");
//! let manifest = Manifest::from_yaml(&std::fs::read_to_string("manifest.yml")?)?;
//! orchestrator.apply(&auth, "space-guid", &manifest).await?;
//! ```

pub mod applier;
pub mod error;
pub mod normalizer;
pub mod orchestrator;
pub mod payloads;
pub mod route_words;
pub mod routes;
pub mod state_collector;

#[cfg(test)]
mod test_support;

pub use applier::Applier;
pub use error::{ErrorKind, ManifestError, Result};
pub use normalizer::Normalizer;
pub use orchestrator::Orchestrator;
pub use payloads::{
    Manifest, ManifestApplication, ManifestApplicationProcess, ManifestApplicationService,
    ManifestRoute,
};
pub use routes::{RouteParts, canonical_key, split_route};
pub use state_collector::{AppState, StateCollector};
