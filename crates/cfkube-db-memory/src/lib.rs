//! In-memory store backend for the cfkube manifest engine.
//!
//! This crate provides an in-memory implementation of every repository trait
//! from `cfkube-storage`, using papaya lock-free HashMaps for concurrent
//! access.
//!
//! # Example
//!
//! ```ignore
//! use cfkube_db_memory::InMemoryStore;
//! use cfkube_storage::Repositories;
//!
//! let store = Arc::new(InMemoryStore::new());
//! store.add_domain("apps.example.com");
//! let repositories = Repositories::from_store(store.clone());
//! ```

pub mod query;
pub mod snapshot;
pub mod storage;

pub use cfkube_storage::{CfStore, StorageError};
pub use snapshot::{SnapshotError, StoreSnapshot};
pub use storage::{InMemoryStore, ProcessDefaults};

/// Creates a shareable in-memory store.
pub fn create_store(process_defaults: ProcessDefaults) -> std::sync::Arc<InMemoryStore> {
    std::sync::Arc::new(InMemoryStore::with_process_defaults(process_defaults))
}
