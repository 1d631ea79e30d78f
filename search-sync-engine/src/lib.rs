//! # Search Sync Engine
//!
//! Keeps a local entity store and a remote search index consistent via
//! batched operations. Entity types declare how they map to search documents
//! through the [`Indexable`] capability; a per-entity dirty flag decides what
//! needs (re)indexing; [`BulkSyncEngine`] builds and submits batched
//! operations and reconciles per-item results back into local sync state in
//! one store transaction.

pub mod engine;
pub mod entity;
pub mod errors;
pub mod registrar;
pub mod schema;
pub mod store;

pub use engine::{BulkSyncEngine, SyncConfig, SyncOutcome, SyncReport};
pub use entity::{collection_name, Indexable, SyncState};
pub use errors::SyncError;
pub use registrar::MappingRegistrar;
pub use schema::Schema;
pub use store::{EntityStore, MemoryStore, StoreError, StoreTransaction};
