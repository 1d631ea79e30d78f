//! The local persistence collaborator.
//!
//! The engine talks to the entity store through two traits: [`EntityStore`]
//! answers the pending-set query with `force_all` as an explicit parameter,
//! and [`StoreTransaction`] scopes the flag/identifier updates of one
//! reconciliation pass. Dropping a transaction without committing rolls it
//! back.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::Indexable;

pub use memory::{MemoryStore, MemoryTransaction};

/// Errors that can occur in the local store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The pending-set query failed.
    #[error("Query error: {0}")]
    QueryError(String),

    /// Beginning or committing a transaction failed.
    #[error("Transaction error: {0}")]
    TransactionError(String),

    /// A staged update referenced an entity the store does not hold.
    #[error("Entity not found: {0}")]
    NotFound(String),
}

/// Persistence collaborator for one indexable entity type.
#[async_trait]
pub trait EntityStore<T: Indexable>: Send + Sync {
    /// The transaction type this store hands out.
    type Txn: StoreTransaction<T>;

    /// The ordered set of entities eligible for sync.
    ///
    /// Filters on `needs_sync == true` unless `force_all` is set, in which
    /// case all instances are returned regardless of flag state.
    /// `pending(true)` is always a superset of `pending(false)`.
    async fn pending(&self, force_all: bool) -> Result<Vec<T>, StoreError>;

    /// Open a transaction scoping one reconciliation pass.
    async fn begin(&self) -> Result<Self::Txn, StoreError>;
}

/// One local transaction over sync-state updates.
///
/// Writes through this trait persist the entity's sync state exactly as
/// given; they do not re-trigger the dirty flag.
#[async_trait]
pub trait StoreTransaction<T>: Send {
    /// Stage the entity's current sync state for persistence.
    async fn save_sync_state(&mut self, entity: &T) -> Result<(), StoreError>;

    /// Commit every staged update atomically. Consumes the transaction;
    /// dropping without calling this rolls everything back.
    async fn commit(self) -> Result<(), StoreError>;
}
