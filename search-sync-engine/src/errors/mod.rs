//! Error types for the sync engine.

use thiserror::Error;

use crate::store::StoreError;
use search_sync_repository::SearchIndexError;
use search_sync_shared::OperationError;

/// Errors that can occur during a sync pass.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The remote search index failed.
    #[error("Search index error: {0}")]
    Index(#[from] SearchIndexError),

    /// The local store failed; any flag updates staged in the failed pass
    /// were rolled back.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// An operation could not be constructed (caller/data bug, surfaced
    /// before any network call).
    #[error(transparent)]
    Operation(#[from] OperationError),

    /// The pending set exceeds the configured batch limit.
    #[error("Batch size {provided} exceeds maximum {max}")]
    BatchSizeExceeded { provided: usize, max: usize },

    /// The remote returned a result stream that does not line up with the
    /// submitted operations; positional correlation would be wrong, so no
    /// local state was touched.
    #[error("Bulk call returned {got} results for {expected} operations")]
    ResultCountMismatch { expected: usize, got: usize },
}
