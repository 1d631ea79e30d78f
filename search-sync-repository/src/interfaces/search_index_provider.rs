//! Search index provider trait definition.
//!
//! This module defines the abstract interface for the remote search index,
//! allowing for different backend implementations (OpenSearch, Elasticsearch,
//! mocks for testing).

use async_trait::async_trait;

use crate::errors::SearchIndexError;
use search_sync_shared::{BulkItemResult, BulkOperation, Mapping};

/// Abstracts the underlying search index implementation.
///
/// One provider instance targets one physical index, named by
/// [`index_name`](Self::index_name). Implementations are injected into the
/// sync engine and the mapping registrar, enabling testing with mock
/// implementations.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait SearchIndexProvider: Send + Sync {
    /// The name of the index this provider targets.
    fn index_name(&self) -> &str;

    /// Check whether the index exists.
    async fn index_exists(&self) -> Result<bool, SearchIndexError>;

    /// Create the index, empty.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was created
    /// * `Err(SearchIndexError)` - If creation fails (including when the
    ///   index already exists)
    async fn create_index(&self) -> Result<(), SearchIndexError>;

    /// Delete the index and everything in it.
    ///
    /// # Returns
    ///
    /// * `Ok(())` - If the index was deleted
    /// * `Err(SearchIndexError)` - If deletion fails
    async fn delete_index(&self) -> Result<(), SearchIndexError>;

    /// Register a collection's mapping against the index.
    ///
    /// Re-registering the same mapping is not an error; registering a
    /// conflicting mapping for the same collection is last-write-wins and
    /// callers must serialize registration. Collections that are never
    /// registered fall back to the index's dynamic mapping.
    async fn register_mapping(&self, mapping: &Mapping) -> Result<(), SearchIndexError>;

    /// Submit an ordered batch of operations and return per-item results.
    ///
    /// # Ordering
    ///
    /// The returned vector MUST have exactly one entry per submitted
    /// operation, in submission order. Callers correlate results back to
    /// their inputs positionally; a backend that cannot preserve response
    /// order cannot implement this trait without threading per-item
    /// identifiers itself.
    ///
    /// Per-item failures are reported in the results, not as an `Err`;
    /// `Err` means the batch could not be submitted or read back at all.
    async fn bulk(
        &self,
        operations: &[BulkOperation],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError>;

    /// Check if the search index is healthy and reachable.
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - If the search index is healthy
    /// * `Ok(false)` - If the search index is unhealthy
    /// * `Err(SearchIndexError)` - If the health check fails to execute
    async fn health_check(&self) -> Result<bool, SearchIndexError>;
}
