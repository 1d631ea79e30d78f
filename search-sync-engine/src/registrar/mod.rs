//! Mapping registrar: index lifecycle and collection schema registration.

use std::sync::Arc;

use tracing::{info, warn};

use search_sync_repository::{SearchIndexError, SearchIndexProvider};
use search_sync_shared::Mapping;

/// Manages collection schemas in the remote index.
pub struct MappingRegistrar {
    provider: Arc<dyn SearchIndexProvider>,
}

impl MappingRegistrar {
    /// Create a registrar over the given provider.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self { provider }
    }

    /// Delete the remote index if it exists, then (re)create it empty.
    ///
    /// Destructive: every document is lost. Intended for full-rebuild
    /// scenarios, followed by `register_mappings` and a forced sync pass.
    /// Remote unavailability propagates; no internal retry.
    pub async fn reset_index(&self) -> Result<(), SearchIndexError> {
        if self.provider.index_exists().await? {
            warn!(index = %self.provider.index_name(), "Deleting existing index");
            self.provider.delete_index().await?;
        }
        self.provider.create_index().await?;
        info!(index = %self.provider.index_name(), "Index reset");
        Ok(())
    }

    /// Register each collection's schema against the index.
    ///
    /// Idempotent per collection: re-registering the same schema is an
    /// overwrite, not an error. Concurrent registration of conflicting
    /// schemas for the same collection is last-write-wins; callers must
    /// serialize registration. Collections never registered here fall back
    /// to the remote index's dynamic mapping.
    pub async fn register_mappings(&self, mappings: &[Mapping]) -> Result<(), SearchIndexError> {
        for mapping in mappings {
            self.provider.register_mapping(mapping).await?;
            info!(
                collection = %mapping.collection,
                fields = mapping.fields.len(),
                "Registered collection mapping"
            );
        }
        Ok(())
    }
}
