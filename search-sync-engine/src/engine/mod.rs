//! The bulk synchronization engine.
//!
//! One [`BulkSyncEngine::sync_type`] call is one bulk pass for one entity
//! type: select the pending set, build one operation per entity, submit the
//! ordered batch, and reconcile per-item results back into local sync state
//! inside one store transaction. Operations are submitted in pending-set
//! order and results are consumed in that same order; this positional
//! correspondence is the engine's load-bearing invariant.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::entity::Indexable;
use crate::errors::SyncError;
use crate::store::{EntityStore, StoreTransaction};
use search_sync_repository::SearchIndexProvider;
use search_sync_shared::{BulkAction, BulkItemResult, BulkOperation};

/// Configuration for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of entities allowed in a single bulk pass.
    /// Set to None to disable the limit (not recommended for production).
    pub max_batch_size: Option<usize>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_batch_size: Some(1000),
        }
    }
}

impl SyncConfig {
    /// Config with no batch size limit (use with caution).
    pub fn unlimited() -> Self {
        Self {
            max_batch_size: None,
        }
    }

    /// Config with a custom batch size limit.
    pub fn with_max_batch_size(max_batch_size: usize) -> Self {
        Self {
            max_batch_size: Some(max_batch_size),
        }
    }
}

/// The outcome of one entity within a bulk pass.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// The entity's local identifier.
    pub local_id: String,
    /// The identifier the remote index used or assigned.
    pub external_id: String,
    /// The action submitted for this entity.
    pub action: BulkAction,
    /// Whether the remote write and the local reconciliation succeeded.
    pub success: bool,
    /// Remote-reported error for failed items.
    pub error: Option<String>,
}

/// Summary of one bulk pass.
///
/// Failed items are reported here rather than raised: the entities stay
/// pending locally and are selected again by the next pass.
#[derive(Debug, Clone)]
pub struct SyncReport {
    /// The collection this pass covered.
    pub content_type: String,
    /// Number of entities in the batch.
    pub total: usize,
    /// Number of entities confirmed and reconciled.
    pub succeeded: usize,
    /// Number of entities the remote reported as failed.
    pub failed: usize,
    /// Per-entity outcomes, in submission order.
    pub outcomes: Vec<SyncOutcome>,
    /// When the pass finished.
    pub completed_at: DateTime<Utc>,
}

impl SyncReport {
    fn empty(content_type: String) -> Self {
        Self {
            content_type,
            total: 0,
            succeeded: 0,
            failed: 0,
            outcomes: Vec::new(),
            completed_at: Utc::now(),
        }
    }
}

/// Orchestrates bulk passes against one search index.
pub struct BulkSyncEngine {
    provider: Arc<dyn SearchIndexProvider>,
    config: SyncConfig,
}

impl BulkSyncEngine {
    /// Create an engine over the given provider with default configuration.
    pub fn new(provider: Arc<dyn SearchIndexProvider>) -> Self {
        Self {
            provider,
            config: SyncConfig::default(),
        }
    }

    /// Create an engine with custom configuration.
    pub fn with_config(provider: Arc<dyn SearchIndexProvider>, config: SyncConfig) -> Self {
        Self { provider, config }
    }

    fn check_batch_size(&self, size: usize) -> Result<(), SyncError> {
        if let Some(max) = self.config.max_batch_size {
            if size > max {
                return Err(SyncError::BatchSizeExceeded {
                    provided: size,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Run one bulk pass for one entity type.
    ///
    /// Each entity is submitted as `update` when it has been indexed before
    /// and the pass is not forced, else as `index`. With `force_all` the
    /// whole stored set is re-submitted as `index`, re-creating every
    /// document from scratch; intended for full rebuilds after
    /// `MappingRegistrar::reset_index`.
    ///
    /// Successful items are reconciled (`needs_sync` cleared, `ever_indexed`
    /// set, confirmed identifier recorded) inside one store transaction;
    /// any local failure rolls the whole pass back. Remote writes that
    /// already landed stand either way: the entities stay pending and the
    /// next pass rewrites them, which converges because documents are a
    /// pure function of entity state.
    pub async fn sync_type<T, S>(&self, store: &S, force_all: bool) -> Result<SyncReport, SyncError>
    where
        T: Indexable,
        S: EntityStore<T>,
    {
        let content_type = T::content_type();
        let entities = store.pending(force_all).await?;

        if entities.is_empty() {
            debug!(content_type = %content_type, "Nothing pending");
            return Ok(SyncReport::empty(content_type));
        }
        self.check_batch_size(entities.len())?;

        let index = self.provider.index_name();
        let mut operations = Vec::with_capacity(entities.len());
        for entity in &entities {
            let state = entity.sync_state();
            let op = match state.action(force_all) {
                BulkAction::Update => BulkOperation::update(
                    index,
                    &content_type,
                    &state.external_id,
                    entity.to_document(),
                )?,
                _ => BulkOperation::index(
                    index,
                    &content_type,
                    Some(state.external_id.clone()),
                    entity.to_document(),
                ),
            };
            operations.push(op);
        }

        info!(
            content_type = %content_type,
            count = operations.len(),
            force_all,
            "Submitting bulk pass"
        );

        let results = self.provider.bulk(&operations).await?;
        if results.len() != operations.len() {
            return Err(SyncError::ResultCountMismatch {
                expected: operations.len(),
                got: results.len(),
            });
        }

        let mut txn = store.begin().await?;
        let mut outcomes = Vec::with_capacity(entities.len());
        let mut succeeded = 0;
        let mut failed = 0;

        for ((mut entity, result), op) in entities.into_iter().zip(results).zip(&operations) {
            let local_id = entity.local_id();
            if result.success && result.external_id.is_empty() {
                // A confirmation without an identifier cannot be recorded:
                // external ids are reassigned, never cleared. The entity
                // stays pending and the next pass resubmits it.
                warn!(
                    content_type = %content_type,
                    local_id = %local_id,
                    "Successful bulk item carries no external id; entity stays pending"
                );
                failed += 1;
                outcomes.push(SyncOutcome {
                    local_id,
                    external_id: result.external_id,
                    action: op.action,
                    success: false,
                    error: Some("confirmation carried no external id".to_string()),
                });
                continue;
            }
            if result.success {
                entity.on_synced(&result.external_id);
                txn.save_sync_state(&entity).await?;
                succeeded += 1;
            } else {
                warn!(
                    content_type = %content_type,
                    local_id = %local_id,
                    error = result.error.as_deref().unwrap_or("unknown"),
                    "Bulk item failed; entity stays pending"
                );
                failed += 1;
            }
            outcomes.push(SyncOutcome {
                local_id,
                external_id: result.external_id,
                action: op.action,
                success: result.success,
                error: result.error,
            });
        }
        txn.commit().await?;

        info!(
            content_type = %content_type,
            succeeded,
            failed,
            "Bulk pass reconciled"
        );

        Ok(SyncReport {
            content_type,
            total: outcomes.len(),
            succeeded,
            failed,
            outcomes,
            completed_at: Utc::now(),
        })
    }

    /// Delete documents by their external identifiers.
    ///
    /// The flow for entities being removed by their owner: the caller
    /// collects the external identifiers before deleting the entities
    /// locally and issues this pass separately, since entity deletion is
    /// not driven by `sync_type`. Every identifier must be known; an empty
    /// one is a caller bug, surfaced before any network call.
    pub async fn delete_documents(
        &self,
        content_type: &str,
        external_ids: &[String],
    ) -> Result<Vec<BulkItemResult>, SyncError> {
        if external_ids.is_empty() {
            return Ok(Vec::new());
        }
        self.check_batch_size(external_ids.len())?;

        let index = self.provider.index_name();
        let operations = external_ids
            .iter()
            .map(|id| BulkOperation::delete(index, content_type, id))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            content_type = %content_type,
            count = operations.len(),
            "Submitting delete pass"
        );

        let results = self.provider.bulk(&operations).await?;
        if results.len() != operations.len() {
            return Err(SyncError::ResultCountMismatch {
                expected: operations.len(),
                got: results.len(),
            });
        }

        Ok(results)
    }
}
