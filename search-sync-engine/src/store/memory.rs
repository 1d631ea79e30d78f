//! In-memory entity store.
//!
//! Reference implementation of [`EntityStore`] backed by a shared vector.
//! Useful for tests and as the model for store-backed implementations:
//! entities arrive dirty by construction, [`MemoryStore::modify`] re-dirties
//! on every mutation, and transactions stage cloned records that are applied
//! by local id only on commit.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entity::Indexable;
use crate::store::{EntityStore, StoreError, StoreTransaction};

/// Shared in-memory store for one entity type.
pub struct MemoryStore<T> {
    records: Arc<RwLock<Vec<T>>>,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl<T: Indexable + Clone> MemoryStore<T> {
    /// Insert an entity. Insertion order is the order `pending` returns.
    pub async fn insert(&self, entity: T) {
        self.records.write().await.push(entity);
    }

    /// Apply a mutation to the entity with the given local id, then flag it
    /// for (re)indexing. Any mutation may affect document content, so every
    /// mutation dirties the entity.
    pub async fn modify<F>(&self, local_id: &str, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().await;
        let entity = records
            .iter_mut()
            .find(|r| r.local_id() == local_id)
            .ok_or_else(|| StoreError::NotFound(local_id.to_string()))?;
        f(entity);
        entity.sync_state_mut().mark_dirty();
        Ok(())
    }

    /// Fetch a snapshot of the entity with the given local id.
    pub async fn get(&self, local_id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.local_id() == local_id)
            .cloned()
    }

    /// Number of stored entities.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the store holds no entities.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl<T: Indexable + Clone> EntityStore<T> for MemoryStore<T> {
    type Txn = MemoryTransaction<T>;

    async fn pending(&self, force_all: bool) -> Result<Vec<T>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| force_all || r.sync_state().needs_sync)
            .cloned()
            .collect())
    }

    async fn begin(&self) -> Result<Self::Txn, StoreError> {
        Ok(MemoryTransaction {
            records: Arc::clone(&self.records),
            staged: Vec::new(),
        })
    }
}

/// Transaction over a [`MemoryStore`]: stages clones, applies on commit.
pub struct MemoryTransaction<T> {
    records: Arc<RwLock<Vec<T>>>,
    staged: Vec<T>,
}

#[async_trait]
impl<T: Indexable + Clone> StoreTransaction<T> for MemoryTransaction<T> {
    async fn save_sync_state(&mut self, entity: &T) -> Result<(), StoreError> {
        self.staged.push(entity.clone());
        Ok(())
    }

    async fn commit(self) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        for staged in self.staged {
            let local_id = staged.local_id();
            match records.iter_mut().find(|r| r.local_id() == local_id) {
                Some(slot) => *slot = staged,
                None => return Err(StoreError::NotFound(local_id)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SyncState;

    #[derive(Debug, Clone)]
    struct Note {
        id: String,
        body: String,
        state: SyncState,
    }

    impl Note {
        fn new(id: &str, body: &str) -> Self {
            Self {
                id: id.to_string(),
                body: body.to_string(),
                state: SyncState::new(id),
            }
        }
    }

    impl Indexable for Note {
        const ANCESTRY: &'static [&'static str] = &["Note"];

        fn local_id(&self) -> String {
            self.id.clone()
        }

        fn sync_state(&self) -> &SyncState {
            &self.state
        }

        fn sync_state_mut(&mut self) -> &mut SyncState {
            &mut self.state
        }
    }

    #[tokio::test]
    async fn test_entities_arrive_pending() {
        let store = MemoryStore::new();
        store.insert(Note::new("1", "first")).await;
        store.insert(Note::new("2", "second")).await;

        let pending = store.pending(false).await.unwrap();
        assert_eq!(pending.len(), 2);
        // insertion order preserved
        assert_eq!(pending[0].id, "1");
        assert_eq!(pending[1].id, "2");
    }

    #[tokio::test]
    async fn test_force_all_is_superset_of_pending() {
        let store = MemoryStore::new();
        store.insert(Note::new("1", "first")).await;
        store.insert(Note::new("2", "second")).await;

        // mark "1" clean
        let mut txn = store.begin().await.unwrap();
        let mut clean = store.get("1").await.unwrap();
        clean.on_synced("1");
        txn.save_sync_state(&clean).await.unwrap();
        txn.commit().await.unwrap();

        let filtered = store.pending(false).await.unwrap();
        let all = store.pending(true).await.unwrap();

        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "2");
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_modify_marks_dirty() {
        let store = MemoryStore::new();
        store.insert(Note::new("1", "first")).await;

        let mut clean = store.get("1").await.unwrap();
        clean.on_synced("1");
        let mut txn = store.begin().await.unwrap();
        txn.save_sync_state(&clean).await.unwrap();
        txn.commit().await.unwrap();
        assert!(store.pending(false).await.unwrap().is_empty());

        store
            .modify("1", |n| n.body = "edited".to_string())
            .await
            .unwrap();

        let pending = store.pending(false).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].body, "edited");
    }

    #[tokio::test]
    async fn test_modify_unknown_entity() {
        let store: MemoryStore<Note> = MemoryStore::new();
        let result = store.modify("missing", |_| {}).await;
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_dropped_transaction_rolls_back() {
        let store = MemoryStore::new();
        store.insert(Note::new("1", "first")).await;

        {
            let mut txn = store.begin().await.unwrap();
            let mut synced = store.get("1").await.unwrap();
            synced.on_synced("backend-1");
            txn.save_sync_state(&synced).await.unwrap();
            // dropped without commit
        }

        let note = store.get("1").await.unwrap();
        assert!(note.state.needs_sync);
        assert!(!note.state.ever_indexed);
        assert_eq!(note.state.external_id, "1");
    }

    #[tokio::test]
    async fn test_commit_applies_all_staged_updates() {
        let store = MemoryStore::new();
        store.insert(Note::new("1", "first")).await;
        store.insert(Note::new("2", "second")).await;

        let mut txn = store.begin().await.unwrap();
        for id in ["1", "2"] {
            let mut note = store.get(id).await.unwrap();
            note.on_synced(&format!("backend-{}", id));
            txn.save_sync_state(&note).await.unwrap();
        }
        txn.commit().await.unwrap();

        for id in ["1", "2"] {
            let note = store.get(id).await.unwrap();
            assert!(!note.state.needs_sync);
            assert!(note.state.ever_indexed);
            assert_eq!(note.state.external_id, format!("backend-{}", id));
        }
    }
}
