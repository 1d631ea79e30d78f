//! The indexable capability and its sync state.
//!
//! Every synchronizable type implements [`Indexable`]: it declares its
//! capability ancestry (which names its collection), its field schema, and
//! carries a persisted [`SyncState`] deciding whether it is a candidate for
//! (re)indexing.

use serde::{Deserialize, Serialize};

use crate::schema::Schema;
use search_sync_shared::{BulkAction, Document, Mapping};

/// Derive the collection name for a type from its capability ancestry.
///
/// Segments are lowercased and joined with `_`, most-general ancestor first,
/// the type's own name last. Deterministic: depends only on the ancestry
/// list, never on instance state.
pub fn collection_name(ancestry: &[&str]) -> String {
    ancestry
        .iter()
        .map(|segment| segment.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Persisted per-entity indexing state: the dirty-flag protocol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncState {
    /// Identifier the remote index uses for this entity's document.
    /// Initialized from the local id (string form) when one is supplied;
    /// overwritten once the remote index confirms a write; never cleared.
    pub external_id: String,
    /// Whether local state may have diverged from the remote index.
    pub needs_sync: bool,
    /// Whether at least one successful index operation exists. Never reset.
    pub ever_indexed: bool,
}

impl Default for SyncState {
    /// State for an entity whose document identifier will be assigned by
    /// the remote index.
    fn default() -> Self {
        Self {
            external_id: String::new(),
            needs_sync: true,
            ever_indexed: false,
        }
    }
}

impl SyncState {
    /// State for a freshly created entity, with the external identifier
    /// seeded from its local id.
    pub fn new(local_id: &str) -> Self {
        Self {
            external_id: local_id.to_string(),
            ..Self::default()
        }
    }

    /// Record a content-affecting mutation: the entity needs (re)indexing.
    pub fn mark_dirty(&mut self) {
        self.needs_sync = true;
    }

    /// Record a confirmed successful write with the identifier the remote
    /// index used or assigned. The only path that clears the dirty flag.
    pub fn mark_synced(&mut self, external_id: &str) {
        self.external_id = external_id.to_string();
        self.ever_indexed = true;
        self.needs_sync = false;
    }

    /// The action a sync pass takes for this entity.
    ///
    /// `Update` only when the entity has been indexed before and the pass is
    /// not a forced rebuild; a forced rebuild always re-creates documents
    /// from scratch so the remote fully matches current local state.
    pub fn action(&self, force_all: bool) -> BulkAction {
        if self.ever_indexed && !force_all {
            BulkAction::Update
        } else {
            BulkAction::Index
        }
    }
}

/// Capability interface for types synchronized into the search index.
///
/// Implementors declare:
///
/// - [`ANCESTRY`](Self::ANCESTRY), the capability type names from most
///   general to the type itself, which derive the collection name;
/// - [`schema`](Self::schema), the field-extraction table; the default is
///   empty, so a type with no declared schema still participates, with no
///   fields beyond identity;
/// - access to the entity's local id and [`SyncState`].
///
/// [`to_document`](Self::to_document) may be overridden when a field must be
/// assembled in a way the schema's accessors cannot express.
pub trait Indexable: Sized + Send + Sync {
    /// Capability ancestry, most-general ancestor first, own type name last.
    const ANCESTRY: &'static [&'static str];

    /// The field-extraction schema for this type's collection.
    fn schema() -> Schema<Self> {
        Schema::new()
    }

    /// Stable local identifier, string form.
    fn local_id(&self) -> String;

    /// The entity's persisted sync state.
    fn sync_state(&self) -> &SyncState;

    /// Mutable access to the sync state.
    fn sync_state_mut(&mut self) -> &mut SyncState;

    /// The collection this type's documents belong to.
    fn content_type() -> String {
        collection_name(Self::ANCESTRY)
    }

    /// The registrable mapping for this type's collection.
    fn mapping() -> Mapping {
        Self::schema().mapping(Self::content_type())
    }

    /// Project this entity into its search document.
    fn to_document(&self) -> Document {
        Self::schema().build(self)
    }

    /// Record a confirmed successful write. This write path is exempt from
    /// the "any mutation dirties the entity" rule, otherwise no entity
    /// could ever reach a clean state.
    fn on_synced(&mut self, external_id: &str) {
        self.sync_state_mut().mark_synced(external_id);
    }
}
