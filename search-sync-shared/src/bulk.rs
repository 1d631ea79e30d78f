//! Bulk operations and their per-item results.
//!
//! One `BulkOperation` describes one line of a batch payload: the action,
//! the target index, the document's collection, the document identifier
//! (when known or required), and the payload. Construction enforces the
//! identifier contract before anything reaches the network: an update or
//! delete without a known external identifier is a caller bug, surfaced
//! immediately.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use crate::document::Document;

/// An action string that is not `index`, `update` or `delete`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid bulk action `{0}`: must be `index`, `update` or `delete`")]
pub struct ActionParseError(pub String);

/// Errors raised while constructing a bulk operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperationError {
    /// An update or delete was requested for a document whose external
    /// identifier is not yet known.
    #[error("{action} operation for `{content_type}` requires a known external id")]
    MissingExternalId {
        action: BulkAction,
        content_type: String,
    },
}

/// The kind of a bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BulkAction {
    /// Write the full document, creating or replacing it.
    Index,
    /// Patch an existing document in place.
    Update,
    /// Remove a document by identifier.
    Delete,
}

impl BulkAction {
    /// The wire name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Index => "index",
            BulkAction::Update => "update",
            BulkAction::Delete => "delete",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(BulkAction::Index),
            "update" => Ok(BulkAction::Update),
            "delete" => Ok(BulkAction::Delete),
            other => Err(ActionParseError(other.to_string())),
        }
    }
}

/// One operation of a batch payload.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkOperation {
    /// What to do with the document.
    pub action: BulkAction,
    /// Target index name.
    pub index: String,
    /// The document's collection (content type).
    pub content_type: String,
    /// Document identifier. Optional for `index` (the remote assigns one if
    /// absent), required for `update` and `delete`.
    pub external_id: Option<String>,
    /// Full source for `index`, patch for `update`, absent for `delete`.
    pub payload: Option<Document>,
}

impl BulkOperation {
    /// Build an `index` operation carrying the full document.
    ///
    /// `external_id` is attached only when non-empty; otherwise the remote
    /// index assigns an identifier and reports it in the per-item result.
    pub fn index(
        index: impl Into<String>,
        content_type: impl Into<String>,
        external_id: Option<String>,
        document: Document,
    ) -> Self {
        Self {
            action: BulkAction::Index,
            index: index.into(),
            content_type: content_type.into(),
            external_id: external_id.filter(|id| !id.is_empty()),
            payload: Some(document),
        }
    }

    /// Build an `update` operation patching an existing document.
    ///
    /// Fails with [`OperationError::MissingExternalId`] when the identifier
    /// is empty: an entity reaching `update` must already have one.
    pub fn update(
        index: impl Into<String>,
        content_type: impl Into<String>,
        external_id: &str,
        document: Document,
    ) -> Result<Self, OperationError> {
        let content_type = content_type.into();
        if external_id.is_empty() {
            return Err(OperationError::MissingExternalId {
                action: BulkAction::Update,
                content_type,
            });
        }
        Ok(Self {
            action: BulkAction::Update,
            index: index.into(),
            content_type,
            external_id: Some(external_id.to_string()),
            payload: Some(document),
        })
    }

    /// Build a `delete` operation removing a document by identifier.
    pub fn delete(
        index: impl Into<String>,
        content_type: impl Into<String>,
        external_id: &str,
    ) -> Result<Self, OperationError> {
        let content_type = content_type.into();
        if external_id.is_empty() {
            return Err(OperationError::MissingExternalId {
                action: BulkAction::Delete,
                content_type,
            });
        }
        Ok(Self {
            action: BulkAction::Delete,
            index: index.into(),
            content_type,
            external_id: Some(external_id.to_string()),
            payload: None,
        })
    }

    /// Render the operation as one object of the batch payload.
    ///
    /// The shape follows the bulk-helper convention: `_op_type`, `_index`
    /// and `_type` always present, `_id` when known, and the payload under
    /// `_source` (index) or `doc` (update). Deletes carry no payload.
    pub fn to_wire(&self) -> Value {
        let mut wire = serde_json::Map::new();
        wire.insert("_op_type".to_string(), json!(self.action.as_str()));
        wire.insert("_index".to_string(), json!(self.index));
        wire.insert("_type".to_string(), json!(self.content_type));

        if let Some(ref id) = self.external_id {
            wire.insert("_id".to_string(), json!(id));
        }

        match self.action {
            BulkAction::Index => {
                if let Some(ref doc) = self.payload {
                    wire.insert("_source".to_string(), Value::Object(doc.clone()));
                }
            }
            BulkAction::Update => {
                if let Some(ref doc) = self.payload {
                    wire.insert("doc".to_string(), Value::Object(doc.clone()));
                }
            }
            BulkAction::Delete => {}
        }

        Value::Object(wire)
    }
}

/// The per-item result of one bulk operation, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkItemResult {
    /// The identifier the remote index used or assigned for the document.
    pub external_id: String,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Remote-reported error for failed items.
    pub error: Option<String>,
}

impl BulkItemResult {
    /// A successful item with its confirmed identifier.
    pub fn ok(external_id: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            success: true,
            error: None,
        }
    }

    /// A failed item with the remote-reported reason.
    pub fn failed(external_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            external_id: external_id.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_doc() -> Document {
        let mut doc = Document::new();
        doc.insert("title".to_string(), json!("Hello"));
        doc.insert("pk".to_string(), json!(42));
        doc
    }

    #[test]
    fn test_action_round_trip() {
        for action in [BulkAction::Index, BulkAction::Update, BulkAction::Delete] {
            assert_eq!(action.as_str().parse::<BulkAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        let err = "merge".parse::<BulkAction>().unwrap_err();
        assert_eq!(err, ActionParseError("merge".to_string()));
    }

    #[test]
    fn test_index_without_id_omits_id() {
        let op = BulkOperation::index("entities", "forum_topic", None, sample_doc());
        let wire = op.to_wire();

        assert_eq!(wire["_op_type"], "index");
        assert_eq!(wire["_index"], "entities");
        assert_eq!(wire["_type"], "forum_topic");
        assert!(wire.get("_id").is_none());
        assert_eq!(wire["_source"]["title"], "Hello");
    }

    #[test]
    fn test_index_with_empty_id_omits_id() {
        let op = BulkOperation::index(
            "entities",
            "forum_topic",
            Some(String::new()),
            sample_doc(),
        );
        assert!(op.external_id.is_none());
        assert!(op.to_wire().get("_id").is_none());
    }

    #[test]
    fn test_index_with_known_id_carries_id() {
        let op = BulkOperation::index(
            "entities",
            "forum_topic",
            Some("42".to_string()),
            sample_doc(),
        );
        assert_eq!(op.to_wire()["_id"], "42");
    }

    #[test]
    fn test_update_requires_id() {
        let err = BulkOperation::update("entities", "forum_topic", "", sample_doc()).unwrap_err();
        assert!(matches!(
            err,
            OperationError::MissingExternalId {
                action: BulkAction::Update,
                ..
            }
        ));
    }

    #[test]
    fn test_update_wire_shape() {
        let op = BulkOperation::update("entities", "forum_topic", "42", sample_doc()).unwrap();
        let wire = op.to_wire();

        assert_eq!(wire["_op_type"], "update");
        assert_eq!(wire["_id"], "42");
        assert_eq!(wire["doc"]["pk"], 42);
        assert!(wire.get("_source").is_none());
    }

    #[test]
    fn test_delete_requires_id_and_has_no_payload() {
        assert!(BulkOperation::delete("entities", "forum_topic", "").is_err());

        let op = BulkOperation::delete("entities", "forum_topic", "42").unwrap();
        let wire = op.to_wire();

        assert_eq!(wire["_op_type"], "delete");
        assert_eq!(wire["_id"], "42");
        assert!(wire.get("_source").is_none());
        assert!(wire.get("doc").is_none());
    }
}
