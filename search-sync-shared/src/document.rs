//! Collection mappings and wire-format documents.
//!
//! A `Mapping` declares the ordered set of fields a collection serializes
//! into its documents. Fields not declared here are invisible to the search
//! index.

use serde::{Deserialize, Serialize};

/// A document as submitted to the search index: a JSON object keyed by the
/// collection's declared field names.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// The declared type of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Full-text analyzed content.
    Text,
    /// Exact-match, non-analyzed strings (ids, tags).
    Keyword,
    /// 32-bit integers.
    Integer,
    /// 64-bit integers.
    Long,
    /// Floating point numbers.
    Float,
    /// Booleans.
    Boolean,
    /// Dates/timestamps.
    Date,
}

impl FieldType {
    /// The type string understood by the search index's mapping endpoint.
    pub fn as_index_type(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Keyword => "keyword",
            FieldType::Integer => "integer",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
        }
    }
}

/// A single field declaration within a collection mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field name as it appears in documents.
    pub name: String,
    /// Declared field type.
    pub field_type: FieldType,
}

impl FieldDef {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// The schema of one collection: an ordered set of field declarations.
///
/// Registered against the remote index before documents referencing the
/// collection are written. Declaration order is preserved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    /// The collection this mapping describes.
    pub collection: String,
    /// Ordered field declarations.
    pub fields: Vec<FieldDef>,
}

impl Mapping {
    /// Create an empty mapping for the given collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field declaration, builder style.
    pub fn field(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(FieldDef::new(name, field_type));
        self
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Whether the mapping declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_rendering() {
        assert_eq!(FieldType::Text.as_index_type(), "text");
        assert_eq!(FieldType::Keyword.as_index_type(), "keyword");
        assert_eq!(FieldType::Integer.as_index_type(), "integer");
        assert_eq!(FieldType::Date.as_index_type(), "date");
    }

    #[test]
    fn test_mapping_preserves_declaration_order() {
        let mapping = Mapping::new("forum_topic")
            .field("pk", FieldType::Integer)
            .field("title", FieldType::Text)
            .field("tags", FieldType::Keyword);

        assert_eq!(mapping.collection, "forum_topic");
        assert_eq!(mapping.field_names(), vec!["pk", "title", "tags"]);
    }

    #[test]
    fn test_empty_mapping() {
        let mapping = Mapping::new("note");
        assert!(mapping.is_empty());
        assert!(mapping.field_names().is_empty());
    }
}
