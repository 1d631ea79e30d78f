//! Per-collection field-extraction schemas.
//!
//! A [`Schema`] is the explicit table from field name to accessor function,
//! built once at type-declaration time. Document building is a pure
//! projection: the output's key set exactly equals the schema's declared
//! field names, with `null` placeholders for fields that declare no
//! accessor, keeping documents structurally uniform per collection.

use serde_json::Value;

use search_sync_shared::{Document, FieldDef, FieldType, Mapping};

/// Reads one field's value out of an entity.
pub type Accessor<T> = fn(&T) -> Value;

struct SchemaField<T> {
    def: FieldDef,
    accessor: Option<Accessor<T>>,
}

/// The ordered field-extraction table for one entity type.
pub struct Schema<T> {
    fields: Vec<SchemaField<T>>,
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema<T> {
    /// An empty schema: the type participates with no mapped fields.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Declare a field with its accessor, builder style.
    pub fn field(
        mut self,
        name: impl Into<String>,
        field_type: FieldType,
        accessor: Accessor<T>,
    ) -> Self {
        self.fields.push(SchemaField {
            def: FieldDef::new(name, field_type),
            accessor: Some(accessor),
        });
        self
    }

    /// Declare a field with no accessor; it serializes as `null`.
    pub fn declared(mut self, name: impl Into<String>, field_type: FieldType) -> Self {
        self.fields.push(SchemaField {
            def: FieldDef::new(name, field_type),
            accessor: None,
        });
        self
    }

    /// Whether the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Project the declared fields into a registrable mapping for the given
    /// collection.
    pub fn mapping(&self, collection: impl Into<String>) -> Mapping {
        Mapping {
            collection: collection.into(),
            fields: self.fields.iter().map(|f| f.def.clone()).collect(),
        }
    }

    /// Build the document for one entity.
    ///
    /// Guarantee: the key set of the output exactly equals the declared
    /// field names, in declaration order.
    pub fn build(&self, entity: &T) -> Document {
        let mut doc = Document::new();
        for field in &self.fields {
            let value = match field.accessor {
                Some(accessor) => accessor(entity),
                None => Value::Null,
            };
            doc.insert(field.def.name.clone(), value);
        }
        doc
    }
}
