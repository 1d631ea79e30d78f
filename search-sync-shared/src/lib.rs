//! # Search Sync Shared
//!
//! Shared types and data structures for the search sync system: collection
//! mappings, wire-format documents, and bulk operations with their per-item
//! results.

pub mod bulk;
pub mod document;

pub use bulk::{ActionParseError, BulkAction, BulkItemResult, BulkOperation, OperationError};
pub use document::{Document, FieldDef, FieldType, Mapping};
