//! # Search Sync Repository
//!
//! This crate provides the boundary to the remote search index. It includes
//! definitions for errors, the abstract provider interface, and a concrete
//! implementation for OpenSearch.

pub mod errors;
pub mod interfaces;
pub mod opensearch;

pub use errors::SearchIndexError;
pub use interfaces::SearchIndexProvider;
pub use opensearch::{IndexSettings, OpenSearchProvider};
