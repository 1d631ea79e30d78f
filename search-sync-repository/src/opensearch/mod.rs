//! OpenSearch implementation of the search index provider.
//!
//! This module provides a concrete implementation of `SearchIndexProvider`
//! using OpenSearch as the backend.

mod client;
mod index_settings;

pub use client::OpenSearchProvider;
pub use index_settings::IndexSettings;
