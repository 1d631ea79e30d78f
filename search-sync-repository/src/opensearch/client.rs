//! OpenSearch provider implementation.
//!
//! This module provides the concrete implementation of `SearchIndexProvider`
//! using the OpenSearch Rust client.

use async_trait::async_trait;
use opensearch::{
    http::request::JsonBody,
    http::transport::{SingleNodeConnectionPool, TransportBuilder},
    indices::{
        IndicesCreateParts, IndicesDeleteParts, IndicesExistsParts, IndicesPutMappingParts,
    },
    BulkParts, OpenSearch,
};
use serde_json::{json, Value};
use tracing::{debug, error, info};
use url::Url;

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexProvider;
use crate::opensearch::index_settings::IndexSettings;
use search_sync_shared::{BulkAction, BulkItemResult, BulkOperation, Document, Mapping};

/// Field every document carries to record its collection.
///
/// Mapping types were removed from the bulk API after Elasticsearch 6, so
/// the collection travels as a regular keyword field instead of `_type`.
const CONTENT_TYPE_FIELD: &str = "content_type";

/// OpenSearch-backed search index provider.
///
/// All collections share one physical index; each document carries its
/// collection in the `content_type` keyword field.
///
/// # Example
///
/// ```ignore
/// let provider = OpenSearchProvider::new(
///     "http://localhost:9200",
///     "entities",
///     IndexSettings::default(),
/// )?;
/// provider.create_index().await?;
/// ```
pub struct OpenSearchProvider {
    client: OpenSearch,
    index: String,
    settings: IndexSettings,
}

impl OpenSearchProvider {
    /// Create a new provider connected to the specified URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The OpenSearch server URL (e.g., "http://localhost:9200")
    /// * `index` - The physical index this provider targets
    /// * `settings` - Sharding settings used when the index is created
    pub fn new(
        url: &str,
        index: impl Into<String>,
        settings: IndexSettings,
    ) -> Result<Self, SearchIndexError> {
        let parsed_url =
            Url::parse(url).map_err(|e| SearchIndexError::validation(e.to_string()))?;

        let conn_pool = SingleNodeConnectionPool::new(parsed_url);
        let transport = TransportBuilder::new(conn_pool)
            .disable_proxy()
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let index = index.into();

        info!(url = %url, index = %index, "Created OpenSearch provider");

        Ok(Self {
            client: OpenSearch::new(transport),
            index,
            settings,
        })
    }

    /// Render the NDJSON action/payload lines for one operation.
    ///
    /// Starts from the operation's wire form and reshapes it for the bulk
    /// endpoint: the `_type` entry becomes a keyword field on index
    /// documents, since mapping types are gone from the bulk API.
    fn wire_lines(&self, op: &BulkOperation) -> Vec<Value> {
        let wire = op.to_wire();

        let mut meta = serde_json::Map::new();
        meta.insert("_index".to_string(), wire["_index"].clone());
        if let Some(id) = wire.get("_id") {
            meta.insert("_id".to_string(), id.clone());
        }
        let mut header = serde_json::Map::new();
        header.insert(op.action.as_str().to_string(), Value::Object(meta));

        let mut lines = vec![Value::Object(header)];
        match op.action {
            BulkAction::Index => {
                let mut source = match wire.get("_source") {
                    Some(Value::Object(doc)) => doc.clone(),
                    _ => Document::new(),
                };
                source.insert(CONTENT_TYPE_FIELD.to_string(), wire["_type"].clone());
                lines.push(Value::Object(source));
            }
            BulkAction::Update => {
                let doc = wire.get("doc").cloned().unwrap_or_else(|| json!({}));
                lines.push(json!({ "doc": doc }));
            }
            BulkAction::Delete => {}
        }
        lines
    }

    /// Parse the bulk response `items` array positionally.
    ///
    /// OpenSearch reports items in submission order; each item is keyed by
    /// its action name and carries `_id`, `status` and an optional `error`.
    fn parse_bulk_response(
        response: &Value,
        operations: &[BulkOperation],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        let items = response
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| SearchIndexError::parse("bulk response has no items array"))?;

        if items.len() != operations.len() {
            return Err(SearchIndexError::parse(format!(
                "bulk response has {} items for {} operations",
                items.len(),
                operations.len()
            )));
        }

        let mut results = Vec::with_capacity(items.len());
        for (item, op) in items.iter().zip(operations) {
            let body = item.get(op.action.as_str()).ok_or_else(|| {
                SearchIndexError::parse(format!(
                    "bulk response item missing `{}` body",
                    op.action
                ))
            })?;

            let external_id = body
                .get("_id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            let status = body.get("status").and_then(Value::as_u64).unwrap_or(0);

            if let Some(err) = body.get("error") {
                results.push(BulkItemResult::failed(external_id, err.to_string()));
            } else if (200..300).contains(&status) {
                // A confirmation must name the document it confirmed:
                // reconciling it would overwrite a known external id.
                if external_id.is_empty() {
                    return Err(SearchIndexError::parse(format!(
                        "successful `{}` item carries no _id",
                        op.action
                    )));
                }
                results.push(BulkItemResult::ok(external_id));
            } else {
                results.push(BulkItemResult::failed(
                    external_id,
                    format!("status {}", status),
                ));
            }
        }

        Ok(results)
    }
}

#[async_trait]
impl SearchIndexProvider for OpenSearchProvider {
    fn index_name(&self) -> &str {
        &self.index
    }

    async fn index_exists(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .indices()
            .exists(IndicesExistsParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }

    async fn create_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .create(IndicesCreateParts::Index(&self.index))
            .body(self.settings.to_body())
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Index creation failed");
            return Err(SearchIndexError::index_management(format!(
                "create failed with status {}: {}",
                status, body
            )));
        }

        info!(index = %self.index, "Created index");
        Ok(())
    }

    async fn delete_index(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .indices()
            .delete(IndicesDeleteParts::Index(&[&self.index]))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Index deletion failed");
            return Err(SearchIndexError::index_management(format!(
                "delete failed with status {}: {}",
                status, body
            )));
        }

        info!(index = %self.index, "Deleted index");
        Ok(())
    }

    async fn register_mapping(&self, mapping: &Mapping) -> Result<(), SearchIndexError> {
        let mut properties = serde_json::Map::new();
        for field in &mapping.fields {
            properties.insert(
                field.name.clone(),
                json!({ "type": field.field_type.as_index_type() }),
            );
        }
        properties.insert(CONTENT_TYPE_FIELD.to_string(), json!({ "type": "keyword" }));

        let response = self
            .client
            .indices()
            .put_mapping(IndicesPutMappingParts::Index(&[&self.index]))
            .body(json!({ "properties": properties }))
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(
                status = %status,
                collection = %mapping.collection,
                body = %body,
                "Mapping registration failed"
            );
            return Err(SearchIndexError::mapping(format!(
                "registration for `{}` failed with status {}: {}",
                mapping.collection, status, body
            )));
        }

        debug!(
            collection = %mapping.collection,
            fields = mapping.fields.len(),
            "Registered mapping"
        );
        Ok(())
    }

    async fn bulk(
        &self,
        operations: &[BulkOperation],
    ) -> Result<Vec<BulkItemResult>, SearchIndexError> {
        if operations.is_empty() {
            return Ok(Vec::new());
        }

        let mut body: Vec<JsonBody<Value>> = Vec::with_capacity(operations.len() * 2);
        for op in operations {
            for line in self.wire_lines(op) {
                body.push(line.into());
            }
        }

        let response = self
            .client
            .bulk(BulkParts::Index(&self.index))
            .body(body)
            .send()
            .await
            .map_err(|e| SearchIndexError::bulk(e.to_string()))?;

        let status = response.status_code();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Bulk request failed");
            return Err(SearchIndexError::bulk(format!(
                "bulk failed with status {}: {}",
                status, body
            )));
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        debug!(count = operations.len(), "Bulk request completed");
        Self::parse_bulk_response(&value, operations)
    }

    async fn health_check(&self) -> Result<bool, SearchIndexError> {
        let response = self
            .client
            .ping()
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(response.status_code().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> OpenSearchProvider {
        OpenSearchProvider::new("http://localhost:9200", "entities", IndexSettings::default())
            .unwrap()
    }

    fn doc(title: &str) -> Document {
        let mut doc = Document::new();
        doc.insert("title".to_string(), json!(title));
        doc
    }

    #[tokio::test]
    async fn test_bulk_empty_is_noop() {
        // no request is issued for an empty batch, so no server is needed
        let results = provider().bulk(&[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let result =
            OpenSearchProvider::new("not a url", "entities", IndexSettings::default());
        assert!(matches!(
            result,
            Err(SearchIndexError::ValidationError(_))
        ));
    }

    #[test]
    fn test_wire_lines_index_injects_content_type() {
        let p = provider();
        let op = BulkOperation::index("entities", "forum_topic", None, doc("Hello"));

        let lines = p.wire_lines(&op);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["index"]["_index"], "entities");
        assert!(lines[0]["index"].get("_id").is_none());
        assert_eq!(lines[1]["title"], "Hello");
        assert_eq!(lines[1]["content_type"], "forum_topic");
    }

    #[test]
    fn test_wire_lines_update_wraps_doc() {
        let p = provider();
        let op = BulkOperation::update("entities", "forum_topic", "42", doc("Hello")).unwrap();

        let lines = p.wire_lines(&op);

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["update"]["_id"], "42");
        assert_eq!(lines[1]["doc"]["title"], "Hello");
    }

    #[test]
    fn test_wire_lines_delete_has_no_payload() {
        let p = provider();
        let op = BulkOperation::delete("entities", "forum_topic", "42").unwrap();

        let lines = p.wire_lines(&op);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["delete"]["_id"], "42");
    }

    #[test]
    fn test_parse_bulk_response_in_order() {
        let ops = vec![
            BulkOperation::index("entities", "forum_topic", None, doc("a")),
            BulkOperation::update("entities", "forum_topic", "2", doc("b")).unwrap(),
        ];
        let response = json!({
            "items": [
                { "index": { "_id": "assigned-1", "status": 201 } },
                { "update": { "_id": "2", "status": 200 } }
            ]
        });

        let results = OpenSearchProvider::parse_bulk_response(&response, &ops).unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0], BulkItemResult::ok("assigned-1"));
        assert_eq!(results[1], BulkItemResult::ok("2"));
    }

    #[test]
    fn test_parse_bulk_response_reports_item_failure() {
        let ops = vec![BulkOperation::index("entities", "forum_topic", None, doc("a"))];
        let response = json!({
            "items": [
                { "index": { "_id": "1", "status": 400, "error": { "type": "mapper_parsing_exception" } } }
            ]
        });

        let results = OpenSearchProvider::parse_bulk_response(&response, &ops).unwrap();

        assert_eq!(results.len(), 1);
        assert!(!results[0].success);
        assert!(results[0].error.as_deref().unwrap().contains("mapper_parsing_exception"));
    }

    #[test]
    fn test_parse_bulk_response_rejects_success_without_id() {
        let ops = vec![BulkOperation::index("entities", "forum_topic", None, doc("a"))];
        let response = json!({
            "items": [ { "index": { "status": 201 } } ]
        });

        let result = OpenSearchProvider::parse_bulk_response(&response, &ops);
        assert!(matches!(result, Err(SearchIndexError::ParseError(_))));
    }

    #[test]
    fn test_parse_bulk_response_count_mismatch() {
        let ops = vec![
            BulkOperation::index("entities", "forum_topic", None, doc("a")),
            BulkOperation::index("entities", "forum_topic", None, doc("b")),
        ];
        let response = json!({
            "items": [ { "index": { "_id": "1", "status": 201 } } ]
        });

        let result = OpenSearchProvider::parse_bulk_response(&response, &ops);
        assert!(matches!(result, Err(SearchIndexError::ParseError(_))));
    }

    #[test]
    fn test_parse_bulk_response_missing_items() {
        let ops = vec![BulkOperation::index("entities", "forum_topic", None, doc("a"))];
        let result = OpenSearchProvider::parse_bulk_response(&json!({}), &ops);
        assert!(matches!(result, Err(SearchIndexError::ParseError(_))));
    }
}
