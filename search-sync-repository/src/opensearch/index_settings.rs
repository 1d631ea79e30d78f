//! OpenSearch index settings.
//!
//! Collection mappings are registered dynamically after index creation, so
//! the creation body only carries sharding settings.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Sharding settings used when creating the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Number of primary shards.
    pub shards: u32,
    /// Number of replicas per shard.
    pub replicas: u32,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            shards: 1,
            replicas: 1,
        }
    }
}

impl IndexSettings {
    /// Render the index-creation request body.
    pub fn to_body(&self) -> Value {
        json!({
            "settings": {
                "number_of_shards": self.shards,
                "number_of_replicas": self.replicas
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_body() {
        let body = IndexSettings::default().to_body();

        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["settings"]["number_of_replicas"], 1);
        assert!(body.get("mappings").is_none());
    }
}
