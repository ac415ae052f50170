use std::fmt;
use std::time::Duration;

use semsearch_core::Config;

use crate::collection::CollectionSpec;

/// Connection and collection settings for the Qdrant connector.
#[derive(Clone, PartialEq, Eq)]
pub struct QdrantSettings {
    pub url: Option<String>,
    pub api_key: Option<String>,
    pub collection: String,
    pub vector_size: u64,
    pub timeout: Duration,
}

impl QdrantSettings {
    /// Settings for a local, unauthenticated instance.
    pub fn new(url: impl Into<String>, collection: impl Into<String>, vector_size: u64) -> Self {
        Self {
            url: Some(url.into()),
            api_key: None,
            collection: collection.into(),
            vector_size,
            timeout: Duration::from_secs(30),
        }
    }

    /// The API key, if one is set and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }

    /// The collection `ensure_collection` provisions.
    pub fn collection_spec(&self) -> CollectionSpec {
        CollectionSpec::new(self.collection.as_str(), self.vector_size)
    }
}

impl From<&Config> for QdrantSettings {
    fn from(config: &Config) -> Self {
        Self {
            url: config.qdrant_url.clone(),
            api_key: config.qdrant_api_key.clone(),
            collection: config.collection().to_string(),
            vector_size: config.vector_size(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl fmt::Debug for QdrantSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QdrantSettings")
            .field("url", &self.url)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .field("collection", &self.collection)
            .field("vector_size", &self.vector_size)
            .field("timeout", &self.timeout)
            .finish()
    }
}
