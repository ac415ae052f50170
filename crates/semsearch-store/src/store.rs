use async_trait::async_trait;

use crate::collection::{CollectionSpec, CreateOutcome};
use crate::error::StoreResult;

/// The two remote operations the connector needs from a vector store.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Names of all collections in the store.
    async fn list_collections(&self) -> StoreResult<Vec<String>>;

    /// Create a collection. A collection that already exists under the
    /// same name is reported as [`CreateOutcome::AlreadyExists`], not as
    /// an error.
    async fn create_collection(&self, spec: &CollectionSpec) -> StoreResult<CreateOutcome>;
}
