//! Collection schema and provisioning outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the single vector field every provisioned collection carries.
pub const DEFAULT_VECTOR_NAME: &str = "default";

/// Similarity function used for nearest-neighbour comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Distance {
    Cosine,
    Euclid,
    Dot,
    Manhattan,
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Cosine => "COSINE",
            Self::Euclid => "EUCLID",
            Self::Dot => "DOT",
            Self::Manhattan => "MANHATTAN",
        };
        f.write_str(name)
    }
}

/// Parameters of one named vector field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorParams {
    pub size: u64,
    pub distance: Distance,
    pub on_disk: bool,
}

/// Everything needed to create a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSpec {
    pub name: String,
    pub vector_name: String,
    pub params: VectorParams,
}

impl CollectionSpec {
    /// A collection with one `default` vector field of `size` dimensions,
    /// cosine distance and on-disk vector storage.
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            vector_name: DEFAULT_VECTOR_NAME.to_string(),
            params: VectorParams {
                size,
                distance: Distance::Cosine,
                on_disk: true,
            },
        }
    }

    /// Body of the create-collection request.
    pub fn request_body(&self) -> CreateCollectionBody<'_> {
        let mut vectors = BTreeMap::new();
        vectors.insert(self.vector_name.as_str(), &self.params);
        CreateCollectionBody { vectors }
    }
}

/// `PUT /collections/{name}` payload.
#[derive(Debug, Serialize)]
pub struct CreateCollectionBody<'a> {
    pub vectors: BTreeMap<&'a str, &'a VectorParams>,
}

/// What the store reported for a create request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    Created,
    AlreadyExists,
}

/// What `ensure_collection` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The collection was missing and has been created.
    Created,
    /// The collection was already there; nothing was changed.
    Existing,
}

impl fmt::Display for EnsureOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Existing => f.write_str("already exists"),
        }
    }
}
