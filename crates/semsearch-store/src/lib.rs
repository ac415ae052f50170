//! Vector-store plumbing for the semsearch tools.
//!
//! Provides a shared, lazily built handle to a Qdrant client and an
//! idempotent step that makes sure the target collection exists. All
//! indexing and search happen inside Qdrant itself.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod collection;
pub mod connector;
pub mod error;
pub mod qdrant;
pub mod settings;
pub mod store;

pub use collection::{CollectionSpec, CreateOutcome, Distance, EnsureOutcome, VectorParams};
pub use connector::Connector;
pub use error::{StoreError, StoreResult};
pub use qdrant::QdrantHttp;
pub use settings::QdrantSettings;
pub use store::VectorStore;
