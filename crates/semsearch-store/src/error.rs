//! Error types for the vector-store connector.

use thiserror::Error;

/// Errors that can occur while talking to the vector store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configured URL is missing or cannot be used as an API base.
    #[error("invalid Qdrant URL {url:?}: {message}")]
    InvalidUrl { url: String, message: String },

    /// The API key cannot be sent as a header value.
    #[error("invalid Qdrant API key: {0}")]
    InvalidApiKey(#[from] reqwest::header::InvalidHeaderValue),

    /// An error propagated from `reqwest`.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Qdrant answered with a non-success status.
    #[error("Qdrant returned {status} for {operation}: {body}")]
    Status {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// Building the client handle failed.
    #[error("error creating Qdrant client: {0}")]
    Client(#[source] Box<StoreError>),

    /// Listing or creating the target collection failed.
    #[error("error ensuring Qdrant collection {collection}: {source}")]
    EnsureCollection {
        collection: String,
        #[source]
        source: Box<StoreError>,
    },
}

impl StoreError {
    /// Returns `true` when the error came from building the client rather
    /// than from a request.
    pub fn is_client_error(&self) -> bool {
        match self {
            Self::Client(_) => true,
            Self::EnsureCollection { source, .. } => source.is_client_error(),
            _ => false,
        }
    }
}

/// Convenience alias for store results.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
