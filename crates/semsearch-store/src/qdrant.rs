//! Qdrant REST API client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::collection::{CollectionSpec, CreateOutcome};
use crate::error::{StoreError, StoreResult};
use crate::settings::QdrantSettings;
use crate::store::VectorStore;

const API_KEY_HEADER: &str = "api-key";

/// Endpoint used when no URL is configured, same as the Qdrant client libraries.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6333";

/// Envelope around every Qdrant response.
#[derive(Debug, Deserialize)]
struct QdrantResponse<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct CollectionsList {
    collections: Vec<CollectionDescription>,
}

#[derive(Debug, Deserialize)]
struct CollectionDescription {
    name: String,
}

/// Thin client for the parts of the Qdrant HTTP API the connector uses.
#[derive(Debug, Clone)]
pub struct QdrantHttp {
    http: Client,
    base: Url,
}

impl QdrantHttp {
    /// Build a client for the configured endpoint.
    ///
    /// No request is made here; an unreachable server only shows up on the
    /// first call. A missing or empty URL falls back to
    /// [`DEFAULT_QDRANT_URL`].
    ///
    /// # Errors
    /// Returns an error if the URL is unusable, the API key is
    /// not a valid header value, or the HTTP client cannot be created.
    pub fn new(settings: &QdrantSettings) -> StoreResult<Self> {
        let raw = settings
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_QDRANT_URL);
        let base = Url::parse(raw).map_err(|e| StoreError::InvalidUrl {
            url: raw.to_string(),
            message: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl {
                url: raw.to_string(),
                message: String::from("not a base URL"),
            });
        }

        let mut headers = HeaderMap::new();
        if let Some(api_key) = settings.api_key() {
            let mut value = HeaderValue::from_str(api_key)?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        let http = Client::builder()
            .timeout(settings.timeout)
            .user_agent(concat!("semsearch/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { http, base })
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// `{base}/collections[/{name}]`, with `name` percent-encoded.
    fn collections_url(&self, name: Option<&str>) -> StoreResult<Url> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| StoreError::InvalidUrl {
                url: self.base.to_string(),
                message: String::from("not a base URL"),
            })?;
            segments.pop_if_empty().push("collections");
            if let Some(name) = name {
                segments.push(name);
            }
        }
        Ok(url)
    }
}

#[async_trait]
impl VectorStore for QdrantHttp {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        let url = self.collections_url(None)?;
        log::debug!("GET {}", url);

        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(StoreError::Status {
                operation: "list collections",
                status: status.as_u16(),
                body,
            });
        }

        let listing = response.json::<QdrantResponse<CollectionsList>>().await?;
        Ok(listing
            .result
            .collections
            .into_iter()
            .map(|collection| collection.name)
            .collect())
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> StoreResult<CreateOutcome> {
        let url = self.collections_url(Some(&spec.name))?;
        log::debug!("PUT {}", url);

        let response = self.http.put(url).json(&spec.request_body()).send().await?;
        let status = response.status();
        let body = response.text().await?;
        classify_create(status, body)
    }
}

/// Map a create-collection response onto an outcome.
///
/// Qdrant answers a duplicate create with 409, or with 400 and an
/// "already exists" message on older servers.
fn classify_create(status: StatusCode, body: String) -> StoreResult<CreateOutcome> {
    if status.is_success() {
        Ok(CreateOutcome::Created)
    } else if status == StatusCode::CONFLICT
        || (status == StatusCode::BAD_REQUEST && body.contains("already exists"))
    {
        Ok(CreateOutcome::AlreadyExists)
    } else {
        Err(StoreError::Status {
            operation: "create collection",
            status: status.as_u16(),
            body,
        })
    }
}
