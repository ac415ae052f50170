//! Shared client handle and collection provisioning.

use std::fmt;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::collection::{CollectionSpec, CreateOutcome, EnsureOutcome};
use crate::error::{StoreError, StoreResult};
use crate::qdrant::{QdrantHttp, DEFAULT_QDRANT_URL};
use crate::settings::QdrantSettings;
use crate::store::VectorStore;

type StoreFactory<S> = Box<dyn Fn(&QdrantSettings) -> StoreResult<S> + Send + Sync>;

/// Owns the single client handle for a process and provisions the target
/// collection.
///
/// The handle is built on the first [`Connector::get_client`] call and
/// shared afterwards. Concurrent first calls wait on one construction; a
/// failed construction is not remembered, so the next call tries again.
pub struct Connector<S> {
    settings: QdrantSettings,
    factory: StoreFactory<S>,
    client: OnceCell<Arc<S>>,
}

impl Connector<QdrantHttp> {
    /// A connector backed by the Qdrant REST API.
    pub fn qdrant(settings: QdrantSettings) -> Self {
        Self::new(settings, QdrantHttp::new)
    }
}

impl<S: VectorStore> Connector<S> {
    /// A connector that builds its handle with `factory`.
    pub fn new<F>(settings: QdrantSettings, factory: F) -> Self
    where
        F: Fn(&QdrantSettings) -> StoreResult<S> + Send + Sync + 'static,
    {
        Self {
            settings,
            factory: Box::new(factory),
            client: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &QdrantSettings {
        &self.settings
    }

    /// Whether the handle has been built yet.
    pub fn is_connected(&self) -> bool {
        self.client.initialized()
    }

    /// The shared client handle, built on first use.
    ///
    /// # Errors
    /// Returns [`StoreError::Client`] wrapping the cause if the handle
    /// cannot be built.
    pub async fn get_client(&self) -> StoreResult<Arc<S>> {
        let client = self
            .client
            .get_or_try_init(|| async { self.connect() })
            .await?;
        Ok(Arc::clone(client))
    }

    fn connect(&self) -> StoreResult<Arc<S>> {
        if self.settings.url.is_none() {
            log::warn!(
                "Qdrant URL missing in configuration, using {}",
                DEFAULT_QDRANT_URL
            );
        }
        if self.settings.api_key().is_none() {
            log::warn!("Qdrant API key missing in configuration");
        }

        log::info!(
            "Initializing Qdrant client (url={}, using_api_key={})",
            self.settings.url.as_deref().unwrap_or(DEFAULT_QDRANT_URL),
            self.settings.api_key().is_some()
        );

        match (self.factory)(&self.settings) {
            Ok(client) => {
                log::info!("Qdrant client created successfully");
                Ok(Arc::new(client))
            }
            Err(e) => {
                log::error!("Failed to create Qdrant client: {}", e);
                Err(StoreError::Client(Box::new(e)))
            }
        }
    }

    /// Make sure the configured collection exists, creating it if missing.
    ///
    /// Does nothing when the collection is already listed. A create that
    /// loses a race with another creator still counts as success.
    ///
    /// # Errors
    /// Returns [`StoreError::EnsureCollection`] wrapping the cause if the
    /// client cannot be built or either request fails. Nothing is retried.
    pub async fn ensure_collection(&self) -> StoreResult<EnsureOutcome> {
        let spec = self.settings.collection_spec();
        self.provision(&spec).await.map_err(|e| {
            log::error!("Failed to ensure Qdrant collection {}: {}", spec.name, e);
            StoreError::EnsureCollection {
                collection: spec.name.clone(),
                source: Box::new(e),
            }
        })
    }

    async fn provision(&self, spec: &CollectionSpec) -> StoreResult<EnsureOutcome> {
        let client = self.get_client().await?;

        log::info!("Fetching existing Qdrant collections...");
        let existing = client.list_collections().await?;

        if existing.iter().any(|name| *name == spec.name) {
            log::info!("Using existing Qdrant collection {}", spec.name);
            return Ok(EnsureOutcome::Existing);
        }

        log::info!(
            "Creating new Qdrant collection {} (vector_size={}, distance={})",
            spec.name,
            spec.params.size,
            spec.params.distance
        );
        match client.create_collection(spec).await? {
            CreateOutcome::Created => {
                log::info!("Qdrant collection created: {}", spec.name);
                Ok(EnsureOutcome::Created)
            }
            CreateOutcome::AlreadyExists => {
                log::info!("Qdrant collection {} was created concurrently", spec.name);
                Ok(EnsureOutcome::Existing)
            }
        }
    }
}

impl<S> fmt::Debug for Connector<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("settings", &self.settings)
            .field("connected", &self.client.initialized())
            .finish_non_exhaustive()
    }
}
