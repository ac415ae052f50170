//! Connector behaviour against an in-memory store.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use semsearch_store::{
    CollectionSpec, Connector, CreateOutcome, Distance, EnsureOutcome, QdrantSettings, StoreError,
    StoreResult, VectorStore,
};

/// State shared between a test and the store its connector builds.
#[derive(Debug, Default)]
struct StoreState {
    collections: Mutex<Vec<String>>,
    created: Mutex<Vec<CollectionSpec>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fail_list: bool,
    report_duplicate: bool,
}

#[derive(Debug)]
struct FakeStore {
    state: Arc<StoreState>,
}

#[async_trait]
impl VectorStore for FakeStore {
    async fn list_collections(&self) -> StoreResult<Vec<String>> {
        self.state.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.fail_list {
            return Err(StoreError::Status {
                operation: "list collections",
                status: 503,
                body: String::from("unavailable"),
            });
        }
        Ok(self.state.collections.lock().unwrap().clone())
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> StoreResult<CreateOutcome> {
        self.state.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.state.report_duplicate {
            return Ok(CreateOutcome::AlreadyExists);
        }
        self.state.collections.lock().unwrap().push(spec.name.clone());
        self.state.created.lock().unwrap().push(spec.clone());
        Ok(CreateOutcome::Created)
    }
}

fn settings() -> QdrantSettings {
    QdrantSettings::new("http://localhost:6333", "images", 512)
}

/// A connector over `state`, plus a counter of factory invocations.
fn connector(state: &Arc<StoreState>) -> (Connector<FakeStore>, Arc<AtomicUsize>) {
    let builds = Arc::new(AtomicUsize::new(0));
    let factory_builds = Arc::clone(&builds);
    let factory_state = Arc::clone(state);
    let connector = Connector::new(settings(), move |_: &QdrantSettings| {
        factory_builds.fetch_add(1, Ordering::SeqCst);
        Ok(FakeStore {
            state: Arc::clone(&factory_state),
        })
    });
    (connector, builds)
}

fn state_with(collections: &[&str]) -> Arc<StoreState> {
    Arc::new(StoreState {
        collections: Mutex::new(collections.iter().map(|c| c.to_string()).collect()),
        ..StoreState::default()
    })
}

#[tokio::test]
async fn test_get_client_returns_same_handle() {
    let state = state_with(&[]);
    let (connector, builds) = connector(&state);
    assert!(!connector.is_connected());

    let first = connector.get_client().await.unwrap();
    let second = connector.get_client().await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
    assert!(connector.is_connected());
}

#[tokio::test]
async fn test_concurrent_first_calls_build_once() {
    let state = state_with(&[]);
    let (connector, builds) = connector(&state);

    let (a, b) = tokio::join!(connector.get_client(), connector.get_client());

    assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failed_construction_is_retried() {
    let state = state_with(&[]);
    let attempts = Arc::new(AtomicUsize::new(0));
    let factory_attempts = Arc::clone(&attempts);
    let factory_state = Arc::clone(&state);
    let connector = Connector::new(settings(), move |_: &QdrantSettings| {
        if factory_attempts.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(StoreError::InvalidUrl {
                url: String::new(),
                message: String::from("unreachable"),
            });
        }
        Ok(FakeStore {
            state: Arc::clone(&factory_state),
        })
    });

    let first = connector.get_client().await;
    assert!(matches!(first, Err(StoreError::Client(_))));
    assert!(!connector.is_connected());

    assert!(connector.get_client().await.is_ok());
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_missing_url_still_builds_client() {
    let mut settings = settings();
    settings.url = None;
    settings.api_key = None;
    let connector = Connector::qdrant(settings);

    let client = connector.get_client().await.unwrap();

    assert_eq!(client.base_url().as_str(), "http://localhost:6333/");
    assert!(connector.is_connected());
}

#[tokio::test]
async fn test_real_client_construction_failure_is_wrapped() {
    let mut settings = settings();
    settings.url = Some(String::from("not a url"));
    let connector = Connector::qdrant(settings);

    let err = connector.get_client().await.unwrap_err();

    assert!(err.is_client_error());
    match err {
        StoreError::Client(cause) => {
            assert!(matches!(*cause, StoreError::InvalidUrl { .. }));
        }
        other => panic!("expected Client, got {:?}", other),
    }
    assert!(!connector.is_connected());
}

#[tokio::test]
async fn test_ensure_collection_existing_is_noop() {
    let state = state_with(&["thumbnails", "images"]);
    let (connector, _) = connector(&state);

    let outcome = connector.ensure_collection().await.unwrap();

    assert_eq!(outcome, EnsureOutcome::Existing);
    assert_eq!(state.list_calls.load(Ordering::SeqCst), 1);
    assert_eq!(state.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ensure_collection_creates_once() {
    let state = state_with(&["thumbnails"]);
    let (connector, builds) = connector(&state);

    assert_eq!(connector.ensure_collection().await.unwrap(), EnsureOutcome::Created);
    assert_eq!(connector.ensure_collection().await.unwrap(), EnsureOutcome::Existing);

    assert_eq!(state.create_calls.load(Ordering::SeqCst), 1);
    assert_eq!(builds.load(Ordering::SeqCst), 1);

    let created = state.created.lock().unwrap();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].name, "images");
    assert_eq!(created[0].vector_name, "default");
    assert_eq!(created[0].params.size, 512);
    assert_eq!(created[0].params.distance, Distance::Cosine);
    assert!(created[0].params.on_disk);
}

#[tokio::test]
async fn test_duplicate_create_counts_as_existing() {
    let state = Arc::new(StoreState {
        report_duplicate: true,
        ..StoreState::default()
    });
    let (connector, _) = connector(&state);

    let outcome = connector.ensure_collection().await.unwrap();

    assert_eq!(outcome, EnsureOutcome::Existing);
    assert_eq!(state.create_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_listing_failure_is_wrapped() {
    let state = Arc::new(StoreState {
        fail_list: true,
        ..StoreState::default()
    });
    let (connector, _) = connector(&state);

    let err = connector.ensure_collection().await.unwrap_err();

    match &err {
        StoreError::EnsureCollection { collection, source } => {
            assert_eq!(collection, "images");
            assert!(matches!(**source, StoreError::Status { status: 503, .. }));
        }
        other => panic!("expected EnsureCollection, got {:?}", other),
    }
    assert!(!err.is_client_error());
    assert_eq!(state.create_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_ensure_collection_wraps_client_failure() {
    let connector: Connector<FakeStore> =
        Connector::new(settings(), |_: &QdrantSettings| {
            Err(StoreError::InvalidUrl {
                url: String::new(),
                message: String::from("no URL configured"),
            })
        });

    let err = connector.ensure_collection().await.unwrap_err();

    assert!(matches!(err, StoreError::EnsureCollection { .. }));
    assert!(err.is_client_error());
}
