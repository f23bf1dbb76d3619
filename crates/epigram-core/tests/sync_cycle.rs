//! End-to-end sync cycles against a mock quote server

use epigram_core::{Config, QuoteStore, RemoteClient, SyncEngine, SyncOutcome};
use epigram_core::models::{Quote, QuoteId};
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_store(temp_dir: &TempDir, server: &MockServer) -> QuoteStore {
    QuoteStore::open_with_config(Config {
        data_dir: temp_dir.path().to_path_buf(),
        server_url: server.uri(),
        ..Config::default()
    })
}

fn engine_for(store: &QuoteStore) -> SyncEngine {
    SyncEngine::new(RemoteClient::from_config(store.config()).unwrap())
}

fn pull_batch() -> serde_json::Value {
    serde_json::json!([
        {"id": 1, "title": "Stoicism", "body": "What stands in the way becomes the way."},
        {"id": 50, "title": "Focus", "body": "server copy"}
    ])
}

async fn mount_pull(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("_limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_cycle_pushes_promotes_and_merges() {
    let server = MockServer::start().await;
    mount_pull(&server, pull_batch()).await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({"id": 101})))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);

    let local = Quote::new("mine", "Personal").unwrap();
    store.replace_all(vec![
        local.clone(),
        Quote::with_id(QuoteId::remote("50"), "stale local copy", "Focus"),
    ]);

    let engine = engine_for(&store);
    let outcome = engine.sync_once(&mut store).await.unwrap();

    let SyncOutcome::Completed(summary) = outcome else {
        panic!("cycle was skipped");
    };
    assert_eq!(summary.pulled, 2);
    assert_eq!(summary.pushed, 1);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.conflicts, 1);

    // The local quote was promoted to its server id
    assert!(store.find_by_id(&local.id).is_none());
    let promoted = store.find_by_id(&QuoteId::remote("101")).unwrap();
    assert_eq!(promoted.text, "mine");
    assert_eq!(promoted.category, "Personal");

    // Server won the diverging record and the new one was inserted
    assert_eq!(
        store.find_by_id(&QuoteId::remote("50")).unwrap().text,
        "server copy"
    );
    assert!(store.find_by_id(&QuoteId::remote("1")).is_some());

    assert!(store.last_sync().is_some());
}

#[tokio::test]
async fn second_cycle_reports_no_changes() {
    let server = MockServer::start().await;
    mount_pull(&server, pull_batch()).await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);
    // Only remote-known quotes, so no pushes are attempted
    store.replace_all(vec![Quote::with_id(QuoteId::remote("60"), "kept", "Keep")]);

    let engine = engine_for(&store);

    let SyncOutcome::Completed(first) = engine.sync_once(&mut store).await.unwrap() else {
        panic!("cycle was skipped");
    };
    assert_eq!(first.added, 2);

    let SyncOutcome::Completed(second) = engine.sync_once(&mut store).await.unwrap() else {
        panic!("cycle was skipped");
    };
    assert!(second.is_noop());
    assert_eq!(second.to_string(), "no changes");
}

#[tokio::test]
async fn pull_failure_aborts_cycle_and_leaves_store_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);
    let before: Vec<Quote> = store.all().to_vec();

    let engine = engine_for(&store);
    assert!(engine.sync_once(&mut store).await.is_err());

    assert_eq!(store.all(), before.as_slice());
    assert!(store.last_sync().is_none());
}

#[tokio::test]
async fn push_failure_keeps_pull_progress_only() {
    let server = MockServer::start().await;
    mount_pull(&server, pull_batch()).await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);
    let local = Quote::new("unsent", "Personal").unwrap();
    store.replace_all(vec![local.clone()]);

    let engine = engine_for(&store);
    assert!(engine.sync_once(&mut store).await.is_err());

    // The failed push replaced nothing and the merge never ran
    assert_eq!(store.all(), [local].as_slice());
    assert!(store.last_sync().is_none());
}

#[tokio::test]
async fn create_without_id_falls_back_to_local_identity() {
    let server = MockServer::start().await;
    mount_pull(&server, serde_json::json!([])).await;
    Mock::given(method("POST"))
        .and(path("/posts"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);
    let local = Quote::new("unacknowledged", "Personal").unwrap();
    store.replace_all(vec![local.clone()]);

    let engine = engine_for(&store);
    let SyncOutcome::Completed(summary) = engine.sync_once(&mut store).await.unwrap() else {
        panic!("cycle was skipped");
    };

    assert_eq!(summary.pushed, 1);
    assert_eq!(store.all().len(), 1);
    // Still local-origin (under a fresh id), so a later cycle retries the push
    let replacement = &store.all()[0];
    assert!(!replacement.id.is_remote());
    assert_ne!(replacement.id, local.id);
    assert_eq!(replacement.text, "unacknowledged");
}

#[tokio::test]
async fn empty_remote_title_maps_to_general_category() {
    let server = MockServer::start().await;
    mount_pull(
        &server,
        serde_json::json!([{"id": 7, "title": "", "body": "untitled wisdom"}]),
    )
    .await;

    let temp_dir = TempDir::new().unwrap();
    let mut store = test_store(&temp_dir, &server);
    store.replace_all(Vec::new());

    let engine = engine_for(&store);
    engine.sync_once(&mut store).await.unwrap();

    let pulled = store.find_by_id(&QuoteId::remote("7")).unwrap();
    assert_eq!(pulled.category, "General");
    assert!(store.categories().contains(&"General".to_string()));
}
