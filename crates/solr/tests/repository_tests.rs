//! Tests for the document repository: lookups, counts and write commands.

mod common;

use http::Method;
use serde_json::{Value, json};

use helios_solr::commands::WriteOptions;
use helios_solr::error::{ConfigError, SolrError, ValidationError};
use helios_solr::request::{JSON_CONTENT_TYPE, UPDATE_JSON_DOCS_PATH, UPDATE_PATH};
use helios_solr::types::{ParamValue, names};
use helios_solr::{DocumentRepository, SolrConfig};

use common::{MockSolr, doc, ids};

fn repository(solr: MockSolr) -> DocumentRepository<MockSolr> {
    DocumentRepository::new(solr, SolrConfig::default()).unwrap()
}

fn last_body(repo: &DocumentRepository<MockSolr>) -> Value {
    let requests = repo.transport().requests();
    let last = requests.last().unwrap();
    serde_json::from_str(last.body().unwrap()).unwrap()
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_invalid_config_is_rejected() {
    let config = SolrConfig {
        unique_key: String::new(),
        ..Default::default()
    };
    let err = DocumentRepository::new(MockSolr::with_documents(0), config)
        .err()
        .unwrap();
    assert!(matches!(
        err,
        SolrError::Config(ConfigError::InvalidSetting { .. })
    ));
}

#[test]
fn test_documents_uses_default_rows() {
    let repo = repository(MockSolr::with_documents(0));
    assert_eq!(
        repo.documents().params().get(names::ROWS),
        Some(&ParamValue::Integer(10))
    );
}

// ============================================================================
// Reads
// ============================================================================

#[tokio::test]
async fn test_find_by_unique_key() {
    let repo = repository(MockSolr::with_documents(5));
    let found = repo.find("doc-003").await.unwrap();
    assert_eq!(found["rank"], json!(3));

    let sent = repo.transport().requests();
    assert_eq!(sent[0].params().values_of(names::Q), vec![r#"id:"doc\-003""#]);
}

#[tokio::test]
async fn test_find_missing_is_not_found() {
    let repo = repository(MockSolr::with_documents(5));
    let err = repo.find("nope").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "document not found: id=nope");
}

#[tokio::test]
async fn test_search_clamps_rows() {
    let config = SolrConfig {
        max_rows: 5,
        default_rows: 5,
        ..Default::default()
    };
    let repo = DocumentRepository::new(MockSolr::with_documents(20), config).unwrap();

    let response = repo.search(&repo.documents().all().rows(500)).await.unwrap();
    assert_eq!(response.docs().len(), 5);
    assert_eq!(response.num_found(), 20);
}

#[tokio::test]
async fn test_search_clamps_out_of_range_rows() {
    let config = SolrConfig {
        max_rows: 5,
        default_rows: 5,
        ..Default::default()
    };
    let repo = DocumentRepository::new(MockSolr::with_documents(20), config).unwrap();

    let oversized = repo.documents().all().param(names::ROWS, 5_000_000_000i64).unwrap();
    let response = repo.search(&oversized).await.unwrap();
    assert_eq!(response.docs().len(), 5);

    let negative = repo.documents().all().param(names::ROWS, -1i64).unwrap();
    let response = repo.search(&negative).await.unwrap();
    assert!(response.docs().is_empty());

    let sent: Vec<Vec<String>> = repo
        .transport()
        .requests()
        .iter()
        .map(|r| r.params().values_of(names::ROWS))
        .collect();
    assert_eq!(sent, vec![vec!["5"], vec!["0"]]);
}

#[tokio::test]
async fn test_each_uses_cursor_when_requested() {
    let repo = repository(MockSolr::with_documents(12));
    let docs = repo
        .each(&repo.documents().all().rows(5).cursor())
        .collect()
        .await
        .unwrap();
    assert_eq!(docs.len(), 12);

    let docs = repo.each(&repo.documents().all().rows(5)).collect().await.unwrap();
    assert_eq!(docs.len(), 5);
}

#[tokio::test]
async fn test_count_exact() {
    let repo = repository(MockSolr::with_documents(42));
    assert_eq!(repo.count(&repo.documents().all()).await.unwrap(), 42);
    assert_eq!(repo.transport().requests().len(), 1);
}

#[tokio::test]
async fn test_count_approximate_enumerates() {
    let repo = repository(MockSolr::with_documents(42).with_approximate_counts());
    assert_eq!(repo.count(&repo.documents().all()).await.unwrap(), 42);

    let requests = repo.transport().requests();
    assert!(requests.len() > 1);
    assert!(requests[1..].iter().all(|r| r.is_cursor()));
    assert_eq!(requests[1].params().values_of(names::FL), vec!["id"]);
}

#[tokio::test]
async fn test_count_enumeration_ignores_start_offset() {
    let repo = repository(MockSolr::with_documents(42).with_approximate_counts());
    let request = repo.documents().all().start(30);
    assert_eq!(repo.count(&request).await.unwrap(), 42);

    let requests = repo.transport().requests();
    assert!(requests[1..].iter().all(|r| !r.params().contains(names::START)));
}

// ============================================================================
// Writes
// ============================================================================

#[tokio::test]
async fn test_index_assigns_ids_and_posts_documents() {
    let repo = repository(MockSolr::with_documents(0));
    let records = vec![doc(json!({"title": "a"})), doc(json!({"id": "b", "title": "b"}))];

    repo.index(&records, &WriteOptions::new().with_commit(true))
        .await
        .unwrap();

    let requests = repo.transport().requests();
    let sent = requests.last().unwrap();
    assert_eq!(sent.method(), Method::POST);
    assert_eq!(sent.base_path(), UPDATE_JSON_DOCS_PATH);
    assert_eq!(sent.content_type(), Some(JSON_CONTENT_TYPE));
    assert_eq!(sent.params().get(names::COMMIT), Some(&ParamValue::Bool(true)));

    let stored = repo.transport().documents();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|d| d["id"].is_string()));
    assert!(ids(&stored).contains(&"b".to_string()));
}

#[tokio::test]
async fn test_update_skips_records_without_id() {
    let repo = repository(MockSolr::with_documents(2));
    let records = vec![
        doc(json!({"id": "doc-000", "rank": 100})),
        doc(json!({"rank": 200})),
    ];

    repo.update(&records, &WriteOptions::new().with_overwrite(true))
        .await
        .unwrap();

    assert_eq!(last_body(&repo), json!([{"id": "doc-000", "rank": 100}]));
    let stored = repo.transport().documents();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0]["rank"], json!(100));
}

#[tokio::test]
async fn test_delete_by_ids() {
    let repo = repository(MockSolr::with_documents(3));
    let records = vec![doc(json!({"id": "doc-000"})), doc(json!({"id": "doc-002"}))];

    repo.delete(&records, &WriteOptions::new().with_expunge_deletes(true))
        .await
        .unwrap();

    assert_eq!(last_body(&repo), json!({"delete": ["doc-000", "doc-002"]}));
    let requests = repo.transport().requests();
    let sent = requests.last().unwrap();
    assert_eq!(sent.base_path(), UPDATE_PATH);
    assert!(sent.params().contains(names::EXPUNGE_DELETES));
    assert_eq!(ids(&repo.transport().documents()), vec!["doc-001"]);
}

#[tokio::test]
async fn test_delete_without_id_sends_nothing() {
    let repo = repository(MockSolr::with_documents(3));
    let records = vec![doc(json!({"title": "orphan"}))];

    let err = repo.delete(&records, &WriteOptions::new()).await.unwrap_err();
    assert!(matches!(
        err,
        SolrError::Validation(ValidationError::MissingIdentifier { index: 0, .. })
    ));
    assert!(repo.transport().requests().is_empty());
}

#[tokio::test]
async fn test_delete_by_query() {
    let repo = repository(MockSolr::with_documents(3));
    repo.delete_by_query("*:*").await.unwrap();

    assert_eq!(last_body(&repo), json!({"delete": {"query": "*:*"}}));
    assert!(repo.transport().documents().is_empty());
}
