//! Test infrastructure for the Solr client.
//!
//! [`MockSolr`] is an in-memory [`Transport`] over a fixed document set. It
//! implements the parts of the engine protocol the client relies on:
//! `*:*` and unique-key queries, `start`/`rows` windows, cursor marks, and the
//! JSON update handlers. Every request it receives is recorded.

#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use http::Method;
use serde_json::{Value, json};

use helios_solr::error::TransportError;
use helios_solr::query::unquote;
use helios_solr::request::{INITIAL_CURSOR_MARK, SELECT_PATH, UPDATE_JSON_DOCS_PATH, UPDATE_PATH};
use helios_solr::types::{document, names};
use helios_solr::{Document, DocumentsRequest, SolrResponse, Transport};

const MARK_PREFIX: &str = "after:";

/// In-memory engine.
pub struct MockSolr {
    unique_key: String,
    docs: Mutex<Vec<Document>>,
    requests: Mutex<Vec<DocumentsRequest>>,
    exact_counts: bool,
    fail_on_call: Option<usize>,
}

impl MockSolr {
    /// Creates an engine holding `docs`, kept in unique-key order.
    pub fn new(docs: Vec<Document>) -> Self {
        let mock = Self {
            unique_key: "id".to_string(),
            docs: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            exact_counts: true,
            fail_on_call: None,
        };
        mock.store(docs);
        mock
    }

    /// Creates an engine holding `count` documents `doc-000`, `doc-001`, ...
    pub fn with_documents(count: usize) -> Self {
        Self::new(numbered_docs(count))
    }

    /// Reports every hit count as approximate.
    pub fn with_approximate_counts(mut self) -> Self {
        self.exact_counts = false;
        self
    }

    /// Fails the `n`th request (1-based) with HTTP 503.
    pub fn failing_on_call(mut self, n: usize) -> Self {
        self.fail_on_call = Some(n);
        self
    }

    /// Every request received so far.
    pub fn requests(&self) -> Vec<DocumentsRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The cursor marks of every request received so far.
    pub fn cursor_marks(&self) -> Vec<Option<String>> {
        self.requests().iter().map(|r| r.cursor_mark()).collect()
    }

    /// Current contents, in unique-key order.
    pub fn documents(&self) -> Vec<Document> {
        self.docs.lock().unwrap().clone()
    }

    fn key_of(&self, doc: &Document) -> String {
        document::identifier(doc, &self.unique_key)
            .map(document::identifier_text)
            .unwrap_or_default()
    }

    fn store(&self, incoming: Vec<Document>) {
        let mut docs = self.docs.lock().unwrap();
        for doc in incoming {
            let key = self.key_of(&doc);
            docs.retain(|existing| self.key_of(existing) != key);
            docs.push(doc);
        }
        docs.sort_by_key(|doc| self.key_of(doc));
    }

    fn matching(&self, request: &DocumentsRequest) -> Vec<Document> {
        let docs = self.documents();
        let prefix = format!("{}:", self.unique_key);
        let clauses = request.params().values_of(names::Q);
        match clauses.first().and_then(|q| q.strip_prefix(prefix.as_str())) {
            Some(quoted) => {
                let id = unquote(quoted).unwrap_or_else(|| quoted.to_string());
                docs.into_iter().filter(|d| self.key_of(d) == id).collect()
            }
            None => docs,
        }
    }

    fn int_param(request: &DocumentsRequest, name: &str, default: usize) -> usize {
        request
            .params()
            .values_of(name)
            .first()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn select(&self, request: &DocumentsRequest) -> SolrResponse {
        let matches = self.matching(request);
        let total = matches.len();
        let rows = Self::int_param(request, names::ROWS, 10);

        let (offset, mark) = match request.cursor_mark() {
            Some(mark) => {
                let offset = if mark == INITIAL_CURSOR_MARK {
                    0
                } else {
                    mark.strip_prefix(MARK_PREFIX)
                        .and_then(|n| n.parse().ok())
                        .unwrap_or(total)
                };
                (offset, Some(mark))
            }
            None => (Self::int_param(request, names::START, 0), None),
        };

        let page: Vec<Document> = matches.into_iter().skip(offset).take(rows).collect();
        let mut response = SolrResponse::new(Vec::new()).with_num_found(total as u64, self.exact_counts);
        if let Some(mark) = mark {
            let next = if page.is_empty() {
                mark
            } else {
                format!("{}{}", MARK_PREFIX, offset + page.len())
            };
            response = response.with_next_cursor_mark(next);
        }
        if let Some(result) = response.response.as_mut() {
            result.start = offset as u64;
            result.docs = page;
        }
        response
    }

    fn update(&self, request: &DocumentsRequest) -> Result<SolrResponse, TransportError> {
        let body: Value = serde_json::from_str(request.body().unwrap_or("null")).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
        })?;

        match request.base_path() {
            UPDATE_JSON_DOCS_PATH => {
                let docs = body
                    .as_array()
                    .map(|docs| docs.iter().filter_map(|d| document::from_value(d.clone())).collect())
                    .unwrap_or_default();
                self.store(docs);
            }
            UPDATE_PATH => match &body["delete"] {
                Value::Array(ids) => {
                    let ids: Vec<String> = ids.iter().map(document::identifier_text).collect();
                    self.docs
                        .lock()
                        .unwrap()
                        .retain(|d| !ids.contains(&self.key_of(d)));
                }
                Value::Object(query) if query.get("query") == Some(&json!("*:*")) => {
                    self.docs.lock().unwrap().clear();
                }
                _ => {}
            },
            other => {
                return Err(TransportError::Status {
                    path: other.to_string(),
                    status: 404,
                    body: String::new(),
                });
            }
        }
        Ok(SolrResponse::default())
    }
}

#[async_trait]
impl Transport for MockSolr {
    async fn execute(&self, request: &DocumentsRequest) -> Result<SolrResponse, TransportError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        if self.fail_on_call == Some(call) {
            return Err(TransportError::Status {
                path: request.base_path().to_string(),
                status: 503,
                body: "unavailable".to_string(),
            });
        }

        if request.method() == Method::GET && request.base_path() == SELECT_PATH {
            Ok(self.select(request))
        } else {
            self.update(request)
        }
    }
}

/// Documents `doc-000` .. `doc-{count-1}` with a `rank` field.
pub fn numbered_docs(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| doc(json!({ "id": format!("doc-{:03}", i), "rank": i })))
        .collect()
}

/// Builds a document from a JSON object.
pub fn doc(value: Value) -> Document {
    document::from_value(value).expect("document must be a JSON object")
}

/// The unique keys of `docs`, in order.
pub fn ids(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d["id"].as_str().unwrap_or_default().to_string())
        .collect()
}
