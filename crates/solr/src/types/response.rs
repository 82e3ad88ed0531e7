//! Decoded search engine responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;

use super::document::Document;

/// The `responseHeader` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseHeader {
    /// Engine status code (0 on success).
    #[serde(default)]
    pub status: i64,

    /// Query time in milliseconds.
    #[serde(rename = "QTime", default)]
    pub qtime: u64,

    /// Echoed request parameters, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// The `response` block of a select request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSet {
    /// Number of matching documents.
    #[serde(default)]
    pub num_found: u64,

    /// Whether `num_found` is exact. Engines that predate the flag always count exactly.
    #[serde(default = "default_num_found_exact")]
    pub num_found_exact: bool,

    /// Offset of the first returned document.
    #[serde(default)]
    pub start: u64,

    /// The returned documents, in engine order.
    #[serde(default)]
    pub docs: Vec<Document>,
}

fn default_num_found_exact() -> bool {
    true
}

impl Default for ResultSet {
    fn default() -> Self {
        Self {
            num_found: 0,
            num_found_exact: true,
            start: 0,
            docs: Vec::new(),
        }
    }
}

/// A decoded response.
///
/// Write requests carry only the header; select requests carry a
/// [`ResultSet`] and, in cursor mode, the next cursor mark.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolrResponse {
    /// Response header.
    #[serde(default)]
    pub response_header: ResponseHeader,

    /// Result set, absent for update requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResultSet>,

    /// Continuation token for cursor requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor_mark: Option<String>,
}

impl SolrResponse {
    /// Creates a select response holding `docs`.
    pub fn new(docs: Vec<Document>) -> Self {
        let num_found = docs.len() as u64;
        Self {
            response_header: ResponseHeader::default(),
            response: Some(ResultSet {
                num_found,
                docs,
                ..Default::default()
            }),
            next_cursor_mark: None,
        }
    }

    /// Sets the hit count.
    pub fn with_num_found(mut self, num_found: u64, exact: bool) -> Self {
        let result = self.response.get_or_insert_with(ResultSet::default);
        result.num_found = num_found;
        result.num_found_exact = exact;
        self
    }

    /// Sets the next cursor mark.
    pub fn with_next_cursor_mark(mut self, mark: impl Into<String>) -> Self {
        self.next_cursor_mark = Some(mark.into());
        self
    }

    /// Decodes a response from its JSON form.
    pub fn from_value(value: Value) -> Result<Self, TransportError> {
        serde_json::from_value(value).map_err(|e| TransportError::Decode {
            message: e.to_string(),
        })
    }

    /// Number of matching documents (0 when there is no result set).
    pub fn num_found(&self) -> u64 {
        self.response.as_ref().map(|r| r.num_found).unwrap_or(0)
    }

    /// Whether [`num_found`](Self::num_found) is exact.
    pub fn num_found_exact(&self) -> bool {
        self.response
            .as_ref()
            .map(|r| r.num_found_exact)
            .unwrap_or(true)
    }

    /// The returned documents.
    pub fn docs(&self) -> &[Document] {
        self.response
            .as_ref()
            .map(|r| r.docs.as_slice())
            .unwrap_or_default()
    }

    /// Takes ownership of the returned documents.
    pub fn into_docs(self) -> Vec<Document> {
        self.response.map(|r| r.docs).unwrap_or_default()
    }
}
