//! Write commands: index, update, delete by id, and delete by query.
//!
//! Builders are pure. They never modify caller-owned records and never
//! perform I/O; the resulting [`WriteCommand`] is turned into a request with
//! [`DocumentsRequest::write`](crate::request::DocumentsRequest::write).

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{SolrResult, ValidationError};
use crate::request::{UPDATE_JSON_DOCS_PATH, UPDATE_PATH};
use crate::types::document::{self, Document};
use crate::types::params::{ParamValue, Params, names};

/// Supplies identifiers for records that lack one.
pub trait IdGenerator: Send + Sync {
    /// Returns a new unique identifier.
    fn new_id(&self) -> String;
}

/// Generates random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

impl<F> IdGenerator for F
where
    F: Fn() -> String + Send + Sync,
{
    fn new_id(&self) -> String {
        self()
    }
}

/// A write-control option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteOption {
    /// `commit`
    Commit,
    /// `commitWithin`
    CommitWithin,
    /// `overwrite`
    Overwrite,
    /// `expungeDeletes`
    ExpungeDeletes,
    /// `waitSearcher`
    WaitSearcher,
}

impl WriteOption {
    /// The request parameter name.
    pub fn param_name(&self) -> &'static str {
        match self {
            WriteOption::Commit => names::COMMIT,
            WriteOption::CommitWithin => names::COMMIT_WITHIN,
            WriteOption::Overwrite => names::OVERWRITE,
            WriteOption::ExpungeDeletes => names::EXPUNGE_DELETES,
            WriteOption::WaitSearcher => names::WAIT_SEARCHER,
        }
    }
}

/// Options accepted by index commands.
pub const INDEX_OPTIONS: &[WriteOption] = &[
    WriteOption::Commit,
    WriteOption::CommitWithin,
    WriteOption::WaitSearcher,
];

/// Options accepted by update commands.
pub const UPDATE_OPTIONS: &[WriteOption] = &[
    WriteOption::Commit,
    WriteOption::CommitWithin,
    WriteOption::Overwrite,
    WriteOption::WaitSearcher,
];

/// Options accepted by delete commands.
pub const DELETE_OPTIONS: &[WriteOption] = &[
    WriteOption::Commit,
    WriteOption::CommitWithin,
    WriteOption::WaitSearcher,
    WriteOption::ExpungeDeletes,
];

/// Caller-supplied write options. Unset options are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOptions {
    /// Hard commit after the write.
    pub commit: Option<bool>,
    /// Commit within this many milliseconds.
    pub commit_within: Option<u32>,
    /// Replace documents with the same unique key.
    pub overwrite: Option<bool>,
    /// Merge away deleted documents on commit.
    pub expunge_deletes: Option<bool>,
    /// Block until a new searcher is open.
    pub wait_searcher: Option<bool>,
}

impl WriteOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `commit`.
    pub fn with_commit(mut self, commit: bool) -> Self {
        self.commit = Some(commit);
        self
    }

    /// Sets `commitWithin`.
    pub fn with_commit_within(mut self, millis: u32) -> Self {
        self.commit_within = Some(millis);
        self
    }

    /// Sets `overwrite`.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    /// Sets `expungeDeletes`.
    pub fn with_expunge_deletes(mut self, expunge: bool) -> Self {
        self.expunge_deletes = Some(expunge);
        self
    }

    /// Sets `waitSearcher`.
    pub fn with_wait_searcher(mut self, wait: bool) -> Self {
        self.wait_searcher = Some(wait);
        self
    }

    fn value_of(&self, option: WriteOption) -> Option<ParamValue> {
        match option {
            WriteOption::Commit => self.commit.map(ParamValue::Bool),
            WriteOption::CommitWithin => self
                .commit_within
                .map(|ms| ParamValue::Integer(i64::from(ms))),
            WriteOption::Overwrite => self.overwrite.map(ParamValue::Bool),
            WriteOption::ExpungeDeletes => self.expunge_deletes.map(ParamValue::Bool),
            WriteOption::WaitSearcher => self.wait_searcher.map(ParamValue::Bool),
        }
    }

    /// Returns the parameters for the options in `allowed` that are set.
    pub fn select(&self, allowed: &[WriteOption]) -> Params {
        allowed.iter().fold(Params::new(), |params, option| {
            match self.value_of(*option) {
                Some(value) => params.with_value(option.param_name(), value),
                None => params,
            }
        })
    }
}

/// The payload of a write command.
#[derive(Debug, Clone, PartialEq)]
pub enum WritePayload {
    /// Documents to add or replace.
    Index(Vec<Document>),
    /// Unique key values to delete.
    DeleteByIds(Vec<Value>),
    /// Query whose matches are deleted.
    DeleteByQuery(String),
}

/// A write payload with its control options.
#[derive(Debug, Clone, PartialEq)]
pub struct WriteCommand {
    payload: WritePayload,
    options: Params,
}

impl WriteCommand {
    /// Creates a command.
    pub fn new(payload: WritePayload, options: Params) -> Self {
        Self { payload, options }
    }

    /// The payload.
    pub fn payload(&self) -> &WritePayload {
        &self.payload
    }

    /// The write-control parameters.
    pub fn options(&self) -> &Params {
        &self.options
    }

    /// Handler path: raw documents go to `update/json/docs`, delete envelopes to `update`.
    pub fn base_path(&self) -> &'static str {
        match self.payload {
            WritePayload::Index(_) => UPDATE_JSON_DOCS_PATH,
            WritePayload::DeleteByIds(_) | WritePayload::DeleteByQuery(_) => UPDATE_PATH,
        }
    }

    /// The JSON payload.
    pub fn to_json(&self) -> Value {
        match &self.payload {
            WritePayload::Index(docs) => Value::Array(
                docs.iter()
                    .cloned()
                    .map(Value::Object)
                    .collect(),
            ),
            WritePayload::DeleteByIds(ids) => json!({ "delete": ids }),
            WritePayload::DeleteByQuery(query) => json!({ "delete": { "query": query } }),
        }
    }

    /// The encoded request body.
    pub fn body(&self) -> SolrResult<String> {
        Ok(serde_json::to_string(&self.to_json())?)
    }
}

/// Builds write commands for a collection.
#[derive(Debug, Clone)]
pub struct CommandBuilder<G = UuidGenerator> {
    unique_key: String,
    id_generator: G,
}

impl CommandBuilder<UuidGenerator> {
    /// Creates a builder that assigns random UUIDs.
    pub fn new(unique_key: impl Into<String>) -> Self {
        Self::with_id_generator(unique_key, UuidGenerator)
    }
}

impl<G: IdGenerator> CommandBuilder<G> {
    /// Creates a builder with a custom identifier source.
    pub fn with_id_generator(unique_key: impl Into<String>, id_generator: G) -> Self {
        Self {
            unique_key: unique_key.into(),
            id_generator,
        }
    }

    /// The unique key field.
    pub fn unique_key(&self) -> &str {
        &self.unique_key
    }

    /// Builds an index command, assigning an identifier to every record without one.
    ///
    /// Records that already carry an identifier are passed through unchanged.
    pub fn index(&self, records: &[Document], options: &WriteOptions) -> WriteCommand {
        let mut assigned = 0usize;
        let docs = records
            .iter()
            .map(|record| {
                let mut doc = record.clone();
                if !document::has_identifier(&doc, &self.unique_key) {
                    doc.insert(
                        self.unique_key.clone(),
                        Value::String(self.id_generator.new_id()),
                    );
                    assigned += 1;
                }
                doc
            })
            .collect::<Vec<_>>();

        debug!(
            records = docs.len(),
            assigned_ids = assigned,
            "built index command"
        );
        WriteCommand::new(WritePayload::Index(docs), options.select(INDEX_OPTIONS))
    }

    /// Builds an update command. Records without an identifier are dropped.
    pub fn update(&self, records: &[Document], options: &WriteOptions) -> WriteCommand {
        let docs: Vec<Document> = records
            .iter()
            .filter(|record| document::has_identifier(record, &self.unique_key))
            .cloned()
            .collect();

        let dropped = records.len() - docs.len();
        if dropped > 0 {
            warn!(
                dropped,
                unique_key = %self.unique_key,
                "dropped records without identifier from update"
            );
        }
        WriteCommand::new(WritePayload::Index(docs), options.select(UPDATE_OPTIONS))
    }

    /// Builds a delete-by-id command.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingIdentifier` - a record has no identifier
    pub fn delete(&self, records: &[Document], options: &WriteOptions) -> SolrResult<WriteCommand> {
        let ids = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                document::identifier(record, &self.unique_key)
                    .cloned()
                    .ok_or_else(|| ValidationError::MissingIdentifier {
                        field: self.unique_key.clone(),
                        index,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(ids = ids.len(), "built delete command");
        Ok(WriteCommand::new(
            WritePayload::DeleteByIds(ids),
            options.select(DELETE_OPTIONS),
        ))
    }

    /// Builds a delete-by-query command from a raw clause.
    pub fn delete_by_query(&self, query: impl Into<String>) -> WriteCommand {
        WriteCommand::new(WritePayload::DeleteByQuery(query.into()), Params::new())
    }
}
