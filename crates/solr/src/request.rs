//! Request descriptors.
//!
//! A [`DocumentsRequest`] carries everything the transport needs to issue
//! one HTTP request: method, handler path, parameters, and an optional body.
//! Every setter returns a new descriptor and leaves the receiver unchanged.

use http::Method;
use regex::Regex;
use tracing::debug;

use crate::commands::WriteCommand;
use crate::error::SolrResult;
use crate::query::QueryBuilder;
use crate::query::value::quote;
use crate::types::params::{ParamValue, Params, Scalar, names};

/// Search handler path.
pub const SELECT_PATH: &str = "select";

/// JSON update handler path (delete envelopes).
pub const UPDATE_PATH: &str = "update";

/// JSON document update handler path (raw document arrays).
pub const UPDATE_JSON_DOCS_PATH: &str = "update/json/docs";

/// Content type of write bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Cursor mark that starts a new enumeration.
pub const INITIAL_CURSOR_MARK: &str = "*";

/// Default unique key field.
pub const DEFAULT_UNIQUE_KEY: &str = "id";

/// A request against the documents collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentsRequest {
    method: Method,
    base_path: String,
    params: Params,
    body: Option<String>,
    content_type: Option<String>,
    unique_key: String,
}

impl Default for DocumentsRequest {
    fn default() -> Self {
        Self::new(DEFAULT_UNIQUE_KEY)
    }
}

impl DocumentsRequest {
    /// Creates a select request for a collection whose unique key is `unique_key`.
    pub fn new(unique_key: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            base_path: SELECT_PATH.to_string(),
            params: Params::new(),
            body: None,
            content_type: None,
            unique_key: unique_key.into(),
        }
    }

    /// HTTP method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Handler path relative to the collection.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Request parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Request body, for write requests.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Body content type, for write requests.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// The unique key field.
    pub fn unique_key(&self) -> &str {
        &self.unique_key
    }

    fn with_params(&self, params: Params) -> Self {
        Self {
            params,
            ..self.clone()
        }
    }

    fn with(&self, name: &str, value: ParamValue) -> Self {
        self.with_params(self.params.with_value(name, value))
    }

    /// Merges `params` into this request. See [`Params::merge`].
    pub fn add_params(&self, params: &Params) -> Self {
        self.with_params(self.params.merge(params))
    }

    /// Sets a known parameter by name, coercing the value.
    pub fn param(&self, name: &str, value: impl Into<Scalar>) -> SolrResult<Self> {
        Ok(self.with_params(self.params.set_single(name, value)?))
    }

    //
    // Query
    //

    /// Sets the main query; clauses are space-joined.
    pub fn q<I, S>(&self, clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let clauses = clauses.into_iter().map(Into::into).collect();
        self.with(names::Q, ParamValue::List(clauses))
    }

    /// Sets the main query from a clause builder.
    pub fn query(&self, builder: QueryBuilder) -> Self {
        self.q(builder.build())
    }

    /// Appends filter queries.
    pub fn fq<I, S>(&self, clauses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_params(self.params.set_multi_valued(names::FQ, clauses))
    }

    /// Appends filter queries from a clause builder.
    pub fn filter(&self, builder: QueryBuilder) -> Self {
        self.fq(builder.build())
    }

    /// Matches every document.
    pub fn all(&self) -> Self {
        self.q(["*:*"])
    }

    /// Matches the document whose unique key is `id`.
    pub fn by_unique_key(&self, id: &str) -> Self {
        self.q([format!("{}:{}", self.unique_key, quote(id))])
    }

    //
    // Common query parameters
    //

    /// Sets the field list.
    pub fn fl<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        self.with(names::FL, ParamValue::List(fields))
    }

    /// Alias for [`fl`](Self::fl).
    pub fn fields<I, S>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fl(fields)
    }

    /// Sets the sort criteria, e.g. `["score desc", "id asc"]`.
    pub fn sort<I, S>(&self, criteria: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let criteria = criteria.into_iter().map(Into::into).collect();
        self.with(names::SORT, ParamValue::List(criteria))
    }

    /// Sets the result offset.
    pub fn start(&self, offset: u32) -> Self {
        self.with(names::START, ParamValue::Integer(i64::from(offset)))
    }

    /// Sets the page size.
    pub fn rows(&self, num: u32) -> Self {
        self.with(names::ROWS, ParamValue::Integer(i64::from(num)))
    }

    /// Alias for [`rows`](Self::rows).
    pub fn limit(&self, num: u32) -> Self {
        self.rows(num)
    }

    /// Enables or disables the filter cache.
    pub fn cache(&self, enabled: bool) -> Self {
        self.with(names::CACHE, ParamValue::Bool(enabled))
    }

    /// Enables early segment termination.
    pub fn segment_terminate_early(&self, enabled: bool) -> Self {
        self.with(names::SEGMENT_TERMINATE_EARLY, ParamValue::Bool(enabled))
    }

    /// Sets the server-side time budget. This is a hint to the engine, not a client deadline.
    pub fn time_allowed(&self, millis: u32) -> Self {
        self.with(names::TIME_ALLOWED, ParamValue::Integer(i64::from(millis)))
    }

    /// Sets the `explainOther` query.
    pub fn explain_other(&self, query: &str) -> Self {
        self.with(names::EXPLAIN_OTHER, ParamValue::Text(query.to_string()))
    }

    /// Suppresses the response header.
    pub fn omit_header(&self, omit: bool) -> Self {
        self.with(names::OMIT_HEADER, ParamValue::Bool(omit))
    }

    /// Selects the query parser.
    pub fn def_type(&self, value: &str) -> Self {
        self.with(names::DEF_TYPE, ParamValue::Text(value.to_string()))
    }

    /// Sets the debug output (`query`, `timing`, `results`, `all` or `true`).
    pub fn debug(&self, setting: &str) -> SolrResult<Self> {
        self.param(names::DEBUG, setting)
    }

    /// Sets parameter echoing (`explicit`, `all` or `none`).
    pub fn echo_params(&self, setting: &str) -> SolrResult<Self> {
        self.param(names::ECHO_PARAMS, setting)
    }

    /// Sets the threshold below which hit counts are exact.
    pub fn min_exact_count(&self, num: u32) -> Self {
        self.with(names::MIN_EXACT_COUNT, ParamValue::Integer(i64::from(num)))
    }

    //
    // Commit parameters
    //

    /// Requests a hard commit.
    pub fn commit(&self, value: bool) -> Self {
        self.with(names::COMMIT, ParamValue::Bool(value))
    }

    /// Requests a commit within `millis`; `None` clears the option.
    pub fn commit_within(&self, millis: Option<u32>) -> Self {
        match millis {
            Some(ms) => self.with(names::COMMIT_WITHIN, ParamValue::Integer(i64::from(ms))),
            None => self.with_params(self.params.without(names::COMMIT_WITHIN)),
        }
    }

    /// Replaces documents that share a unique key.
    pub fn overwrite(&self, value: bool) -> Self {
        self.with(names::OVERWRITE, ParamValue::Bool(value))
    }

    /// Merges away deleted documents on commit.
    pub fn expunge_deletes(&self, value: bool) -> Self {
        self.with(names::EXPUNGE_DELETES, ParamValue::Bool(value))
    }

    /// Blocks until a new searcher is open.
    pub fn wait_searcher(&self, value: bool) -> Self {
        self.with(names::WAIT_SEARCHER, ParamValue::Bool(value))
    }

    //
    // Cursor
    //

    /// Requests cursor pagination from the start of the result set.
    ///
    /// The sort criteria are extended with `<unique key> ASC` unless they
    /// already mention the unique key.
    pub fn cursor(&self) -> Self {
        self.with_cursor_mark(INITIAL_CURSOR_MARK)
            .ensure_unique_key_sort()
    }

    /// Returns true if this request asks for cursor pagination.
    pub fn is_cursor(&self) -> bool {
        self.params.contains(names::CURSOR_MARK)
    }

    /// The cursor mark this request will send.
    pub fn cursor_mark(&self) -> Option<String> {
        self.params
            .get(names::CURSOR_MARK)
            .map(|value| value.to_string())
    }

    /// Sets the cursor mark, e.g. to resume an interrupted enumeration.
    ///
    /// Cursor requests cannot carry an offset, so `start` is removed.
    pub fn with_cursor_mark(&self, mark: &str) -> Self {
        let params = self
            .params
            .without(names::START)
            .with_value(names::CURSOR_MARK, ParamValue::Text(mark.to_string()));
        self.with_params(params)
    }

    /// Returns true if the sort criteria mention the unique key as a whole word.
    pub fn sorts_by_unique_key(&self) -> bool {
        let pattern = format!(r"\b{}\b", regex::escape(&self.unique_key));
        match Regex::new(&pattern) {
            Ok(re) => self
                .params
                .values_of(names::SORT)
                .iter()
                .any(|criterion| re.is_match(criterion)),
            Err(_) => false,
        }
    }

    /// Appends `<unique key> ASC` to the sort criteria when they do not
    /// already include the unique key. Cursor pagination needs a total order.
    pub fn ensure_unique_key_sort(&self) -> Self {
        if self.sorts_by_unique_key() {
            return self.clone();
        }
        let mut criteria = self.params.values_of(names::SORT);
        criteria.push(format!("{} ASC", self.unique_key));
        debug!(sort = %criteria.join(","), "added unique key to sort criteria");
        self.sort(criteria)
    }

    //
    // Writes
    //

    /// Turns this request into the POST request for `command`.
    ///
    /// The command's write options are merged into the parameters and the
    /// payload becomes the JSON body.
    pub fn write(&self, command: &WriteCommand) -> SolrResult<Self> {
        let body = command.body()?;
        Ok(Self {
            method: Method::POST,
            base_path: command.base_path().to_string(),
            params: self.params.merge(command.options()),
            body: Some(body),
            content_type: Some(JSON_CONTENT_TYPE.to_string()),
            unique_key: self.unique_key.clone(),
        })
    }
}
