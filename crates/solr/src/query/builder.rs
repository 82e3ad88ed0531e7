//! Fluent clause collector.

use std::fmt::Display;

use crate::error::SolrResult;

use super::clause::{self, QueryValue};
use super::template::ExcludeMode;
use super::value::SolrDate;

/// Collects clauses from several builder calls into one ordered list.
///
/// # Example
///
/// ```
/// use helios_solr::query::{ExcludeMode, QueryBuilder};
///
/// let clauses = QueryBuilder::new()
///     .equals([("format", "book")])
///     .range("year", "1990", "*", ExcludeMode::None)
///     .not_exists(["withdrawn_at"])
///     .build();
///
/// assert_eq!(
///     clauses,
///     vec!["format:\"book\"", "year:[1990 TO *]", "-withdrawn_at:[* TO *]"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryBuilder {
    clauses: Vec<String>,
}

impl QueryBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn extend(mut self, clauses: Vec<String>) -> Self {
        self.clauses.extend(clauses);
        self
    }

    /// Adds equality clauses. See [`clause::equals`].
    pub fn equals<I, F, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.extend(clause::equals(mapping))
    }

    /// Adds negation clauses.
    pub fn not_equals<I, F, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.extend(clause::not_equals(mapping))
    }

    /// Adds field-present clauses.
    pub fn exists<I, F>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        self.extend(clause::exists(fields))
    }

    /// Adds field-absent clauses.
    pub fn not_exists<I, F>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: AsRef<str>,
    {
        self.extend(clause::not_exists(fields))
    }

    /// Adds a range clause.
    pub fn range(self, field: &str, from: &str, to: &str, exclude: ExcludeMode) -> Self {
        self.extend(clause::range(field, from, to, exclude))
    }

    /// Adds a join clause.
    pub fn join(self, from: &str, to: &str, field: &str, value: &str) -> Self {
        self.extend(clause::join(from, to, field, value))
    }

    /// Adds date upper-bound clauses.
    pub fn before<I, F, D>(self, mapping: I) -> SolrResult<Self>
    where
        I: IntoIterator<Item = (F, D)>,
        F: AsRef<str>,
        D: SolrDate,
    {
        Ok(self.extend(clause::before(mapping)?))
    }

    /// Adds relative date upper-bound clauses.
    pub fn before_days<I, F, N>(self, mapping: I) -> SolrResult<Self>
    where
        I: IntoIterator<Item = (F, N)>,
        F: AsRef<str>,
        N: Display,
    {
        Ok(self.extend(clause::before_days(mapping)?))
    }

    /// Adds term clauses.
    pub fn term<I, F, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.extend(clause::term(mapping))
    }

    /// Adds regular expression clauses.
    pub fn regexp<I, F, V>(self, mapping: I) -> Self
    where
        I: IntoIterator<Item = (F, V)>,
        F: AsRef<str>,
        V: Into<QueryValue>,
    {
        self.extend(clause::regexp(mapping))
    }

    /// Adds a pre-rendered clause as is.
    pub fn raw(mut self, clause: impl Into<String>) -> Self {
        self.clauses.push(clause.into());
        self
    }

    /// Returns true if no clause has been added.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Returns the collected clauses.
    pub fn clauses(&self) -> &[String] {
        &self.clauses
    }

    /// Consumes the builder, returning the collected clauses.
    pub fn build(self) -> Vec<String> {
        self.clauses
    }
}
