//! Error types for query construction, pagination and update commands.
//!
//! Errors are grouped by category so callers can tell a bad configuration
//! apart from bad input, bad dates, or a failing transport. Everything except
//! [`TransportError`] is raised before a request reaches the network.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Error, Debug)]
pub enum SolrError {
    /// Invalid static configuration (templates, exclude modes, settings).
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Option values or records rejected before a request is issued.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Date/time values that cannot be rendered.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Values that cannot be coerced to the required scalar type.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Failures reported by the transport collaborator.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Lookup errors raised by the repository layer.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A request body could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Errors in static configuration. These never reach the network.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Range exclude mode outside `none`, `from`, `to`, `both`.
    #[error("invalid range exclude mode: {value}")]
    InvalidExcludeMode { value: String },

    /// No clause template is registered under this name.
    #[error("unknown query template: {name}")]
    UnknownTemplate { name: String },

    /// A configuration setting failed validation.
    #[error("invalid setting: {message}")]
    InvalidSetting { message: String },
}

/// Errors raised when an option value or a record is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Value outside the enumerated domain of a parameter.
    #[error("invalid value '{value}' for parameter {parameter} (expected one of: {allowed})")]
    InvalidOption {
        parameter: String,
        value: String,
        allowed: String,
    },

    /// A delete command record has no identifier.
    #[error("record at index {index} has no '{field}' field")]
    MissingIdentifier { field: String, index: usize },

    /// A single-valued parameter this crate does not know how to coerce.
    #[error("unknown parameter: {name}")]
    UnknownParameter { name: String },
}

/// Errors raised while rendering date/time values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The value could not be parsed as a date or date/time.
    #[error("cannot parse '{value}' as a date/time")]
    InvalidDate { value: String },
}

/// Errors raised while coercing scalar values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// The value is not numeric.
    #[error("'{value}' is not an integer")]
    NotAnInteger { value: String },

    /// The value is not a boolean.
    #[error("'{value}' is not a boolean")]
    NotABoolean { value: String },
}

/// Errors surfaced by the transport collaborator.
///
/// These are propagated unchanged; pagination stops at the first one.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request could not be performed.
    #[error("request to {path} failed: {message}")]
    Request {
        path: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The engine answered with a non-success status.
    #[error("request to {path} returned HTTP {status}")]
    Status {
        path: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },
}

/// Errors related to document lookups.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    /// No document carries the requested unique key value.
    #[error("document not found: {unique_key}={id}")]
    NotFound { unique_key: String, id: String },
}

/// Result type used throughout this crate.
pub type SolrResult<T> = Result<T, SolrError>;

impl SolrError {
    /// Returns true if this error was raised before any request was issued.
    pub fn is_client_side(&self) -> bool {
        !matches!(self, SolrError::Transport(_) | SolrError::Resource(_))
    }

    /// Returns true if this is a not-found lookup error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SolrError::Resource(ResourceError::NotFound { .. }))
    }
}
