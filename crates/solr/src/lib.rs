//! Helios Solr Client Core
//!
//! This crate builds requests for a Solr-style document search engine and
//! drives its cursor pagination and update commands. It does not speak HTTP
//! itself: requests are described as [`DocumentsRequest`] values and handed
//! to a [`Transport`](core::Transport) implementation.
//!
//! # Architecture
//!
//! - [`query`] - Standard query parser clauses, quoting and escaping
//! - [`types`] - Request parameters, documents and decoded responses
//! - [`request`] - The request descriptor and its fluent option surface
//! - [`commands`] - Index, update and delete commands
//! - [`pagination`] - Cursor pagination over a transport
//! - [`repository`] - Collection-level reads and writes
//! - [`config`] - Collection settings with environment overrides
//! - [`error`] - Error types for all operations
//!
//! # Building Queries
//!
//! ```
//! use helios_solr::DocumentsRequest;
//! use helios_solr::query::{ExcludeMode, QueryBuilder};
//!
//! let request = DocumentsRequest::default()
//!     .query(QueryBuilder::new().equals([("title", "Moby Dick")]))
//!     .filter(QueryBuilder::new().range("year", "1850", "*", ExcludeMode::From))
//!     .fl(["id", "title"])
//!     .rows(25);
//!
//! let params = request.params().to_request_params();
//! assert!(params.contains(&("q".to_string(), "title:\"Moby Dick\"".to_string())));
//! assert!(params.contains(&("fq".to_string(), "year:{1850 TO *]".to_string())));
//! assert!(params.contains(&("fl".to_string(), "id,title".to_string())));
//! ```
//!
//! # Cursor Pagination
//!
//! ```
//! use helios_solr::DocumentsRequest;
//! use helios_solr::types::names;
//!
//! let request = DocumentsRequest::default().all().sort(["score desc"]).cursor();
//!
//! assert_eq!(request.cursor_mark().as_deref(), Some("*"));
//! assert_eq!(
//!     request.params().values_of(names::SORT),
//!     vec!["score desc", "id ASC"]
//! );
//! ```
//!
//! # Write Commands
//!
//! ```
//! use helios_solr::DocumentsRequest;
//! use helios_solr::commands::{CommandBuilder, WriteOptions};
//! use serde_json::json;
//!
//! let builder = CommandBuilder::new("id");
//! let records = vec![json!({"id": "a"}).as_object().unwrap().clone()];
//! let command = builder
//!     .delete(&records, &WriteOptions::new().with_commit(true))
//!     .unwrap();
//!
//! let request = DocumentsRequest::default().write(&command).unwrap();
//! assert_eq!(request.base_path(), "update");
//! assert_eq!(request.body(), Some(r#"{"delete":["a"]}"#));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod request;
pub mod types;

// Re-export commonly used types at crate root
pub use commands::{CommandBuilder, WriteCommand, WriteOptions, WritePayload};
pub use config::SolrConfig;
pub use error::{SolrError, SolrResult};
pub use pagination::DocumentsPaginator;
pub use query::QueryBuilder;
pub use repository::DocumentRepository;
pub use request::DocumentsRequest;
pub use types::{Document, Params, SolrResponse};

// Re-export core traits
pub use core::Transport;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
