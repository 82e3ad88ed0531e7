//! Core collaborator traits.
//!
//! - [`Transport`] - performs one request against the engine
//!
//! Everything else in this crate is pure: requests are described by
//! [`DocumentsRequest`](crate::request::DocumentsRequest) values and handed to
//! a transport only by the paginator and the repository.
//!
//! # Example: Implementing a Transport
//!
//! ```ignore
//! use async_trait::async_trait;
//! use helios_solr::core::Transport;
//! use helios_solr::error::TransportError;
//! use helios_solr::request::DocumentsRequest;
//! use helios_solr::types::SolrResponse;
//!
//! struct HttpTransport {
//!     // ... client, base url
//! }
//!
//! #[async_trait]
//! impl Transport for HttpTransport {
//!     async fn execute(
//!         &self,
//!         request: &DocumentsRequest,
//!     ) -> Result<SolrResponse, TransportError> {
//!         // Issue request.method() to <collection>/<request.base_path()>
//!         // with request.params().to_request_params() and request.body()
//!         todo!()
//!     }
//! }
//! ```

pub mod transport;

pub use transport::Transport;
