//! Core types for requests and responses.
//!
//! - [`params`] - the immutable request parameter set
//! - [`document`] - document records and identifier helpers
//! - [`response`] - decoded engine responses

pub mod document;
pub mod params;
pub mod response;

pub use document::Document;
pub use params::{Coercion, ParamValue, Params, Scalar, names};
pub use response::{ResponseHeader, ResultSet, SolrResponse};
