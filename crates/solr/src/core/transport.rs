//! The transport seam.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::request::DocumentsRequest;
use crate::types::SolrResponse;

/// Performs requests against a search engine collection.
///
/// Implementations own connection handling, authentication and decoding.
/// Errors are returned unchanged to callers; nothing in this crate retries.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes `request` and returns the decoded response.
    async fn execute(&self, request: &DocumentsRequest) -> Result<SolrResponse, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &DocumentsRequest) -> Result<SolrResponse, TransportError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for &T {
    async fn execute(&self, request: &DocumentsRequest) -> Result<SolrResponse, TransportError> {
        (**self).execute(request).await
    }
}
