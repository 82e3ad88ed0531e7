//! Cursor pagination.
//!
//! [`DocumentsPaginator`] drives repeated select requests with an advancing
//! `cursorMark`, yielding documents one fetched page at a time. Requests
//! without a cursor mark are fetched once.
//!
//! # Termination
//!
//! Enumeration ends when the engine echoes back the mark that was just sent,
//! when it returns no mark at all, or when a page comes back empty. The first
//! rule is an engine convention; if the cursor protocol changes, revisit
//! [`DocumentsPaginator::next_page`].
//!
//! # Example
//!
//! ```ignore
//! use futures::TryStreamExt;
//!
//! let request = DocumentsRequest::default().all().rows(500).cursor();
//! let mut docs = DocumentsPaginator::new(&transport, request).into_stream();
//! while let Some(doc) = docs.try_next().await? {
//!     // ...
//! }
//! ```

use futures::{Stream, TryStreamExt, stream};
use tracing::{debug, info};

use crate::core::Transport;
use crate::error::{SolrError, SolrResult};
use crate::request::DocumentsRequest;
use crate::types::{Document, names};

/// How the paginator fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationMode {
    /// Follow `nextCursorMark` until exhausted.
    Cursor,
    /// Issue one request and stop.
    Single,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState {
    Start,
    HasMore(String),
    Exhausted,
}

/// Sequential page fetcher over a transport.
///
/// Not restartable: a new paginator re-issues every request.
pub struct DocumentsPaginator<'a, T: Transport + ?Sized> {
    transport: &'a T,
    request: DocumentsRequest,
    mode: PaginationMode,
    state: PageState,
    pages: usize,
    documents: usize,
}

impl<'a, T: Transport + ?Sized> DocumentsPaginator<'a, T> {
    /// Creates a paginator for `request`.
    ///
    /// Cursor requests get `<unique key> ASC` appended to their sort
    /// criteria when the unique key is missing from them.
    pub fn new(transport: &'a T, request: DocumentsRequest) -> Self {
        let (mode, request) = if request.is_cursor() {
            (PaginationMode::Cursor, request.ensure_unique_key_sort())
        } else {
            (PaginationMode::Single, request)
        };

        Self {
            transport,
            request,
            mode,
            state: PageState::Start,
            pages: 0,
            documents: 0,
        }
    }

    /// The pagination mode.
    pub fn mode(&self) -> PaginationMode {
        self.mode
    }

    /// The request as it will be sent (after sort normalization).
    pub fn request(&self) -> &DocumentsRequest {
        &self.request
    }

    /// Number of pages fetched so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    /// Number of documents yielded so far.
    pub fn documents_fetched(&self) -> usize {
        self.documents
    }

    /// Returns true once no further request will be issued.
    pub fn is_exhausted(&self) -> bool {
        self.state == PageState::Exhausted
    }

    /// The cursor mark the next fetch will send.
    ///
    /// Useful to resume an interrupted enumeration later via
    /// [`DocumentsRequest::with_cursor_mark`].
    pub fn next_cursor_mark(&self) -> Option<String> {
        match &self.state {
            PageState::Start => self.request.cursor_mark(),
            PageState::HasMore(mark) => Some(mark.clone()),
            PageState::Exhausted => None,
        }
    }

    /// Fetches the next page.
    ///
    /// Returns `Ok(None)` once the enumeration is exhausted. A transport
    /// failure ends the enumeration and is returned unchanged; pages already
    /// yielded stay valid.
    pub async fn next_page(&mut self) -> SolrResult<Option<Vec<Document>>> {
        if self.state == PageState::Exhausted {
            return Ok(None);
        }

        let sent_mark = self.next_cursor_mark();
        let request = match (self.mode, &sent_mark) {
            (PaginationMode::Cursor, Some(mark)) => self.request.with_cursor_mark(mark),
            _ => self.request.clone(),
        };

        debug!(
            page = self.pages + 1,
            cursor_mark = sent_mark.as_deref().unwrap_or("-"),
            rows = %request.params().values_of(names::ROWS).join(""),
            "fetching page"
        );

        let response = match self.transport.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                self.state = PageState::Exhausted;
                return Err(e.into());
            }
        };

        let next_mark = response.next_cursor_mark.clone();
        let docs = response.into_docs();
        self.pages += 1;
        self.documents += docs.len();

        self.state = match (self.mode, next_mark) {
            (PaginationMode::Cursor, Some(next))
                if !docs.is_empty() && sent_mark.as_deref() != Some(next.as_str()) =>
            {
                PageState::HasMore(next)
            }
            _ => PageState::Exhausted,
        };

        debug!(
            page = self.pages,
            batch = docs.len(),
            exhausted = self.is_exhausted(),
            "fetched page"
        );
        if self.is_exhausted() {
            info!(
                pages = self.pages,
                documents = self.documents,
                "pagination complete"
            );
        }

        if docs.is_empty() {
            Ok(None)
        } else {
            Ok(Some(docs))
        }
    }

    /// Fetches every remaining page and returns the documents in order.
    pub async fn collect(mut self) -> SolrResult<Vec<Document>> {
        let mut all = Vec::new();
        while let Some(page) = self.next_page().await? {
            all.extend(page);
        }
        Ok(all)
    }

    /// Converts the paginator into a lazy stream of documents.
    ///
    /// Pages are fetched only as the stream is polled; dropping the stream
    /// abandons the enumeration.
    pub fn into_stream(self) -> impl Stream<Item = SolrResult<Document>> + 'a {
        stream::try_unfold(self, |mut paginator| async move {
            let page = paginator.next_page().await?;
            Ok::<_, SolrError>(page.map(|page| (page, paginator)))
        })
        .map_ok(|page| stream::iter(page.into_iter().map(Ok)))
        .try_flatten()
    }
}
