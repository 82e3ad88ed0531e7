//! Document repository.
//!
//! [`DocumentRepository`] ties a [`Transport`] to a collection
//! configuration: it starts select requests, looks documents up by unique
//! key, counts and enumerates results, and issues write commands.

use futures::Stream;
use tracing::{debug, instrument};

use crate::commands::{CommandBuilder, IdGenerator, UuidGenerator, WriteCommand, WriteOptions};
use crate::config::SolrConfig;
use crate::core::Transport;
use crate::error::{ResourceError, SolrResult};
use crate::pagination::DocumentsPaginator;
use crate::request::DocumentsRequest;
use crate::types::{Document, ParamValue, SolrResponse, names};

/// Reads and writes documents of one collection.
pub struct DocumentRepository<T: Transport, G = UuidGenerator> {
    transport: T,
    config: SolrConfig,
    commands: CommandBuilder<G>,
}

impl<T: Transport> DocumentRepository<T> {
    /// Creates a repository that assigns random UUIDs to new documents.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidSetting` - the configuration does not validate
    pub fn new(transport: T, config: SolrConfig) -> SolrResult<Self> {
        Self::with_id_generator(transport, config, UuidGenerator)
    }
}

impl<T: Transport, G: IdGenerator> DocumentRepository<T, G> {
    /// Creates a repository with a custom identifier source.
    pub fn with_id_generator(transport: T, config: SolrConfig, id_generator: G) -> SolrResult<Self> {
        config.check()?;
        let commands = CommandBuilder::with_id_generator(config.unique_key.clone(), id_generator);
        Ok(Self {
            transport,
            config,
            commands,
        })
    }

    /// The collection configuration.
    pub fn config(&self) -> &SolrConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The write command builder.
    pub fn commands(&self) -> &CommandBuilder<G> {
        &self.commands
    }

    /// A new select request with the configured page size.
    pub fn documents(&self) -> DocumentsRequest {
        DocumentsRequest::new(self.config.unique_key.clone()).rows(self.config.default_rows)
    }

    fn bounded(&self, request: &DocumentsRequest) -> DocumentsRequest {
        let max_rows = self.config.max_rows;
        match request.params().get(names::ROWS) {
            Some(ParamValue::Integer(rows)) if *rows < 0 || *rows > i64::from(max_rows) => {
                let clamped = self.config.clamp_rows(*rows);
                debug!(requested = *rows, max_rows, clamped, "clamped page size");
                request.rows(clamped)
            }
            _ => request.clone(),
        }
    }

    /// Issues one select request.
    pub async fn search(&self, request: &DocumentsRequest) -> SolrResult<SolrResponse> {
        let request = self.bounded(request);
        Ok(self.transport.execute(&request).await?)
    }

    /// Looks up the document whose unique key is `id`.
    ///
    /// # Errors
    ///
    /// * `ResourceError::NotFound` - no document matches
    #[instrument(skip(self), fields(collection = %self.config.collection))]
    pub async fn find(&self, id: &str) -> SolrResult<Document> {
        let request = self.documents().by_unique_key(id).rows(1);
        let response = self.search(&request).await?;
        response.into_docs().into_iter().next().ok_or_else(|| {
            ResourceError::NotFound {
                unique_key: self.config.unique_key.clone(),
                id: id.to_string(),
            }
            .into()
        })
    }

    /// A paginator over `request`: cursor mode when the request carries a
    /// cursor mark, one page otherwise.
    pub fn each(&self, request: &DocumentsRequest) -> DocumentsPaginator<'_, T> {
        DocumentsPaginator::new(&self.transport, self.bounded(request))
    }

    /// A lazy stream of the documents matching `request`.
    pub fn stream(&self, request: &DocumentsRequest) -> impl Stream<Item = SolrResult<Document>> + '_ {
        self.each(request).into_stream()
    }

    /// Counts the documents matching `request`.
    ///
    /// Uses `numFound` when the engine reports it as exact; otherwise
    /// enumerates the matches with a cursor over the unique key only.
    pub async fn count(&self, request: &DocumentsRequest) -> SolrResult<u64> {
        let response = self.search(&request.rows(0)).await?;
        if response.num_found_exact() {
            return Ok(response.num_found());
        }

        debug!(
            estimate = response.num_found(),
            "hit count is approximate, enumerating"
        );
        let enumeration = request
            .fl([self.config.unique_key.clone()])
            .rows(self.config.max_rows)
            .cursor();
        let mut paginator = self.each(&enumeration);
        let mut total = 0u64;
        while let Some(page) = paginator.next_page().await? {
            total += page.len() as u64;
        }
        Ok(total)
    }

    /// Issues a write command.
    pub async fn write(&self, command: &WriteCommand) -> SolrResult<SolrResponse> {
        let request = DocumentsRequest::new(self.config.unique_key.clone()).write(command)?;
        debug!(
            path = %self.config.collection_path(request.base_path()),
            "issuing write"
        );
        Ok(self.transport.execute(&request).await?)
    }

    /// Adds documents, assigning identifiers where missing.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn index(&self, records: &[Document], options: &WriteOptions) -> SolrResult<SolrResponse> {
        let command = self.commands.index(records, options);
        self.write(&command).await
    }

    /// Replaces documents; records without an identifier are skipped.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn update(&self, records: &[Document], options: &WriteOptions) -> SolrResult<SolrResponse> {
        let command = self.commands.update(records, options);
        self.write(&command).await
    }

    /// Deletes documents by identifier.
    ///
    /// # Errors
    ///
    /// * `ValidationError::MissingIdentifier` - a record has no identifier;
    ///   nothing is sent
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn delete(&self, records: &[Document], options: &WriteOptions) -> SolrResult<SolrResponse> {
        let command = self.commands.delete(records, options)?;
        self.write(&command).await
    }

    /// Deletes every document matching `query`.
    #[instrument(skip(self))]
    pub async fn delete_by_query(&self, query: &str) -> SolrResult<SolrResponse> {
        let command = self.commands.delete_by_query(query);
        self.write(&command).await
    }
}
