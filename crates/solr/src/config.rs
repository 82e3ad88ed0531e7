//! Collection configuration.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `SOLR_BASE_URL` | http://localhost:8983/solr | Engine base URL |
//! | `SOLR_COLLECTION` | documents | Collection (core) name |
//! | `SOLR_UNIQUE_KEY` | id | Unique key field of the collection schema |
//! | `SOLR_DEFAULT_ROWS` | 10 | Page size for new select requests |
//! | `SOLR_MAX_ROWS` | 1000 | Largest page size a request may ask for |
//! | `SOLR_LOG_LEVEL` | info | Log level for the embedding binary's subscriber |
//!
//! # Example
//!
//! ```rust
//! use helios_solr::SolrConfig;
//!
//! let config = SolrConfig {
//!     collection: "books".to_string(),
//!     ..Default::default()
//! };
//! assert_eq!(config.collection_path("select"), "books/select");
//! ```

use clap::Parser;
use tracing::Level;

use crate::error::ConfigError;

const DEFAULT_BASE_URL: &str = "http://localhost:8983/solr";
const DEFAULT_COLLECTION: &str = "documents";

/// Connection and paging settings for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "solr")]
#[command(about = "Solr collection settings")]
pub struct SolrConfig {
    /// Engine base URL.
    #[arg(long, env = "SOLR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Collection name.
    #[arg(long, env = "SOLR_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Unique key field.
    #[arg(long, env = "SOLR_UNIQUE_KEY", default_value = "id")]
    pub unique_key: String,

    /// Default page size.
    #[arg(long, env = "SOLR_DEFAULT_ROWS", default_value = "10")]
    pub default_rows: u32,

    /// Maximum page size.
    #[arg(long, env = "SOLR_MAX_ROWS", default_value = "1000")]
    pub max_rows: u32,

    /// Log level (error, warn, info, debug, trace).
    ///
    /// This crate only emits `tracing` events; binaries that install a
    /// subscriber read the level through [`level`](Self::level).
    #[arg(long, env = "SOLR_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Default for SolrConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            unique_key: "id".to_string(),
            default_rows: 10,
            max_rows: 1000,
            log_level: "info".to_string(),
        }
    }
}

impl SolrConfig {
    /// Reads the configuration from environment variables, ignoring
    /// command line arguments. Falls back to defaults when a variable
    /// does not parse.
    pub fn from_env() -> Self {
        Self::try_parse_from(["solr"]).unwrap_or_default()
    }

    /// Path of a handler inside the collection, e.g. `documents/select`.
    pub fn collection_path(&self, base_path: &str) -> String {
        format!(
            "{}/{}",
            self.collection.trim_matches('/'),
            base_path.trim_start_matches('/')
        )
    }

    /// Full URL of a handler, e.g. `http://localhost:8983/solr/documents/select`.
    pub fn endpoint(&self, base_path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.collection_path(base_path)
        )
    }

    /// Clamps a requested page size to `0..=max_rows`.
    pub fn clamp_rows(&self, rows: i64) -> u32 {
        u32::try_from(rows.clamp(0, i64::from(self.max_rows))).unwrap_or(self.max_rows)
    }

    /// The configured log level.
    ///
    /// # Errors
    ///
    /// * `ConfigError::InvalidSetting` - not one of error, warn, info, debug, trace
    pub fn level(&self) -> Result<Level, ConfigError> {
        self.log_level
            .trim()
            .parse::<Level>()
            .map_err(|_| ConfigError::InvalidSetting {
                message: format!("unknown log level '{}'", self.log_level),
            })
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.base_url.trim().is_empty() {
            errors.push("Base URL cannot be empty".to_string());
        }

        if self.collection.trim().is_empty() {
            errors.push("Collection cannot be empty".to_string());
        }

        if self.unique_key.trim().is_empty() {
            errors.push("Unique key cannot be empty".to_string());
        } else if self.unique_key.chars().any(char::is_whitespace) {
            errors.push("Unique key cannot contain whitespace".to_string());
        }

        if self.default_rows == 0 {
            errors.push("Default rows cannot be 0".to_string());
        }

        if self.max_rows == 0 {
            errors.push("Max rows cannot be 0".to_string());
        }

        if self.default_rows > self.max_rows {
            errors.push("Default rows cannot exceed max rows".to_string());
        }

        if self.level().is_err() {
            errors.push(format!("Unknown log level: {}", self.log_level));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Like [`validate`](Self::validate), folding the problems into one error.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| ConfigError::InvalidSetting {
            message: errors.join("; "),
        })
    }
}
