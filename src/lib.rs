//! Wiki-Corpus: a paginated wiki crawler that builds a clean text corpus
//!
//! This crate walks an alphabetical article index, captures the text of every
//! article into a raw corpus directory, and normalizes the captures into a
//! clean corpus directory for a downstream training step.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod normalizer;
pub mod output;
pub mod pipeline;
pub mod state;

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for a single ingestion run
///
/// Every variant identifies the stage that failed; see [`IngestError::stage`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Another ingestion run holds the lock at {}", path.display())]
    Locked { path: PathBuf },

    #[error("Failed to acquire run lock at {}: {source}", path.display())]
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Crawl stage failed: {0}")]
    Crawl(#[source] crawler::CrawlError),

    #[error("Normalize stage failed: {0}")]
    Normalize(#[source] normalizer::NormalizeError),

    #[error("Failed to write run summary to {}: {source}", path.display())]
    Report {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl IngestError {
    /// Returns the pipeline stage this error originated from
    pub fn stage(&self) -> Stage {
        match self {
            Self::Config(_) => Stage::Config,
            Self::Locked { .. } | Self::Lock { .. } => Stage::Lock,
            Self::Crawl(_) => Stage::Crawl,
            Self::Normalize(_) => Stage::Normalize,
            Self::Report { .. } => Stage::Report,
        }
    }
}

/// Stages of an ingestion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Config,
    Lock,
    Crawl,
    Normalize,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Config => "config",
            Self::Lock => "lock",
            Self::Crawl => "crawl",
            Self::Normalize => "normalize",
            Self::Report => "report",
        };
        f.write_str(name)
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid selector in config: {0}")]
    InvalidSelector(String),
}

/// Result type alias for ingestion operations
pub type Result<T> = std::result::Result<T, IngestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::IngestionConfig;
pub use corpus::{sanitize_title, ArticleRef};
pub use normalizer::{normalize_text, Normalizer};
pub use pipeline::{Ingestion, IngestionReport};
pub use state::{CrawlState, StopReason};
