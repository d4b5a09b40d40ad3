//! Ingestion orchestrator
//!
//! Runs the crawl stage (unless disabled) and then the normalize stage
//! under a run lock, and hands the clean corpus directory to the caller.
//! Any failure is reported once, tagged with the stage it came from.

use crate::config::{load_config, IngestionConfig};
use crate::corpus::{LockError, RunLock};
use crate::crawler::{CrawlSummary, Crawler};
use crate::normalizer::{NormalizeSummary, Normalizer};
use crate::output::{generate_markdown_summary, ProgressReporter, TracingReporter};
use crate::IngestError;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything known about a successful run
#[derive(Debug, Clone)]
pub struct IngestionReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// `None` when the crawl stage was disabled
    pub crawl: Option<CrawlSummary>,

    pub normalize: NormalizeSummary,

    /// Directory holding the clean corpus
    pub clean_dir: PathBuf,
}

impl IngestionReport {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// One configured ingestion pipeline
pub struct Ingestion {
    config: Arc<IngestionConfig>,
    reporter: Arc<dyn ProgressReporter>,
}

impl Ingestion {
    /// Creates a pipeline reporting progress to the `tracing` log
    pub fn new(config: IngestionConfig) -> Self {
        Self::with_reporter(config, Arc::new(TracingReporter))
    }

    pub fn with_reporter(config: IngestionConfig, reporter: Arc<dyn ProgressReporter>) -> Self {
        Self {
            config: Arc::new(config),
            reporter,
        }
    }

    /// Loads and validates the configuration file at `path`
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        Ok(Self::new(load_config(path)?))
    }

    pub fn config(&self) -> &IngestionConfig {
        &self.config
    }

    /// Runs the pipeline and returns the clean corpus directory
    ///
    /// # Example
    ///
    /// ```no_run
    /// use wiki_corpus::{Ingestion, IngestionConfig};
    ///
    /// # async fn example() -> wiki_corpus::Result<()> {
    /// let ingestion = Ingestion::new(IngestionConfig::new("artifacts/raw", "artifacts/clean"));
    /// let clean_dir = ingestion.run().await?;
    /// println!("Corpus ready in {}", clean_dir.display());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run(&self) -> crate::Result<PathBuf> {
        self.run_with_report().await.map(|report| report.clean_dir)
    }

    /// Runs the pipeline and returns the full report
    pub async fn run_with_report(&self) -> crate::Result<IngestionReport> {
        let result = self.execute().await;
        if let Err(e) = &result {
            tracing::error!("Ingestion failed during {} stage: {}", e.stage(), e);
        }
        result
    }

    async fn execute(&self) -> crate::Result<IngestionReport> {
        let started_at = Utc::now();
        tracing::info!("Initialized data ingestion");

        let _lock = RunLock::acquire(&self.config.ingestion.raw_dir).map_err(|e| match e {
            LockError::Held(path) => IngestError::Locked { path },
            LockError::Io(path, source) => IngestError::Lock { path, source },
        })?;

        let crawl = if self.config.ingestion.crawl_enabled {
            let crawler = Crawler::new(self.config.clone(), self.reporter.clone())
                .map_err(IngestError::Crawl)?;
            Some(crawler.run().await.map_err(IngestError::Crawl)?)
        } else {
            tracing::info!("Crawl stage disabled, normalizing existing captures");
            None
        };

        let normalizer = Normalizer::new(
            &self.config.ingestion.raw_dir,
            &self.config.ingestion.clean_dir,
            self.config.ingestion.checkpoint_interval,
            self.reporter.clone(),
        );
        let normalize = normalizer.run().map_err(IngestError::Normalize)?;

        let report = IngestionReport {
            started_at,
            finished_at: Utc::now(),
            crawl,
            normalize,
            clean_dir: normalizer.clean_dir().to_path_buf(),
        };

        if let Some(path) = &self.config.output.summary_path {
            generate_markdown_summary(&report, path).map_err(|source| IngestError::Report {
                path: path.clone(),
                source,
            })?;
            tracing::info!("Run summary written to {}", path.display());
        }

        tracing::info!("Data ingestion completed");
        Ok(report)
    }
}
