//! Crawler coordinator - pagination and capture loop
//!
//! This module drives the crawl through the index pages:
//! - Fetching each index page and extracting its article links
//! - Fetching every article and writing its raw capture
//! - Following the navigation block until a terminal condition

use crate::config::{ArticleErrorPolicy, IngestionConfig};
use crate::corpus::{ArticleRef, RawCorpus};
use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::crawler::parser::{parse_article, parse_index, resolve_link, PageSelectors};
use crate::output::{Checkpointer, ProgressReporter};
use crate::state::{next_state, CrawlState, NextPage, StopReason};
use crate::{ConfigError, Stage};
use futures::stream::{self, StreamExt};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort a crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Invalid crawl configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Failed to fetch index page {url}: {error}")]
    IndexFetch { url: String, error: String },

    #[error("Failed to fetch article {url}: {reason}")]
    ArticleFetch { url: String, reason: String },

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Totals of a finished crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Index pages fetched
    pub pages_visited: u64,

    /// Raw captures written
    pub articles_written: u64,

    /// Articles listed on an index page but not captured
    pub articles_skipped: u64,

    pub stop_reason: StopReason,
}

/// Whether one article ended up on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArticleOutcome {
    Captured,
    Skipped,
}

#[derive(Debug, Default)]
struct ArticleTally {
    written: u64,
    skipped: u64,
}

/// Walks the article index and writes the raw corpus
pub struct Crawler {
    config: Arc<IngestionConfig>,
    fetcher: Fetcher,
    selectors: PageSelectors,
    raw: RawCorpus,
    reporter: Arc<dyn ProgressReporter>,
}

impl Crawler {
    /// Creates a crawler with an HTTP client built from the configuration
    pub fn new(
        config: Arc<IngestionConfig>,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self, CrawlError> {
        let fetcher = Fetcher::from_config(&config.user_agent, &config.http)?;
        Self::with_fetcher(config, fetcher, reporter)
    }

    /// Creates a crawler using the given fetcher
    pub fn with_fetcher(
        config: Arc<IngestionConfig>,
        fetcher: Fetcher,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Result<Self, CrawlError> {
        let selectors = PageSelectors::compile(&config.selectors)?;
        let raw = RawCorpus::new(&config.ingestion.raw_dir, config.ingestion.write_mode);

        Ok(Self {
            config,
            fetcher,
            selectors,
            raw,
            reporter,
        })
    }

    /// Runs the crawl until the index is exhausted
    ///
    /// State transitions:
    ///
    /// ```text
    /// FetchingIndex -> ExtractingArticles -> FetchingNextPage -> FetchingIndex ...
    ///       |                                      |
    ///       +--> Done (HTTP status, no list)       +--> Done (no nav, no link, wrapped)
    /// ```
    pub async fn run(&self) -> Result<CrawlSummary, CrawlError> {
        self.raw.ensure_dir().map_err(|source| CrawlError::Io {
            path: self.raw.dir().to_path_buf(),
            source,
        })?;

        tracing::info!("Starting crawl at {}", self.config.site.start_url);

        let mut checkpoints =
            Checkpointer::new(Stage::Crawl, self.config.ingestion.checkpoint_interval);
        let mut pages_visited = 0u64;
        let mut tally = ArticleTally::default();

        let mut state = CrawlState::FetchingIndex {
            url: self.config.site.start_url.clone(),
        };

        let stop_reason = loop {
            state = match state {
                CrawlState::FetchingIndex { url } => {
                    pages_visited += 1;
                    self.fetch_index(url).await?
                }

                CrawlState::ExtractingArticles {
                    url,
                    articles,
                    navigation,
                } => {
                    tracing::debug!("Capturing {} articles listed on {}", articles.len(), url);
                    let page_tally = self.capture_articles(articles, &mut checkpoints).await?;
                    tally.written += page_tally.written;
                    tally.skipped += page_tally.skipped;
                    CrawlState::FetchingNextPage { navigation }
                }

                CrawlState::FetchingNextPage { navigation } => {
                    match next_state(navigation.as_deref()) {
                        NextPage::Follow(href) => CrawlState::FetchingIndex {
                            url: resolve_link(&self.config.site.base_url, &href),
                        },
                        NextPage::Stop(reason) => CrawlState::Done(reason),
                    }
                }

                CrawlState::Done(reason) => break reason,
            };
        };

        tracing::info!(
            "Crawl finished after {} index pages ({}): {} articles captured, {} skipped",
            pages_visited,
            stop_reason,
            tally.written,
            tally.skipped
        );
        self.reporter.finished(Stage::Crawl, tally.written);

        Ok(CrawlSummary {
            pages_visited,
            articles_written: tally.written,
            articles_skipped: tally.skipped,
            stop_reason,
        })
    }

    /// Fetches and parses one index page
    ///
    /// A non-success status or a missing article list ends the crawl without
    /// an error; a transport failure is fatal.
    async fn fetch_index(&self, url: String) -> Result<CrawlState, CrawlError> {
        tracing::debug!("Fetching index page {}", url);

        match self.fetcher.fetch(&url).await {
            FetchResult::Success { body, .. } => {
                let page = parse_index(&body, &self.selectors);
                match page.articles {
                    Some(articles) => Ok(CrawlState::ExtractingArticles {
                        url,
                        articles,
                        navigation: page.navigation,
                    }),
                    None => {
                        tracing::error!("Could not find the article list on {}", url);
                        Ok(CrawlState::Done(StopReason::MissingArticleList))
                    }
                }
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!(
                    "Could not connect to index page {} (HTTP {}), stopping crawl",
                    url,
                    status_code
                );
                Ok(CrawlState::Done(StopReason::IndexStatus(status_code)))
            }
            FetchResult::NetworkError { error, .. } => Err(CrawlError::IndexFetch { url, error }),
        }
    }

    /// Fetches the articles of one index page and writes their captures
    ///
    /// Up to `article-concurrency` fetches are in flight; results are
    /// written in index order.
    async fn capture_articles(
        &self,
        articles: Vec<ArticleRef>,
        checkpoints: &mut Checkpointer,
    ) -> Result<ArticleTally, CrawlError> {
        let concurrency = self.config.http.article_concurrency.max(1);

        let fetches = stream::iter(articles)
            .map(|article| async move {
                let url = resolve_link(&self.config.site.base_url, &article.link);
                let result = match article.file_name() {
                    Some(_) => Some(self.fetcher.fetch(&url).await),
                    None => None,
                };
                (article, url, result)
            })
            .buffered(concurrency);
        let mut fetches = std::pin::pin!(fetches);

        let mut tally = ArticleTally::default();
        while let Some((article, url, result)) = fetches.next().await {
            match self.store_article(&article, &url, result)? {
                ArticleOutcome::Captured => tally.written += 1,
                ArticleOutcome::Skipped => tally.skipped += 1,
            }
            checkpoints.tick(self.reporter.as_ref());
        }

        Ok(tally)
    }

    /// Writes one article's capture or decides to skip it
    fn store_article(
        &self,
        article: &ArticleRef,
        url: &str,
        result: Option<FetchResult>,
    ) -> Result<ArticleOutcome, CrawlError> {
        let (Some(file_name), Some(result)) = (article.file_name(), result) else {
            tracing::warn!(
                "Skipping article '{}': title has no alphanumeric characters",
                article.title
            );
            return Ok(ArticleOutcome::Skipped);
        };

        match result {
            FetchResult::Success { body, .. } => {
                let fragments = parse_article(&body, &self.selectors).unwrap_or_else(|| {
                    tracing::debug!("No content block on {}, writing empty capture", url);
                    Vec::new()
                });

                self.raw
                    .write_article(&file_name, &fragments)
                    .map_err(|source| CrawlError::Io {
                        path: self.raw.path_for(&file_name),
                        source,
                    })?;
                Ok(ArticleOutcome::Captured)
            }

            FetchResult::NetworkError {
                timed_out: true, ..
            } => {
                tracing::warn!("Article {} timed out, skipping", url);
                Ok(ArticleOutcome::Skipped)
            }

            failure => {
                let reason = failure.failure_reason().unwrap_or_default();
                match self.config.ingestion.on_article_error {
                    ArticleErrorPolicy::Abort => Err(CrawlError::ArticleFetch {
                        url: url.to_string(),
                        reason,
                    }),
                    ArticleErrorPolicy::Skip => {
                        tracing::warn!("Skipping article {}: {}", url, reason);
                        Ok(ArticleOutcome::Skipped)
                    }
                }
            }
        }
    }
}

/// Runs a complete crawl with the given configuration
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wiki_corpus::config::IngestionConfig;
/// use wiki_corpus::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = IngestionConfig::new("artifacts/raw", "artifacts/clean");
/// let summary = run_crawl(Arc::new(config)).await?;
/// println!("{} articles captured", summary.articles_written);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Arc<IngestionConfig>) -> Result<CrawlSummary, CrawlError> {
    let crawler = Crawler::new(config, Arc::new(crate::output::TracingReporter))?;
    crawler.run().await
}
