use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for one ingestion run
///
/// Loaded once, validated, then shared read-only between the crawler and
/// the normalizer.
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionConfig {
    pub ingestion: IngestionSection,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl IngestionConfig {
    /// Builds a configuration with the given corpus directories and defaults
    /// for everything else
    pub fn new(raw_dir: impl Into<PathBuf>, clean_dir: impl Into<PathBuf>) -> Self {
        Self {
            ingestion: IngestionSection {
                raw_dir: raw_dir.into(),
                clean_dir: clean_dir.into(),
                crawl_enabled: true,
                checkpoint_interval: default_checkpoint_interval(),
                write_mode: WriteMode::default(),
                on_article_error: ArticleErrorPolicy::default(),
            },
            site: SiteConfig::default(),
            selectors: SelectorConfig::default(),
            http: HttpConfig::default(),
            user_agent: UserAgentConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

/// Corpus locations and run behavior
#[derive(Debug, Clone, Deserialize)]
pub struct IngestionSection {
    /// Directory receiving one raw capture per article
    #[serde(rename = "raw-dir")]
    pub raw_dir: PathBuf,

    /// Directory receiving the normalized corpus
    #[serde(rename = "clean-dir")]
    pub clean_dir: PathBuf,

    /// When false the crawl stage is skipped and only normalization runs
    #[serde(rename = "crawl-enabled", default = "default_true")]
    pub crawl_enabled: bool,

    /// Emit a progress checkpoint every this many articles/files
    #[serde(rename = "checkpoint-interval", default = "default_checkpoint_interval")]
    pub checkpoint_interval: u64,

    #[serde(rename = "write-mode", default)]
    pub write_mode: WriteMode,

    #[serde(rename = "on-article-error", default)]
    pub on_article_error: ArticleErrorPolicy,
}

/// How raw captures are written when the file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Truncate and rewrite
    #[default]
    Overwrite,
    /// Append to the existing capture
    Append,
}

/// What to do when an article page cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArticleErrorPolicy {
    /// Fail the whole ingestion run
    #[default]
    Abort,
    /// Log the failure and continue with the next article
    Skip,
}

/// Site being crawled
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// First index page of the crawl
    #[serde(rename = "start-url")]
    pub start_url: String,

    /// Prefix joined with the relative links found on index pages
    #[serde(rename = "base-url")]
    pub base_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            start_url: "https://dragonball.fandom.com/wiki/Special:AllPages".to_string(),
            base_url: "https://dragonball.fandom.com".to_string(),
        }
    }
}

/// CSS selectors locating the structural blocks of index and article pages
#[derive(Debug, Clone, Deserialize)]
pub struct SelectorConfig {
    /// Pagination block on index pages
    #[serde(default = "default_navigation_selector")]
    pub navigation: String,

    /// Block holding the article links on index pages
    #[serde(rename = "article-list", default = "default_article_list_selector")]
    pub article_list: String,

    /// Block holding the body text on article pages
    #[serde(default = "default_content_selector")]
    pub content: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            navigation: default_navigation_selector(),
            article_list: default_article_list_selector(),
            content: default_content_selector(),
        }
    }
}

/// HTTP client behavior
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout (milliseconds)
    #[serde(rename = "timeout-ms", default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// TCP/TLS connect timeout (milliseconds)
    #[serde(rename = "connect-timeout-ms", default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Retries after the first attempt for transient failures
    #[serde(rename = "max-retries", default)]
    pub max_retries: usize,

    /// Delay before the first retry (milliseconds), doubled on each retry
    #[serde(rename = "retry-base-ms", default = "default_retry_base_ms")]
    pub retry_base_ms: u64,

    /// Upper bound for a single retry delay (milliseconds)
    #[serde(rename = "retry-max-ms", default = "default_retry_max_ms")]
    pub retry_max_ms: u64,

    /// Number of article pages fetched concurrently
    #[serde(rename = "article-concurrency", default = "default_article_concurrency")]
    pub article_concurrency: usize,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            max_retries: 0,
            retry_base_ms: default_retry_base_ms(),
            retry_max_ms: default_retry_max_ms(),
            article_concurrency: default_article_concurrency(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "WikiCorpus".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/wiki-corpus".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Where to write a markdown summary of the run, if anywhere
    #[serde(rename = "summary-path", default)]
    pub summary_path: Option<PathBuf>,

    /// Model artifact checked by the serving layer
    #[serde(rename = "model-artifact-path", default)]
    pub model_artifact_path: Option<PathBuf>,
}

fn default_true() -> bool {
    true
}

fn default_checkpoint_interval() -> u64 {
    500
}

fn default_navigation_selector() -> String {
    "div.mw-allpages-nav".to_string()
}

fn default_article_list_selector() -> String {
    "div.mw-allpages-body".to_string()
}

fn default_content_selector() -> String {
    "div.mw-parser-output".to_string()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    10_000
}

fn default_retry_base_ms() -> u64 {
    500
}

fn default_retry_max_ms() -> u64 {
    10_000
}

fn default_article_concurrency() -> usize {
    1
}
