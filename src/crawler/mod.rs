//! Crawler module for index pagination and article capture
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeouts and bounded retry
//! - HTML parsing of index and article pages
//! - The pagination loop writing the raw corpus

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{run_crawl, CrawlError, CrawlSummary, Crawler};
pub use fetcher::{build_http_client, FetchResult, Fetcher, RetryPolicy};
pub use parser::{parse_article, parse_index, resolve_link, IndexPage, NavLink, PageSelectors};
