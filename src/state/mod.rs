//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Position of the crawl in the index pagination cycle
//! - `StopReason`: Why a crawl terminated
//! - `next_state`: The next-page rule applied to an index page's navigation block

mod crawl_state;

// Re-export main types
pub use crawl_state::{next_state, CrawlState, NextPage, StopReason, WRAP_MARKER};
