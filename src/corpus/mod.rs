//! Corpus module for on-disk article captures
//!
//! This module handles:
//! - Article references and filesystem-safe title sanitization
//! - Writing raw captures (overwrite or append)
//! - The run lock serializing ingestion runs on one raw directory

mod lock;
mod raw;

pub use lock::{LockError, RunLock};
pub use raw::{sanitize_title, ArticleRef, RawCorpus, CORPUS_EXTENSION};
