//! Output module for progress reporting and run summaries
//!
//! This module handles:
//! - Progress checkpoints for the crawl and normalize stages
//! - Generating markdown summaries of ingestion runs
//! - The model-artifact existence check used by the serving layer

mod markdown;
mod progress;

pub use markdown::{format_markdown_summary, generate_markdown_summary};
pub use progress::{
    Checkpointer, ProgressEvent, ProgressReporter, RecordingReporter, TracingReporter,
};

use std::path::Path;

/// Returns true if a trained model artifact exists at `path`
///
/// This is the only contract between the corpus pipeline and the serving
/// layer: without an artifact, the serving layer reports that no trained
/// model is available.
pub fn model_artifact_exists(path: &Path) -> bool {
    path.is_file()
}
