//! Normalizer module turning the raw corpus into the clean corpus
//!
//! Every regular file of the raw directory gets a cleaned counterpart with
//! the same name in the clean directory. Files are processed in name order
//! and fully rewritten on every pass.

mod text;

pub use text::normalize_text;

use crate::output::{Checkpointer, ProgressReporter};
use crate::Stage;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort normalization
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl NormalizeError {
    fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Totals of a normalization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub files_cleaned: u64,
}

/// Rewrites the raw corpus into the clean corpus
pub struct Normalizer {
    raw_dir: PathBuf,
    clean_dir: PathBuf,
    checkpoint_interval: u64,
    reporter: Arc<dyn ProgressReporter>,
}

impl Normalizer {
    pub fn new(
        raw_dir: impl Into<PathBuf>,
        clean_dir: impl Into<PathBuf>,
        checkpoint_interval: u64,
        reporter: Arc<dyn ProgressReporter>,
    ) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            clean_dir: clean_dir.into(),
            checkpoint_interval,
            reporter,
        }
    }

    pub fn clean_dir(&self) -> &Path {
        &self.clean_dir
    }

    /// Normalizes every raw capture
    pub fn run(&self) -> Result<NormalizeSummary, NormalizeError> {
        tracing::info!(
            "Normalizing {} into {}",
            self.raw_dir.display(),
            self.clean_dir.display()
        );

        fs::create_dir_all(&self.clean_dir)
            .map_err(|e| NormalizeError::io(&self.clean_dir, e))?;

        let mut checkpoints = Checkpointer::new(Stage::Normalize, self.checkpoint_interval);
        for file_name in self.raw_files()? {
            self.normalize_file(&file_name)?;
            checkpoints.tick(self.reporter.as_ref());
        }

        let files_cleaned = checkpoints.processed();
        self.reporter.finished(Stage::Normalize, files_cleaned);
        tracing::info!("Normalization completed: {} files", files_cleaned);

        Ok(NormalizeSummary { files_cleaned })
    }

    /// Names of the regular files in the raw directory, sorted
    fn raw_files(&self) -> Result<Vec<OsString>, NormalizeError> {
        let entries =
            fs::read_dir(&self.raw_dir).map_err(|e| NormalizeError::io(&self.raw_dir, e))?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| NormalizeError::io(&self.raw_dir, e))?;
            let file_type = entry
                .file_type()
                .map_err(|e| NormalizeError::io(entry.path(), e))?;

            if file_type.is_file() {
                names.push(entry.file_name());
            } else {
                tracing::debug!("Skipping non-file entry {}", entry.path().display());
            }
        }

        names.sort();
        Ok(names)
    }

    fn normalize_file(&self, file_name: &OsString) -> Result<(), NormalizeError> {
        let raw_path = self.raw_dir.join(file_name);
        let clean_path = self.clean_dir.join(file_name);

        let raw = fs::read_to_string(&raw_path).map_err(|e| NormalizeError::io(&raw_path, e))?;
        fs::write(&clean_path, normalize_text(&raw))
            .map_err(|e| NormalizeError::io(&clean_path, e))?;

        Ok(())
    }
}
