//! Raw corpus captures
//!
//! One text file per article, named after the article's sanitized title.

use crate::config::WriteMode;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File extension of every corpus file
pub const CORPUS_EXTENSION: &str = "txt";

/// An article link found on an index page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// Title attribute as found on the index page
    pub title: String,

    /// Title reduced to ASCII alphanumerics, used as the file stem
    pub stem: String,

    /// Link to the article, usually relative to the site base URL
    pub link: String,
}

impl ArticleRef {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        let title = title.into();
        let stem = sanitize_title(&title);
        Self {
            title,
            stem,
            link: link.into(),
        }
    }

    /// File name of this article's capture, `None` if nothing of the title
    /// survives sanitization
    pub fn file_name(&self) -> Option<String> {
        if self.stem.is_empty() {
            None
        } else {
            Some(format!("{}.{}", self.stem, CORPUS_EXTENSION))
        }
    }
}

/// Strips every character outside `[A-Za-z0-9]`
///
/// Distinct titles can sanitize to the same stem; the later capture then
/// replaces the earlier one.
///
/// # Example
///
/// ```
/// use wiki_corpus::sanitize_title;
///
/// assert_eq!(sanitize_title("Son Goku (Dragon Ball)"), "SonGokuDragonBall");
/// ```
pub fn sanitize_title(title: &str) -> String {
    title.chars().filter(char::is_ascii_alphanumeric).collect()
}

/// Writer for the raw corpus directory
#[derive(Debug, Clone)]
pub struct RawCorpus {
    dir: PathBuf,
    mode: WriteMode,
}

impl RawCorpus {
    pub fn new(dir: impl Into<PathBuf>, mode: WriteMode) -> Self {
        Self {
            dir: dir.into(),
            mode,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the corpus directory if it does not exist yet
    pub fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.dir)
    }

    /// Path of the capture for the given file name
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Writes the text fragments of one article, in order, with no separator
    ///
    /// An empty fragment list still creates (or truncates) the file.
    pub fn write_article(&self, file_name: &str, fragments: &[String]) -> io::Result<PathBuf> {
        let path = self.path_for(file_name);

        let mut options = OpenOptions::new();
        match self.mode {
            WriteMode::Overwrite => options.write(true).create(true).truncate(true),
            WriteMode::Append => options.append(true).create(true),
        };

        let mut file = options.open(&path)?;
        for fragment in fragments {
            file.write_all(fragment.as_bytes())?;
        }
        file.flush()?;

        Ok(path)
    }
}
