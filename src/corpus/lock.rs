//! Run-level lock for a raw corpus directory
//!
//! Raw captures may be appended to, so two runs writing the same directory
//! would interleave their output. The lock is a sibling file of the raw
//! directory (`<raw-dir>.lock`) created with create-new semantics and removed
//! when the guard is dropped. A lock left behind by a killed process has to be
//! removed by hand.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Outcome of a failed [`RunLock::acquire`]
#[derive(Debug)]
pub enum LockError {
    /// Another run holds the lock
    Held(PathBuf),
    /// The lock file could not be created
    Io(PathBuf, io::Error),
}

/// Guard holding the lock for one raw corpus directory
#[derive(Debug)]
pub struct RunLock {
    path: PathBuf,
}

impl RunLock {
    /// Acquires the lock for `raw_dir`
    pub fn acquire(raw_dir: &Path) -> Result<Self, LockError> {
        let path = lock_path(raw_dir);

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| LockError::Io(path.clone(), e))?;
        }

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(LockError::Held(path));
            }
            Err(e) => return Err(LockError::Io(path, e)),
        };

        let stamp = format!(
            "pid={}\nacquired={}\n",
            std::process::id(),
            chrono::Utc::now().to_rfc3339()
        );
        if let Err(e) = file.write_all(stamp.as_bytes()) {
            let _ = fs::remove_file(&path);
            return Err(LockError::Io(path, e));
        }

        tracing::debug!("Acquired run lock {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for RunLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::warn!("Failed to remove run lock {}: {}", self.path.display(), e);
        }
    }
}

/// `artifacts/raw` locks as `artifacts/raw.lock`
fn lock_path(raw_dir: &Path) -> PathBuf {
    let name = raw_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "corpus".to_string());

    let parent = raw_dir.parent().unwrap_or_else(|| Path::new(""));
    parent.join(format!("{}.lock", name))
}
