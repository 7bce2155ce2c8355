//! Content-addressed image cache.
//!
//! Entries are keyed by `(content hash, logical name)` and live at
//! `<root>/library/<hash>/<name>`. An entry is written once by a fetch and
//! then only read; a re-fetch under the same key replaces it whole.
//!
//! There is no lock around check-then-fetch. Two concurrent pulls of the
//! same key may both download; the last rename wins and both copies are
//! identical content.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::PullError;

/// Subdirectory holding library images.
const LIBRARY_DIR: &str = "library";

/// Key of a cached artifact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub content_hash: String,
    pub logical_name: String,
}

impl CacheKey {
    pub fn new(content_hash: impl Into<String>, logical_name: impl Into<String>) -> Self {
        Self {
            content_hash: content_hash.into(),
            logical_name: logical_name.into(),
        }
    }
}

/// A cache slot and whether it is populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: CacheKey,
    pub path: PathBuf,
    pub present: bool,
}

/// Content-addressed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct ContentCache {
    root: PathBuf,
}

impl ContentCache {
    /// Create a cache rooted at `root`. Nothing is touched on disk.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of the entry for `(hash, name)`, whether or not it exists.
    pub fn path(&self, hash: &str, name: &str) -> PathBuf {
        self.root
            .join(LIBRARY_DIR)
            .join(escape_component(hash))
            .join(escape_component(name))
    }

    /// Check whether the entry for `(hash, name)` is present.
    ///
    /// Absence is `Ok(false)`; any other filesystem failure, or something
    /// other than a regular file at the entry path, is a [`PullError::CacheIo`].
    pub fn exists(&self, hash: &str, name: &str) -> Result<bool, PullError> {
        let path = self.path(hash, name);
        match fs::metadata(&path) {
            Ok(metadata) if metadata.is_file() => Ok(true),
            Ok(_) => Err(PullError::CacheIo {
                source: io::Error::other("cache entry is not a regular file"),
                path,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(PullError::CacheIo { path, source }),
        }
    }

    /// Look up the full entry for a key.
    pub fn entry(&self, key: CacheKey) -> Result<CacheEntry, PullError> {
        let present = self.exists(&key.content_hash, &key.logical_name)?;
        let path = self.path(&key.content_hash, &key.logical_name);
        Ok(CacheEntry { key, path, present })
    }

    /// Open a temporary file beside the entry for `(hash, name)`.
    ///
    /// The caller fills it and hands it to [`ContentCache::commit`].
    pub(crate) fn stage(&self, hash: &str, name: &str) -> Result<NamedTempFile, PullError> {
        let path = self.path(hash, name);
        let dir = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(dir).map_err(|source| PullError::CacheIo {
            path: dir.to_path_buf(),
            source,
        })?;
        tempfile::Builder::new()
            .prefix(".fetch-")
            .tempfile_in(dir)
            .map_err(|source| PullError::CacheIo {
                path: dir.to_path_buf(),
                source,
            })
    }

    /// Move a fully written staging file into place as the entry.
    pub(crate) fn commit(
        &self,
        staged: NamedTempFile,
        hash: &str,
        name: &str,
    ) -> Result<PathBuf, PullError> {
        let path = self.path(hash, name);
        staged
            .persist(&path)
            .map_err(|e| PullError::CacheIo {
                path: path.clone(),
                source: e.error,
            })?;
        debug!(hash = %hash, name = %name, path = %path.display(), "Cache entry stored");
        Ok(path)
    }
}

/// Escape one path component so distinct inputs never map to the same
/// component and no component is `.`, `..`, or contains a separator.
fn escape_component(raw: &str) -> String {
    if raw.is_empty() {
        return "%".to_string();
    }

    let mut out = String::with_capacity(raw.len());
    for (i, b) in raw.bytes().enumerate() {
        let keep = b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || (b == b'.' && i > 0);
        if keep {
            out.push(b as char);
        } else {
            let _ = write!(out, "%{b:02X}");
        }
    }
    out
}
