//! Output staging shared by every fetch strategy.
//!
//! Destinations are written into a temporary file in the same directory and
//! renamed into place on success, so a failed pull leaves the destination
//! absent or untouched.

use std::fs::{self, File, Permissions};
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::error::PullError;

/// Mode requested for pulled image files; the process umask still applies.
const IMAGE_MODE: u32 = 0o777;

/// Refuse to continue if `dest` exists and `force` is not set.
pub(crate) fn check_destination(dest: &Path, force: bool) -> Result<(), PullError> {
    if !force && fs::symlink_metadata(dest).is_ok() {
        return Err(PullError::DestinationExists(dest.to_path_buf()));
    }
    Ok(())
}

/// A destination file being written.
pub(crate) struct StagedFile {
    file: NamedTempFile,
    dest: PathBuf,
    force: bool,
}

impl StagedFile {
    /// Check the destination and open a temporary file beside it.
    pub(crate) fn create(dest: &Path, force: bool) -> Result<Self, PullError> {
        check_destination(dest, force)?;

        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let file = tempfile::Builder::new()
            .prefix(".capsule-")
            .permissions(Permissions::from_mode(IMAGE_MODE))
            .tempfile_in(dir)
            .map_err(|e| PullError::local(dir, e))?;

        Ok(Self {
            file,
            dest: dest.to_path_buf(),
            force,
        })
    }

    pub(crate) fn file_mut(&mut self) -> &mut File {
        self.file.as_file_mut()
    }

    pub(crate) fn path(&self) -> &Path {
        self.file.path()
    }

    /// Flush and rename into place.
    pub(crate) fn commit(self) -> Result<PathBuf, PullError> {
        let file = self.file.as_file();
        file.sync_all()
            .map_err(|e| PullError::local(self.file.path(), e))?;

        let dest = self.dest;
        let persisted = if self.force {
            self.file.persist(&dest)
        } else {
            self.file.persist_noclobber(&dest)
        };

        match persisted {
            Ok(_) => Ok(dest),
            Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                Err(PullError::DestinationExists(dest))
            }
            Err(e) => Err(PullError::local(dest, e.error)),
        }
    }
}

/// Stream a response body into `out`, returning the byte count and the
/// hex sha256 of what was written.
pub(crate) async fn stream_body(
    mut response: reqwest::Response,
    url: &str,
    out: &mut File,
    out_path: &Path,
) -> Result<(u64, String), PullError> {
    let mut hasher = Sha256::new();
    let mut written = 0u64;

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| PullError::download(url, e))?
    {
        hasher.update(&chunk);
        out.write_all(&chunk)
            .map_err(|e| PullError::local(out_path, e))?;
        written += chunk.len() as u64;
    }

    out.flush().map_err(|e| PullError::local(out_path, e))?;
    Ok((written, hex::encode(hasher.finalize())))
}

/// Fail with a download error unless the response is a success.
pub(crate) fn expect_success(
    response: reqwest::Response,
    url: &str,
) -> Result<reqwest::Response, PullError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(PullError::download(url, format!("server returned {status}")))
    }
}
