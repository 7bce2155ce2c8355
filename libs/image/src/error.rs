//! Error types for image acquisition.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from resolving, fetching, caching, or copying an image.
///
/// Every variant is terminal for a pull: nothing here is retried.
#[derive(Debug, Error)]
pub enum PullError {
    /// The reference has no usable locator.
    #[error("bad uri {0}")]
    InvalidReference(String),

    /// The output file exists and `force` was not set.
    #[error("image file already exists - will not overwrite: {}", .0.display())]
    DestinationExists(PathBuf),

    /// Looking up image metadata on the remote failed.
    #[error("while getting image info for {reference}: {message}")]
    RemoteMetadata { reference: String, message: String },

    /// Transferring image content failed or was interrupted.
    #[error("download of {url} failed: {message}")]
    Download { url: String, message: String },

    /// Opening, writing, or copying a local file failed.
    #[error("{}: {source}", .path.display())]
    LocalIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cache could not be inspected.
    #[error("unable to check if {} exists: {source}", .path.display())]
    CacheIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PullError {
    pub(crate) fn metadata(reference: impl Into<String>, message: impl ToString) -> Self {
        Self::RemoteMetadata {
            reference: reference.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn download(url: impl Into<String>, message: impl ToString) -> Self {
        Self::Download {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn local(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::LocalIo {
            path: path.into(),
            source,
        }
    }

    /// Stable reason code for structured logs.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PullError::InvalidReference(_) => "invalid_reference",
            PullError::DestinationExists(_) => "destination_exists",
            PullError::RemoteMetadata { .. } => "remote_metadata_error",
            PullError::Download { .. } => "download_error",
            PullError::LocalIo { .. } => "local_io_error",
            PullError::CacheIo { .. } => "cache_io_error",
        }
    }
}
