//! Library API client.
//!
//! The library serves image metadata at `/v1/images/<ref>` and image bytes
//! at `/v1/imagefile/<ref>`, where `<ref>` is `entity/collection/container:tag`.

use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PullError;
use crate::staging::{expect_success, stream_body};

/// Default library endpoint.
pub const DEFAULT_LIBRARY_URL: &str = "https://library.sylabs.io";

/// Prefix of sha256 content hashes reported by the library.
const SHA256_HASH_PREFIX: &str = "sha256.";

/// Image metadata reported by the library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LibraryImage {
    /// Content hash, e.g. `sha256.<hex>`.
    pub hash: String,
    /// Size in bytes, when reported.
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: LibraryImage,
}

/// Remote side of a library pull.
#[async_trait]
pub trait LibraryRemote: Send + Sync {
    /// Look up the content hash and metadata for a locator.
    async fn image(&self, locator: &str) -> Result<LibraryImage, PullError>;

    /// Download the image for a locator into `out`.
    ///
    /// `expected_hash` is the hash returned by [`LibraryRemote::image`];
    /// implementations verify it when they can.
    async fn download(
        &self,
        locator: &str,
        expected_hash: &str,
        out: &mut File,
        out_path: &Path,
    ) -> Result<u64, PullError>;
}

/// Normalize a library locator to `entity/collection/container:tag`.
///
/// - `alpine` -> `library/default/alpine:latest`
/// - `tests/busybox:1.0` -> `library/tests/busybox:1.0`
/// - `sylabs/tests/busybox` -> `sylabs/tests/busybox:latest`
pub fn normalize_ref(locator: &str) -> String {
    let (path, tag) = match locator.rsplit_once(':') {
        Some((path, tag)) if !tag.contains('/') && !tag.is_empty() => (path, tag),
        Some((path, tag)) if tag.is_empty() => (path, "latest"),
        _ => (locator, "latest"),
    };

    let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
    let path = match parts.as_slice() {
        [container] => format!("library/default/{container}"),
        [collection, container] => format!("library/{collection}/{container}"),
        _ => parts.join("/"),
    };

    format!("{path}:{tag}")
}

/// HTTP client for a library endpoint.
#[derive(Debug, Clone)]
pub struct LibraryClient {
    client: Client,
    base_url: String,
    auth_token: Option<String>,
}

impl LibraryClient {
    /// Create a client for `base_url`, sending `auth_token` as a bearer token.
    pub fn new(base_url: &str, auth_token: Option<String>) -> Result<Self, PullError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PullError::metadata(base_url, e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let request = self.client.get(url);
        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl LibraryRemote for LibraryClient {
    async fn image(&self, locator: &str) -> Result<LibraryImage, PullError> {
        let url = format!("{}/v1/images/{}", self.base_url, normalize_ref(locator));
        debug!(url = %url, "Fetching library image metadata");

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| PullError::metadata(locator, e))?;

        match response.status() {
            StatusCode::OK => {
                let body: ImageResponse = response
                    .json()
                    .await
                    .map_err(|e| PullError::metadata(locator, e))?;
                if body.data.hash.is_empty() {
                    return Err(PullError::metadata(locator, "library returned no image hash"));
                }
                Ok(body.data)
            }
            StatusCode::NOT_FOUND => Err(PullError::metadata(locator, "image not found")),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PullError::metadata(
                locator,
                "access denied, check the library token",
            )),
            status => Err(PullError::metadata(
                locator,
                format!("library returned {status}"),
            )),
        }
    }

    async fn download(
        &self,
        locator: &str,
        expected_hash: &str,
        out: &mut File,
        out_path: &Path,
    ) -> Result<u64, PullError> {
        let url = format!("{}/v1/imagefile/{}", self.base_url, normalize_ref(locator));
        debug!(url = %url, dest = %out_path.display(), "Downloading library image");

        let response = self
            .get(&url)
            .send()
            .await
            .map_err(|e| PullError::download(&url, e))?;
        let response = expect_success(response, &url)?;

        let (size, digest) = stream_body(response, &url, out, out_path).await?;

        if let Some(expected) = expected_hash.strip_prefix(SHA256_HASH_PREFIX) {
            if !expected.eq_ignore_ascii_case(&digest) {
                return Err(PullError::download(
                    &url,
                    format!("digest mismatch: expected {expected_hash}, got {SHA256_HASH_PREFIX}{digest}"),
                ));
            }
        }

        info!(locator = %locator, size = size, "Library image downloaded");
        Ok(size)
    }
}
