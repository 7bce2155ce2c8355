//! Legacy hub pulls.
//!
//! The hub resolves `user/collection[:tag]` to a manifest naming the image
//! URL, which is then downloaded as-is.

use std::path::Path;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::PullError;
use crate::staging::{expect_success, stream_body, StagedFile};

/// Default hub endpoint.
pub const DEFAULT_SHUB_URL: &str = "https://singularity-hub.org";

/// Fetch strategy for `shub://` references.
#[async_trait]
pub trait ShubFetch: Send + Sync {
    /// Pull `locator` to `dest`, refusing to overwrite unless `force`.
    /// `allow_insecure` permits plain HTTP to the hub.
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        force: bool,
        allow_insecure: bool,
    ) -> Result<(), PullError>;
}

/// Hub manifest for one container.
#[derive(Debug, Clone, Deserialize)]
pub struct ShubManifest {
    /// Download URL of the image.
    pub image: String,
    /// Content version reported by the hub.
    #[serde(default)]
    pub version: Option<String>,
}

/// HTTP client for a hub endpoint.
#[derive(Debug, Clone)]
pub struct ShubClient {
    client: Client,
    base_url: String,
}

impl ShubClient {
    pub fn new(base_url: &str) -> Result<Self, PullError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PullError::metadata(base_url, e))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn api_base(&self, allow_insecure: bool) -> String {
        match self.base_url.strip_prefix("https://") {
            Some(host) if allow_insecure => format!("http://{host}"),
            _ => self.base_url.clone(),
        }
    }

    /// Fetch the manifest for `locator`.
    pub async fn manifest(
        &self,
        locator: &str,
        allow_insecure: bool,
    ) -> Result<ShubManifest, PullError> {
        let url = format!(
            "{}/api/container/{}",
            self.api_base(allow_insecure),
            with_default_tag(locator)
        );
        debug!(url = %url, "Fetching hub manifest");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PullError::metadata(locator, e))?;

        match response.status() {
            StatusCode::OK => response
                .json()
                .await
                .map_err(|e| PullError::metadata(locator, e)),
            StatusCode::NOT_FOUND => Err(PullError::metadata(locator, "container not found")),
            status => Err(PullError::metadata(locator, format!("hub returned {status}"))),
        }
    }
}

#[async_trait]
impl ShubFetch for ShubClient {
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        force: bool,
        allow_insecure: bool,
    ) -> Result<(), PullError> {
        let mut staged = StagedFile::create(dest, force)?;
        let manifest = self.manifest(locator, allow_insecure).await?;

        let response = self
            .client
            .get(&manifest.image)
            .send()
            .await
            .map_err(|e| PullError::download(&manifest.image, e))?;
        let response = expect_success(response, &manifest.image)?;

        let out_path = staged.path().to_path_buf();
        let (size, _) = stream_body(response, &manifest.image, staged.file_mut(), &out_path).await?;
        staged.commit()?;

        info!(
            locator = %locator,
            version = manifest.version.as_deref().unwrap_or("-"),
            size = size,
            "Hub image downloaded"
        );
        Ok(())
    }
}

fn with_default_tag(locator: &str) -> String {
    let last = locator.rsplit('/').next().unwrap_or(locator);
    if last.contains(':') || last.contains('@') {
        locator.to_string()
    } else {
        format!("{locator}:latest")
    }
}
