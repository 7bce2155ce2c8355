//! Direct HTTP(S) downloads.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info};

use crate::error::PullError;
use crate::staging::{expect_success, stream_body, StagedFile};

/// Fetch strategy for `http://` and `https://` references.
#[async_trait]
pub trait NetFetch: Send + Sync {
    /// Download `url` to `dest`, refusing to overwrite unless `force`.
    async fn pull(&self, dest: &Path, url: &str, force: bool) -> Result<(), PullError>;
}

/// Plain HTTP downloader.
#[derive(Debug, Clone)]
pub struct NetClient {
    client: Client,
}

impl NetClient {
    pub fn new() -> Result<Self, PullError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PullError::download("http client", e))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl NetFetch for NetClient {
    async fn pull(&self, dest: &Path, url: &str, force: bool) -> Result<(), PullError> {
        let mut staged = StagedFile::create(dest, force)?;
        debug!(url = %url, dest = %dest.display(), "Downloading image");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PullError::download(url, e))?;
        let response = expect_success(response, url)?;

        let out_path = staged.path().to_path_buf();
        let (size, digest) = stream_body(response, url, staged.file_mut(), &out_path).await?;
        staged.commit()?;

        info!(url = %url, size = size, digest = %format!("sha256:{digest}"), "Image downloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_download_to_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/images/lolcow.sif"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"moo".to_vec()))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("lolcow.sif");
        let client = NetClient::new().unwrap();
        client
            .pull(&dest, &format!("{}/images/lolcow.sif", server.uri()), false)
            .await
            .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"moo");
    }

    #[tokio::test]
    async fn test_failed_download_leaves_destination() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("lolcow.sif");
        fs::write(&dest, b"old").unwrap();

        let client = NetClient::new().unwrap();
        let err = client
            .pull(&dest, &format!("{}/missing.sif", server.uri()), true)
            .await
            .unwrap_err();

        assert!(matches!(err, PullError::Download { .. }));
        assert_eq!(fs::read(&dest).unwrap(), b"old");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
