//! Pull dispatch.
//!
//! A [`PullRequest`] is resolved to an [`ImageReference`] and routed by
//! transport to one strategy. Library pulls go through the content cache;
//! the other transports are delegated whole, with `force` forwarded.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::ContentCache;
use crate::error::PullError;
use crate::library::{LibraryClient, LibraryRemote, DEFAULT_LIBRARY_URL};
use crate::net::{NetClient, NetFetch};
use crate::reference::{derive_name, resolve, ImageReference, Transport};
use crate::registry::{DockerAuth, RegistryClient, RegistryConfig, RegistryFetch, RegistryOptions};
use crate::shub::{ShubClient, ShubFetch, DEFAULT_SHUB_URL};
use crate::staging::{check_destination, StagedFile};

/// One pull, as requested by the user.
#[derive(Debug, Clone, Default)]
pub struct PullRequest {
    /// Raw image reference.
    pub reference: String,
    /// Output file given as a positional argument.
    pub output: Option<String>,
    /// Output file given as an explicit override; wins over `output`.
    pub name: Option<String>,
    /// Overwrite an existing output file.
    pub force: bool,
    /// Scratch directory for registry pulls.
    pub tmp_dir: Option<PathBuf>,
    /// Use plain HTTP for registries and the hub.
    pub no_https: bool,
    /// Credentials for registry pulls.
    pub docker_auth: Option<DockerAuth>,
}

/// What a successful pull produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullOutcome {
    pub transport: Transport,
    pub destination: PathBuf,
    /// Content hash, for library pulls.
    pub content_hash: Option<String>,
    /// Whether the content came from the cache without a download.
    pub cached: bool,
}

/// Remote endpoints for the default strategies.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    pub library_url: String,
    pub library_token: Option<String>,
    pub shub_url: String,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            library_url: DEFAULT_LIBRARY_URL.to_string(),
            library_token: None,
            shub_url: DEFAULT_SHUB_URL.to_string(),
        }
    }
}

/// One fetch strategy per transport.
#[derive(Clone)]
pub struct Strategies {
    pub library: Arc<dyn LibraryRemote>,
    pub shub: Arc<dyn ShubFetch>,
    pub net: Arc<dyn NetFetch>,
    pub registry: Arc<dyn RegistryFetch>,
}

impl Strategies {
    /// The HTTP-backed strategies.
    pub fn remote(config: &RemoteConfig) -> Result<Self, PullError> {
        Ok(Self {
            library: Arc::new(LibraryClient::new(
                &config.library_url,
                config.library_token.clone(),
            )?),
            shub: Arc::new(ShubClient::new(&config.shub_url)?),
            net: Arc::new(NetClient::new()?),
            registry: Arc::new(RegistryClient::new(RegistryConfig::default())?),
        })
    }
}

/// Routes resolved references to their fetch strategy.
pub struct FetchDispatcher {
    cache: ContentCache,
    strategies: Strategies,
}

impl FetchDispatcher {
    pub fn new(cache: ContentCache, strategies: Strategies) -> Self {
        Self { cache, strategies }
    }

    pub fn cache(&self) -> &ContentCache {
        &self.cache
    }

    /// Resolve and pull one image.
    ///
    /// On error the destination is either absent or exactly as it was.
    pub async fn pull(&self, request: PullRequest) -> Result<PullOutcome, PullError> {
        let reference = resolve(
            &request.reference,
            request.name.as_deref(),
            request.output.as_deref(),
        )?;
        let destination = PathBuf::from(&reference.destination_name);

        info!(
            transport = %reference.transport,
            locator = %reference.locator,
            dest = %destination.display(),
            "Pulling image"
        );

        let uncached = |transport| PullOutcome {
            transport,
            destination: destination.clone(),
            content_hash: None,
            cached: false,
        };

        match reference.transport {
            Transport::Library => {
                self.pull_library(&reference, &destination, request.force)
                    .await
            }
            Transport::Shub => {
                self.strategies
                    .shub
                    .pull(
                        &destination,
                        &reference.locator,
                        request.force,
                        request.no_https,
                    )
                    .await?;
                Ok(uncached(Transport::Shub))
            }
            transport @ (Transport::Http | Transport::Https) => {
                self.strategies
                    .net
                    .pull(&destination, &reference.uri(), request.force)
                    .await?;
                Ok(uncached(transport))
            }
            Transport::Registry => {
                let options = RegistryOptions {
                    tmp_dir: request.tmp_dir,
                    force: request.force,
                    no_https: request.no_https,
                    docker_auth: request.docker_auth,
                };
                self.strategies
                    .registry
                    .pull(&destination, &reference.locator, &options)
                    .await?;
                Ok(uncached(Transport::Registry))
            }
        }
    }

    async fn pull_library(
        &self,
        reference: &ImageReference,
        destination: &Path,
        force: bool,
    ) -> Result<PullOutcome, PullError> {
        check_destination(destination, force)?;

        let image = self.strategies.library.image(&reference.locator).await?;
        let name = derive_name(&reference.locator);

        let cached = self.cache.exists(&image.hash, &name)?;
        let cache_path = if cached {
            debug!(hash = %image.hash, name = %name, "Library image cache hit");
            self.cache.path(&image.hash, &name)
        } else {
            info!(hash = %image.hash, size = image.size, "Downloading library image");
            let mut staged = self.cache.stage(&image.hash, &name)?;
            let staged_path = staged.path().to_path_buf();
            self.strategies
                .library
                .download(
                    &reference.locator,
                    &image.hash,
                    staged.as_file_mut(),
                    &staged_path,
                )
                .await?;
            self.cache.commit(staged, &image.hash, &name)?
        };

        copy_into(&cache_path, destination, force)?;

        Ok(PullOutcome {
            transport: Transport::Library,
            destination: destination.to_path_buf(),
            content_hash: Some(image.hash),
            cached,
        })
    }
}

/// Copy a cache entry to the destination. Always a full copy; the cache
/// entry stays in place for later pulls.
fn copy_into(source: &Path, destination: &Path, force: bool) -> Result<(), PullError> {
    let mut src = File::open(source).map_err(|e| PullError::local(source, e))?;
    let mut staged = StagedFile::create(destination, force)?;
    let staged_path = staged.path().to_path_buf();

    io::copy(&mut src, staged.file_mut()).map_err(|e| PullError::local(staged_path, e))?;
    staged.commit()?;
    Ok(())
}
