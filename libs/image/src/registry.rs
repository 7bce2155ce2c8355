//! OCI registry pulls.
//!
//! Implements enough of the OCI Distribution Specification to pull an image
//! by tag or digest: manifest (with platform selection from an index), config
//! and layer blobs with digest verification, and the bearer-token challenge.
//! The result is written to the destination as an OCI image-layout tar.
//!
//! Reference: https://github.com/opencontainers/distribution-spec

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use reqwest::header::{ACCEPT, WWW_AUTHENTICATE};
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::PullError;
use crate::staging::{check_destination, expect_success, stream_body, StagedFile};

/// Registry used for references without an explicit host.
pub const DOCKER_HUB_REGISTRY: &str = "registry-1.docker.io";

const OCI_MANIFEST_MEDIA_TYPE: &str = "application/vnd.oci.image.manifest.v1+json";
const OCI_INDEX_MEDIA_TYPE: &str = "application/vnd.oci.image.index.v1+json";

const MANIFEST_ACCEPT: &str = "application/vnd.oci.image.manifest.v1+json, \
     application/vnd.docker.distribution.manifest.v2+json, \
     application/vnd.oci.image.index.v1+json, \
     application/vnd.docker.distribution.manifest.list.v2+json";

/// Annotation carrying the tag in an image-layout index.
const REF_NAME_ANNOTATION: &str = "org.opencontainers.image.ref.name";

/// Credentials forwarded to registries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerAuth {
    pub username: String,
    pub password: String,
}

/// Per-pull options for the registry strategy.
#[derive(Debug, Clone, Default)]
pub struct RegistryOptions {
    /// Directory for downloaded blobs; the system temp dir when unset.
    pub tmp_dir: Option<PathBuf>,
    /// Overwrite an existing destination.
    pub force: bool,
    /// Talk plain HTTP to the registry.
    pub no_https: bool,
    /// Credentials for the registry token service.
    pub docker_auth: Option<DockerAuth>,
}

/// Fetch strategy for registry references.
#[async_trait]
pub trait RegistryFetch: Send + Sync {
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        options: &RegistryOptions,
    ) -> Result<(), PullError>;
}

/// A parsed registry reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryRef {
    /// Registry host, e.g. `ghcr.io` or `localhost:5000`.
    pub registry: String,
    /// Repository path, e.g. `library/alpine`.
    pub repository: String,
    /// Tag or digest.
    pub reference: String,
}

/// Parse a registry locator into registry, repository, and tag/digest.
///
/// Examples:
/// - `alpine:latest` -> (registry-1.docker.io, library/alpine, latest)
/// - `ghcr.io/org/repo:v1` -> (ghcr.io, org/repo, v1)
/// - `registry.example.com/foo/bar@sha256:abc...` -> (registry.example.com, foo/bar, sha256:abc...)
pub fn parse_image_ref(locator: &str) -> Result<RegistryRef, PullError> {
    let image_ref = locator.trim_start_matches('/');
    if image_ref.is_empty() {
        return Err(PullError::InvalidReference(locator.to_string()));
    }

    let (name_part, reference) = if let Some((name, digest)) = image_ref.rsplit_once('@') {
        (name, digest.to_string())
    } else if let Some((name, tag)) = image_ref.rsplit_once(':') {
        // A colon before the last slash is a registry port, not a tag.
        if tag.contains('/') || name.ends_with(']') {
            (image_ref, "latest".to_string())
        } else {
            (name, tag.to_string())
        }
    } else {
        (image_ref, "latest".to_string())
    };

    if name_part.is_empty() || reference.is_empty() {
        return Err(PullError::InvalidReference(locator.to_string()));
    }

    let (registry, repository) = match name_part.split_once('/') {
        None => (DOCKER_HUB_REGISTRY.to_string(), format!("library/{name_part}")),
        Some((host, repo))
            if host.contains('.') || host.contains(':') || host == "localhost" =>
        {
            let host = match host {
                "docker.io" | "index.docker.io" => DOCKER_HUB_REGISTRY,
                other => other,
            };
            let repo = if host == DOCKER_HUB_REGISTRY && !repo.contains('/') {
                format!("library/{repo}")
            } else {
                repo.to_string()
            };
            (host.to_string(), repo)
        }
        Some(_) => (DOCKER_HUB_REGISTRY.to_string(), name_part.to_string()),
    };

    Ok(RegistryRef {
        registry,
        repository,
        reference,
    })
}

/// The parts of an image manifest needed to lay the image out on disk.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageManifest {
    #[serde(default)]
    media_type: Option<String>,
    config: BlobRef,
    layers: Vec<BlobRef>,
}

#[derive(Debug, Deserialize)]
struct BlobRef {
    digest: String,
    size: u64,
}

impl ImageManifest {
    /// Sum of the advertised layer sizes, checked against the pull limit.
    fn compressed_size(&self) -> u64 {
        self.layers.iter().map(|layer| layer.size).sum()
    }

    /// Config then layers, each digest once. A layer shared between
    /// positions is stored once in the layout.
    fn unique_blobs(&self) -> Vec<&BlobRef> {
        let mut seen = HashSet::new();
        std::iter::once(&self.config)
            .chain(&self.layers)
            .filter(|blob| seen.insert(blob.digest.as_str()))
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct Index {
    #[serde(default)]
    manifests: Option<Vec<PlatformDescriptor>>,
}

#[derive(Debug, Deserialize)]
struct PlatformDescriptor {
    digest: String,
    #[serde(default)]
    platform: Option<Platform>,
}

#[derive(Debug, Deserialize)]
struct Platform {
    architecture: String,
    os: String,
}

/// Configuration for the registry client.
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Max compressed image size.
    pub max_compressed_size: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_compressed_size: 10 * 1024 * 1024 * 1024, // 10 GiB
        }
    }
}

/// Registry client producing OCI image-layout archives.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    config: RegistryConfig,
    client: Client,
}

impl RegistryClient {
    pub fn new(config: RegistryConfig) -> Result<Self, PullError> {
        let client = Client::builder()
            .build()
            .map_err(|e| PullError::download("registry client", e))?;
        Ok(Self { config, client })
    }

    /// Fetch the manifest for `image`, descending through an index to the
    /// entry for the host platform. Returns the raw bytes and their digest.
    async fn fetch_manifest(
        &self,
        session: &mut Session<'_>,
        image: &RegistryRef,
    ) -> Result<(Vec<u8>, String), PullError> {
        let (bytes, digest) = self.fetch_manifest_bytes(session, &image.reference).await?;

        match select_from_index(&bytes).map_err(|m| PullError::metadata(&image.reference, m))? {
            Some(child) => {
                debug!(digest = %child, "Selected platform manifest from index");
                self.fetch_manifest_bytes(session, &child).await
            }
            None => Ok((bytes, digest)),
        }
    }

    async fn fetch_manifest_bytes(
        &self,
        session: &mut Session<'_>,
        reference: &str,
    ) -> Result<(Vec<u8>, String), PullError> {
        let url = format!(
            "{}/v2/{}/manifests/{}",
            session.base_url, session.repository, reference
        );
        debug!(url = %url, "Pulling manifest");

        let response = session
            .get(&url, Some(MANIFEST_ACCEPT))
            .await
            .map_err(|m| PullError::metadata(reference, m))?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| PullError::metadata(reference, e))?;

                let computed = format!("sha256:{}", hex::encode(Sha256::digest(&body)));
                if reference.starts_with("sha256:") && computed != reference {
                    return Err(PullError::metadata(
                        reference,
                        format!("digest mismatch: expected {reference}, got {computed}"),
                    ));
                }

                Ok((body.to_vec(), computed))
            }
            StatusCode::NOT_FOUND => Err(PullError::metadata(reference, "manifest not found")),
            StatusCode::UNAUTHORIZED => {
                Err(PullError::metadata(reference, "authentication required"))
            }
            status => Err(PullError::metadata(
                reference,
                format!("registry returned {status}"),
            )),
        }
    }
}

#[async_trait]
impl RegistryFetch for RegistryClient {
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        options: &RegistryOptions,
    ) -> Result<(), PullError> {
        check_destination(dest, options.force)?;

        let image = parse_image_ref(locator)?;
        let scheme = if options.no_https { "http" } else { "https" };
        let mut session = Session {
            client: &self.client,
            base_url: format!("{scheme}://{}", image.registry),
            repository: image.repository.clone(),
            auth: options.docker_auth.as_ref(),
            token: None,
        };

        let (manifest_bytes, manifest_digest) = self.fetch_manifest(&mut session, &image).await?;
        let manifest: ImageManifest = serde_json::from_slice(&manifest_bytes)
            .map_err(|e| PullError::metadata(&image.reference, e))?;

        let total_compressed = manifest.compressed_size();
        if total_compressed > self.config.max_compressed_size {
            return Err(PullError::download(
                locator,
                format!(
                    "image too large: {total_compressed} bytes exceeds limit of {} bytes",
                    self.config.max_compressed_size
                ),
            ));
        }

        info!(
            registry = %image.registry,
            repository = %image.repository,
            digest = %manifest_digest,
            layer_count = manifest.layers.len(),
            total_compressed_bytes = total_compressed,
            "Manifest fetched, pulling blobs"
        );

        let tmp_root = options.tmp_dir.clone().unwrap_or_else(std::env::temp_dir);
        let work = tempfile::Builder::new()
            .prefix("capsule-pull-")
            .tempdir_in(&tmp_root)
            .map_err(|e| PullError::local(&tmp_root, e))?;

        let mut blobs = Vec::with_capacity(manifest.layers.len() + 1);
        for blob in manifest.unique_blobs() {
            let hex = sha256_hex(&blob.digest)
                .ok_or_else(|| PullError::metadata(&blob.digest, "unsupported digest"))?;
            let path = work.path().join(hex);
            session.pull_blob(&blob.digest, &path).await?;
            blobs.push((hex.to_string(), path));
        }

        let manifest_hex = sha256_hex(&manifest_digest).unwrap_or_default().to_string();
        let mut staged = StagedFile::create(dest, options.force)?;
        let staged_path = staged.path().to_path_buf();
        write_layout(
            staged.file_mut(),
            &LayoutManifest {
                bytes: &manifest_bytes,
                hex: &manifest_hex,
                media_type: manifest
                    .media_type
                    .as_deref()
                    .unwrap_or(OCI_MANIFEST_MEDIA_TYPE),
                ref_name: &image.reference,
            },
            &blobs,
        )
        .map_err(|e| PullError::local(staged_path, e))?;
        staged.commit()?;

        info!(
            locator = %locator,
            dest = %dest.display(),
            digest = %manifest_digest,
            "Registry image written"
        );
        Ok(())
    }
}

/// One image pull against one repository, holding the bearer token once
/// the registry has challenged for it.
struct Session<'a> {
    client: &'a Client,
    base_url: String,
    repository: String,
    auth: Option<&'a DockerAuth>,
    token: Option<String>,
}

impl Session<'_> {
    async fn get(&mut self, url: &str, accept: Option<&str>) -> Result<Response, String> {
        let response = self.send(url, accept).await?;

        if response.status() == StatusCode::UNAUTHORIZED && self.token.is_none() {
            let challenge = response
                .headers()
                .get(WWW_AUTHENTICATE)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_bearer_challenge);

            if let Some(challenge) = challenge {
                self.token = Some(self.fetch_token(&challenge).await?);
                return self.send(url, accept).await;
            }
        }

        Ok(response)
    }

    async fn send(&self, url: &str, accept: Option<&str>) -> Result<Response, String> {
        let mut request = self.client.get(url);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        request = match (&self.token, self.auth) {
            (Some(token), _) => request.bearer_auth(token),
            (None, Some(auth)) => request.basic_auth(&auth.username, Some(&auth.password)),
            (None, None) => request,
        };
        request.send().await.map_err(|e| e.to_string())
    }

    async fn fetch_token(&self, challenge: &HashMap<String, String>) -> Result<String, String> {
        let realm = challenge
            .get("realm")
            .ok_or_else(|| "token challenge without realm".to_string())?;
        let scope = challenge
            .get("scope")
            .cloned()
            .unwrap_or_else(|| format!("repository:{}:pull", self.repository));

        let mut query = vec![("scope", scope)];
        if let Some(service) = challenge.get("service") {
            query.push(("service", service.clone()));
        }

        let mut request = self.client.get(realm).query(&query);
        if let Some(auth) = self.auth {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        debug!(realm = %realm, "Requesting registry token");
        let response = request.send().await.map_err(|e| e.to_string())?;
        if !response.status().is_success() {
            return Err(format!("token service returned {}", response.status()));
        }

        let body: TokenResponse = response.json().await.map_err(|e| e.to_string())?;
        body.token
            .or(body.access_token)
            .ok_or_else(|| "token service returned no token".to_string())
    }

    /// Pull a blob by digest to a file, verifying its content.
    async fn pull_blob(&mut self, digest: &str, dest: &Path) -> Result<u64, PullError> {
        let url = format!("{}/v2/{}/blobs/{}", self.base_url, self.repository, digest);
        debug!(url = %url, dest = %dest.display(), "Pulling blob");

        let response = self
            .get(&url, None)
            .await
            .map_err(|m| PullError::download(&url, m))?;
        let response = expect_success(response, &url)?;

        let mut file = File::create(dest).map_err(|e| PullError::local(dest, e))?;
        let (size, hex) = stream_body(response, &url, &mut file, dest).await?;

        let computed = format!("sha256:{hex}");
        if computed != digest {
            return Err(PullError::download(
                &url,
                format!("digest mismatch: expected {digest}, got {computed}"),
            ));
        }

        debug!(digest = %digest, size = size, "Blob downloaded");
        Ok(size)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    access_token: Option<String>,
}

/// Parse `Bearer realm="...",service="...",scope="..."` into its parameters.
fn parse_bearer_challenge(header: &str) -> Option<HashMap<String, String>> {
    let (scheme, rest) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let mut params = HashMap::new();
    let mut rest = rest.trim();
    while let Some((key, after)) = rest.split_once('=') {
        let key = key.trim().to_ascii_lowercase();
        let after = after.trim_start();
        let (value, remainder) = match after.strip_prefix('"') {
            Some(quoted) => match quoted.find('"') {
                Some(end) => (&quoted[..end], &quoted[end + 1..]),
                None => (quoted, ""),
            },
            None => match after.find(',') {
                Some(end) => (&after[..end], &after[end..]),
                None => (after, ""),
            },
        };
        params.insert(key, value.to_string());
        rest = remainder.trim_start().trim_start_matches(',').trim_start();
    }

    Some(params)
}

/// Pick the manifest for the host platform if `bytes` is an index.
fn select_from_index(bytes: &[u8]) -> Result<Option<String>, String> {
    let index: Index = serde_json::from_slice(bytes).map_err(|e| e.to_string())?;
    let Some(manifests) = index.manifests else {
        return Ok(None);
    };

    let arch = host_architecture();
    manifests
        .into_iter()
        .find(|m| {
            m.platform
                .as_ref()
                .is_some_and(|p| p.os == "linux" && p.architecture == arch)
        })
        .map(|m| Some(m.digest))
        .ok_or_else(|| format!("no manifest for linux/{arch} in image index"))
}

/// The host architecture in OCI platform naming.
fn host_architecture() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64le",
        other => other,
    }
}

/// Hex part of a `sha256:<hex>` digest, if well formed.
fn sha256_hex(digest: &str) -> Option<&str> {
    let hex = digest.strip_prefix("sha256:")?;
    (hex.len() == 64 && hex.bytes().all(|b| b.is_ascii_hexdigit())).then_some(hex)
}

struct LayoutManifest<'a> {
    bytes: &'a [u8],
    hex: &'a str,
    media_type: &'a str,
    ref_name: &'a str,
}

/// Write an OCI image-layout tar holding the manifest and its blobs.
fn write_layout(
    out: &mut File,
    manifest: &LayoutManifest<'_>,
    blobs: &[(String, PathBuf)],
) -> io::Result<()> {
    let mut builder = tar::Builder::new(out);

    append_bytes(
        &mut builder,
        "oci-layout",
        br#"{"imageLayoutVersion":"1.0.0"}"#,
    )?;

    let index = serde_json::json!({
        "schemaVersion": 2,
        "mediaType": OCI_INDEX_MEDIA_TYPE,
        "manifests": [{
            "mediaType": manifest.media_type,
            "digest": format!("sha256:{}", manifest.hex),
            "size": manifest.bytes.len(),
            "annotations": { REF_NAME_ANNOTATION: manifest.ref_name },
        }],
    });
    append_bytes(&mut builder, "index.json", &serde_json::to_vec(&index)?)?;

    append_bytes(
        &mut builder,
        &format!("blobs/sha256/{}", manifest.hex),
        manifest.bytes,
    )?;
    for (hex, path) in blobs {
        builder.append_path_with_name(path, format!("blobs/sha256/{hex}"))?;
    }

    builder.into_inner()?.flush()
}

fn append_bytes<W: Write>(
    builder: &mut tar::Builder<W>,
    path: &str,
    data: &[u8],
) -> io::Result<()> {
    let mut header = tar::Header::new_gnu();
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    builder.append_data(&mut header, path, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_image_ref_simple() {
        let r = parse_image_ref("alpine:latest").unwrap();
        assert_eq!(r.registry, "registry-1.docker.io");
        assert_eq!(r.repository, "library/alpine");
        assert_eq!(r.reference, "latest");
    }

    #[test]
    fn test_parse_image_ref_no_tag() {
        let r = parse_image_ref("alpine").unwrap();
        assert_eq!(r.repository, "library/alpine");
        assert_eq!(r.reference, "latest");
    }

    #[test]
    fn test_parse_image_ref_user_repo() {
        let r = parse_image_ref("myuser/myapp:v1").unwrap();
        assert_eq!(r.registry, "registry-1.docker.io");
        assert_eq!(r.repository, "myuser/myapp");
        assert_eq!(r.reference, "v1");
    }

    #[test]
    fn test_parse_image_ref_docker_io_alias() {
        let r = parse_image_ref("docker.io/alpine:3.19").unwrap();
        assert_eq!(r.registry, "registry-1.docker.io");
        assert_eq!(r.repository, "library/alpine");
    }

    #[test]
    fn test_parse_image_ref_digest() {
        let r = parse_image_ref("ghcr.io/org/app@sha256:abcdef1234567890").unwrap();
        assert_eq!(r.registry, "ghcr.io");
        assert_eq!(r.repository, "org/app");
        assert_eq!(r.reference, "sha256:abcdef1234567890");
    }

    #[test]
    fn test_parse_image_ref_localhost() {
        let r = parse_image_ref("localhost:5000/myapp:test").unwrap();
        assert_eq!(r.registry, "localhost:5000");
        assert_eq!(r.repository, "myapp");
        assert_eq!(r.reference, "test");

        let r = parse_image_ref("localhost:5000/myapp").unwrap();
        assert_eq!(r.repository, "myapp");
        assert_eq!(r.reference, "latest");
    }

    #[test]
    fn test_parse_image_ref_empty() {
        assert!(parse_image_ref("").is_err());
        assert!(parse_image_ref("alpine@").is_err());
    }

    #[test]
    fn test_parse_bearer_challenge() {
        let params = parse_bearer_challenge(
            r#"Bearer realm="https://auth.docker.io/token",service="registry.docker.io",scope="repository:library/alpine:pull,push""#,
        )
        .unwrap();
        assert_eq!(params["realm"], "https://auth.docker.io/token");
        assert_eq!(params["service"], "registry.docker.io");
        assert_eq!(params["scope"], "repository:library/alpine:pull,push");

        assert!(parse_bearer_challenge(r#"Basic realm="x""#).is_none());
    }

    #[test]
    fn test_select_from_index() {
        let arch = host_architecture();
        let index = serde_json::json!({
            "schemaVersion": 2,
            "manifests": [
                { "digest": "sha256:other", "platform": { "architecture": "s390x-none", "os": "linux" } },
                { "digest": "sha256:mine", "platform": { "architecture": arch, "os": "linux" } },
            ],
        });
        let bytes = serde_json::to_vec(&index).unwrap();
        assert_eq!(select_from_index(&bytes).unwrap().as_deref(), Some("sha256:mine"));

        let manifest = serde_json::json!({ "schemaVersion": 2, "config": {}, "layers": [] });
        let bytes = serde_json::to_vec(&manifest).unwrap();
        assert_eq!(select_from_index(&bytes).unwrap(), None);
    }

    #[test]
    fn test_sha256_hex() {
        let hex = "a".repeat(64);
        assert_eq!(sha256_hex(&format!("sha256:{hex}")), Some(hex.as_str()));
        assert_eq!(sha256_hex("sha256:../../etc"), None);
        assert_eq!(sha256_hex("sha512:abc"), None);
    }

    #[test]
    fn test_manifest_blobs_for_layout() {
        let manifest: ImageManifest = serde_json::from_value(serde_json::json!({
            "schemaVersion": 2,
            "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
            "config": { "mediaType": "application/vnd.oci.image.config.v1+json", "digest": "sha256:cfg", "size": 300 },
            "layers": [
                { "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip", "digest": "sha256:base", "size": 5000 },
                { "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip", "digest": "sha256:app", "size": 2000 },
                { "mediaType": "application/vnd.oci.image.layer.v1.tar+gzip", "digest": "sha256:base", "size": 5000 },
            ],
        }))
        .unwrap();

        let digests: Vec<&str> = manifest
            .unique_blobs()
            .iter()
            .map(|blob| blob.digest.as_str())
            .collect();
        assert_eq!(digests, ["sha256:cfg", "sha256:base", "sha256:app"]);
        assert_eq!(manifest.compressed_size(), 12000);
        assert_eq!(
            manifest.media_type.as_deref(),
            Some("application/vnd.docker.distribution.manifest.v2+json")
        );
    }

    #[test]
    fn test_write_layout_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let layer_hex = "b".repeat(64);
        let layer_path = dir.path().join(&layer_hex);
        std::fs::write(&layer_path, b"layer").unwrap();

        let manifest_hex = "c".repeat(64);
        let archive = dir.path().join("image.tar");
        let mut out = File::create(&archive).unwrap();
        write_layout(
            &mut out,
            &LayoutManifest {
                bytes: b"{}",
                hex: &manifest_hex,
                media_type: OCI_MANIFEST_MEDIA_TYPE,
                ref_name: "v1",
            },
            &[(layer_hex.clone(), layer_path)],
        )
        .unwrap();

        let mut tar = tar::Archive::new(File::open(&archive).unwrap());
        let names: Vec<String> = tar
            .entries()
            .unwrap()
            .map(|entry| entry.unwrap().path().unwrap().display().to_string())
            .collect();
        assert_eq!(
            names,
            [
                "oci-layout".to_string(),
                "index.json".to_string(),
                format!("blobs/sha256/{manifest_hex}"),
                format!("blobs/sha256/{layer_hex}"),
            ]
        );
    }
}
