//! Integration tests for pull dispatch and the library cache path.
//!
//! Remotes are replaced with in-process fakes that count calls, so these
//! tests exercise resolution, cache reuse, and destination handling without
//! a network.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tempfile::TempDir;

use capsule_image::{
    derive_name, ContentCache, FetchDispatcher, LibraryImage, LibraryRemote, NetFetch,
    PullError, PullRequest, RegistryFetch, RegistryOptions, ShubFetch, Strategies, Transport,
};

const IMAGE_BYTES: &[u8] = b"SIF\x00fake image payload";

/// Library fake serving one image and counting traffic.
struct FakeLibrary {
    hash: String,
    metadata_calls: AtomicUsize,
    downloads: AtomicUsize,
    fail_download: bool,
}

impl FakeLibrary {
    fn new() -> Self {
        Self {
            hash: "sha256.0123abcd".to_string(),
            metadata_calls: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            fail_download: false,
        }
    }
}

#[async_trait]
impl LibraryRemote for FakeLibrary {
    async fn image(&self, _locator: &str) -> Result<LibraryImage, PullError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        Ok(LibraryImage {
            hash: self.hash.clone(),
            size: IMAGE_BYTES.len() as u64,
        })
    }

    async fn download(
        &self,
        _locator: &str,
        _expected_hash: &str,
        out: &mut File,
        _out_path: &Path,
    ) -> Result<u64, PullError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail_download {
            out.write_all(&IMAGE_BYTES[..4]).unwrap();
            return Err(PullError::Download {
                url: "fake".to_string(),
                message: "connection reset".to_string(),
            });
        }
        out.write_all(IMAGE_BYTES).unwrap();
        Ok(IMAGE_BYTES.len() as u64)
    }
}

/// Records delegated pulls for the non-library transports.
#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<String>>,
}

impl Recorder {
    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ShubFetch for Recorder {
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        force: bool,
        allow_insecure: bool,
    ) -> Result<(), PullError> {
        self.calls.lock().unwrap().push(format!(
            "shub {} {locator} force={force} insecure={allow_insecure}",
            dest.display()
        ));
        Ok(())
    }
}

#[async_trait]
impl NetFetch for Recorder {
    async fn pull(&self, dest: &Path, url: &str, force: bool) -> Result<(), PullError> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("net {} {url} force={force}", dest.display()));
        Ok(())
    }
}

#[async_trait]
impl RegistryFetch for Recorder {
    async fn pull(
        &self,
        dest: &Path,
        locator: &str,
        options: &RegistryOptions,
    ) -> Result<(), PullError> {
        self.calls.lock().unwrap().push(format!(
            "registry {} {locator} force={} nohttps={} tmp={:?}",
            dest.display(),
            options.force,
            options.no_https,
            options.tmp_dir
        ));
        Ok(())
    }
}

struct Harness {
    dir: TempDir,
    library: Arc<FakeLibrary>,
    recorder: Arc<Recorder>,
    dispatcher: FetchDispatcher,
}

fn harness(library: FakeLibrary) -> Harness {
    let dir = TempDir::new().unwrap();
    let library = Arc::new(library);
    let recorder = Arc::new(Recorder::default());

    let strategies = Strategies {
        library: library.clone(),
        shub: recorder.clone(),
        net: recorder.clone(),
        registry: recorder.clone(),
    };
    let cache = ContentCache::new(dir.path().join("cache"));

    Harness {
        dispatcher: FetchDispatcher::new(cache, strategies),
        dir,
        library,
        recorder,
    }
}

impl Harness {
    fn dest(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn request(&self, reference: &str, dest: &Path) -> PullRequest {
        PullRequest {
            reference: reference.to_string(),
            name: Some(dest.to_string_lossy().into_owned()),
            ..Default::default()
        }
    }
}

#[tokio::test]
async fn test_library_pull_fills_cache_then_reuses_it() {
    let h = harness(FakeLibrary::new());
    let first = h.dest("first.sif");
    let second = h.dest("second.sif");

    let outcome = h
        .dispatcher
        .pull(h.request("library://sylabs/tests/busybox:1.0", &first))
        .await
        .unwrap();
    assert_eq!(outcome.transport, Transport::Library);
    assert!(!outcome.cached);
    assert_eq!(outcome.content_hash.as_deref(), Some("sha256.0123abcd"));
    assert_eq!(h.library.downloads.load(Ordering::SeqCst), 1);

    let name = derive_name("sylabs/tests/busybox:1.0");
    assert!(h.dispatcher.cache().exists("sha256.0123abcd", &name).unwrap());

    let outcome = h
        .dispatcher
        .pull(h.request("library://sylabs/tests/busybox:1.0", &second))
        .await
        .unwrap();
    assert!(outcome.cached);
    assert_eq!(h.library.downloads.load(Ordering::SeqCst), 1);

    assert_eq!(fs::read(&first).unwrap(), IMAGE_BYTES);
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    // The cache entry survives the copy.
    assert!(h.dispatcher.cache().exists("sha256.0123abcd", &name).unwrap());
}

#[tokio::test]
async fn test_library_pull_refuses_existing_destination() {
    let h = harness(FakeLibrary::new());
    let dest = h.dest("busybox.sif");
    fs::write(&dest, b"precious").unwrap();

    let err = h
        .dispatcher
        .pull(h.request("library://busybox", &dest))
        .await
        .unwrap_err();

    assert!(matches!(err, PullError::DestinationExists(ref p) if p == &dest));
    assert_eq!(fs::read(&dest).unwrap(), b"precious");
    assert_eq!(h.library.metadata_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.library.downloads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_library_pull_force_overwrites() {
    let h = harness(FakeLibrary::new());
    let dest = h.dest("busybox.sif");
    fs::write(&dest, b"stale").unwrap();

    let mut request = h.request("library://busybox", &dest);
    request.force = true;
    h.dispatcher.pull(request).await.unwrap();

    assert_eq!(fs::read(&dest).unwrap(), IMAGE_BYTES);
}

#[tokio::test]
async fn test_failed_download_leaves_no_cache_entry_or_destination() {
    let h = harness(FakeLibrary {
        fail_download: true,
        ..FakeLibrary::new()
    });
    let dest = h.dest("busybox.sif");

    let err = h
        .dispatcher
        .pull(h.request("library://busybox", &dest))
        .await
        .unwrap_err();

    assert_eq!(err.reason_code(), "download_error");
    assert!(!dest.exists());
    assert!(!h
        .dispatcher
        .cache()
        .exists("sha256.0123abcd", &derive_name("busybox"))
        .unwrap());
}

#[tokio::test]
async fn test_empty_scheme_routes_to_library() {
    let h = harness(FakeLibrary::new());
    let dest = h.dest("alpine.sif");

    let outcome = h
        .dispatcher
        .pull(h.request("://alpine", &dest))
        .await
        .unwrap();

    assert_eq!(outcome.transport, Transport::Library);
    assert!(h.recorder.calls().is_empty());
}

#[tokio::test]
async fn test_other_transports_are_delegated_with_flags() {
    let h = harness(FakeLibrary::new());
    let dest = h.dest("out.sif");
    let shown = dest.display().to_string();

    let mut request = h.request("shub://vsoch/hello-world", &dest);
    request.force = true;
    request.no_https = true;
    h.dispatcher.pull(request).await.unwrap();

    h.dispatcher
        .pull(h.request("https://example.com/lolcow.sif", &dest))
        .await
        .unwrap();

    let mut request = h.request("docker://alpine:3.19", &dest);
    request.tmp_dir = Some(PathBuf::from("/scratch"));
    h.dispatcher.pull(request).await.unwrap();

    h.dispatcher
        .pull(h.request("alpine:3.19", &dest))
        .await
        .unwrap();

    assert_eq!(
        h.recorder.calls(),
        vec![
            format!("shub {shown} vsoch/hello-world force=true insecure=true"),
            format!("net {shown} https://example.com/lolcow.sif force=false"),
            format!("registry {shown} alpine:3.19 force=false nohttps=false tmp=Some(\"/scratch\")"),
            format!("registry {shown} alpine:3.19 force=false nohttps=false tmp=None"),
        ]
    );
    assert_eq!(h.library.metadata_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_positional_output_and_derived_name() {
    let h = harness(FakeLibrary::new());
    let positional = h.dest("positional.sif");

    let request = PullRequest {
        reference: "http://example.com/a/lolcow.sif".to_string(),
        output: Some(positional.to_string_lossy().into_owned()),
        ..Default::default()
    };
    let outcome = h.dispatcher.pull(request).await.unwrap();
    assert_eq!(outcome.destination, positional);

    let request = PullRequest {
        reference: "http://example.com/a/lolcow.sif".to_string(),
        ..Default::default()
    };
    let outcome = h.dispatcher.pull(request).await.unwrap();
    assert_eq!(outcome.destination, PathBuf::from("lolcow.sif"));
}

#[tokio::test]
async fn test_invalid_reference() {
    let h = harness(FakeLibrary::new());
    let err = h
        .dispatcher
        .pull(PullRequest {
            reference: "shub://".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();

    assert!(matches!(err, PullError::InvalidReference(_)));
    assert!(h.recorder.calls().is_empty());
}
