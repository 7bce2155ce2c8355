//! # capsule-image
//!
//! Image acquisition for capsule: turn a user-supplied reference into a
//! local image file.
//!
//! ## Pipeline
//!
//! ```text
//! raw reference -> resolve() -> ImageReference
//!                                   |
//!                          FetchDispatcher::pull()
//!        +-----------+--------------+--------------+-------------+
//!     Library       Shub        Http / Https     Registry
//!  (ContentCache)  ShubFetch      NetFetch      RegistryFetch
//! ```
//!
//! Library pulls are content-addressed: the remote reports a hash, the
//! image is downloaded into the cache at most once per `(hash, name)`, and
//! the destination gets a full copy of the cache entry.
//!
//! ## Modules
//!
//! - `reference`: transport resolution and destination naming
//! - `cache`: content-addressed store
//! - `dispatch`: routing a pull to its strategy
//! - `library`, `shub`, `net`, `registry`: the strategies

mod cache;
mod dispatch;
mod error;
mod library;
mod net;
mod reference;
mod registry;
mod shub;
mod staging;

pub use cache::{CacheEntry, CacheKey, ContentCache};
pub use dispatch::{FetchDispatcher, PullOutcome, PullRequest, RemoteConfig, Strategies};
pub use error::PullError;
pub use library::{normalize_ref, LibraryClient, LibraryImage, LibraryRemote, DEFAULT_LIBRARY_URL};
pub use net::{NetClient, NetFetch};
pub use reference::{derive_name, resolve, split, ImageReference, Transport, SCHEME_SEPARATOR};
pub use registry::{
    parse_image_ref, DockerAuth, RegistryClient, RegistryConfig, RegistryFetch, RegistryOptions,
    RegistryRef, DOCKER_HUB_REGISTRY,
};
pub use shub::{ShubClient, ShubFetch, ShubManifest, DEFAULT_SHUB_URL};
