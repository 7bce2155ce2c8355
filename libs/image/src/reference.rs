//! Image reference resolution.
//!
//! A raw reference is `scheme://locator` or a bare locator. The scheme picks
//! the [`Transport`]; the locator is handed to that transport's fetch
//! strategy untouched. Bare locators go to the default registry.

use std::fmt;

use crate::error::PullError;

/// Separator between the transport scheme and the locator.
pub const SCHEME_SEPARATOR: &str = "://";

/// Tag assumed when a locator carries none.
const DEFAULT_TAG: &str = "latest";

/// Extension given to derived image file names.
const IMAGE_EXTENSION: &str = ".sif";

/// Digest characters kept in a derived name.
const DIGEST_NAME_LEN: usize = 12;

/// Transport family used to locate and fetch an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    /// Cache-backed library pull (`library://` or an empty scheme).
    Library,
    /// Legacy hub (`shub://`).
    Shub,
    /// Direct download over `http://`.
    Http,
    /// Direct download over `https://`.
    Https,
    /// OCI registry pull; any other scheme, or none at all.
    Registry,
}

impl Transport {
    fn from_scheme(scheme: &str) -> Self {
        match scheme {
            "" | "library" => Transport::Library,
            "shub" => Transport::Shub,
            "http" => Transport::Http,
            "https" => Transport::Https,
            _ => Transport::Registry,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Library => "library",
            Transport::Shub => "shub",
            Transport::Http => "http",
            Transport::Https => "https",
            Transport::Registry => "registry",
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Transport the reference routes to.
    pub transport: Transport,
    /// Scheme as written, if the reference had one.
    pub scheme: Option<String>,
    /// Transport-specific address; never empty.
    pub locator: String,
    /// File name the pulled image is written to.
    pub destination_name: String,
}

impl ImageReference {
    /// Rebuild the reference as the user wrote it.
    pub fn uri(&self) -> String {
        match &self.scheme {
            Some(scheme) => format!("{scheme}{SCHEME_SEPARATOR}{}", self.locator),
            None => self.locator.clone(),
        }
    }
}

/// Split a raw reference into its scheme (if any) and locator.
pub fn split(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(SCHEME_SEPARATOR) {
        Some((scheme, locator)) => (Some(scheme), locator),
        None => (None, raw),
    }
}

/// Resolve a raw reference and pick its destination name.
///
/// Name priority: `explicit_name`, then `positional_name`, then a name
/// derived from the locator. Empty strings count as absent.
pub fn resolve(
    raw: &str,
    explicit_name: Option<&str>,
    positional_name: Option<&str>,
) -> Result<ImageReference, PullError> {
    let (scheme, locator) = split(raw);
    if locator.is_empty() {
        return Err(PullError::InvalidReference(raw.to_string()));
    }

    let transport = scheme.map_or(Transport::Registry, Transport::from_scheme);

    let destination_name = explicit_name
        .filter(|name| !name.is_empty())
        .or(positional_name.filter(|name| !name.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| derive_name(locator));

    Ok(ImageReference {
        transport,
        scheme: scheme.map(str::to_string),
        locator: locator.to_string(),
        destination_name,
    })
}

/// Derive an image file name from a locator.
///
/// The result is a pure function of the locator and is also the logical
/// name under which library images are cached.
///
/// - `alpine` -> `alpine_latest.sif`
/// - `sylabs/tests/busybox:1.0` -> `busybox_1.0.sif`
/// - `org/app@sha256:0123456789abcdef` -> `app_0123456789ab.sif`
/// - `example.com/images/lolcow.sif` -> `lolcow.sif`
pub fn derive_name(locator: &str) -> String {
    let segment = locator
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let segment = segment.split(['?', '#']).next().unwrap_or_default();

    if segment.len() > IMAGE_EXTENSION.len() && segment.ends_with(IMAGE_EXTENSION) {
        return sanitize(segment);
    }

    let (base, tag) = if let Some((base, digest)) = segment.split_once('@') {
        let hex = digest.rsplit(':').next().unwrap_or(digest);
        (base, hex.chars().take(DIGEST_NAME_LEN).collect::<String>())
    } else if let Some((base, tag)) = segment.rsplit_once(':') {
        (base, tag.to_string())
    } else {
        (segment, DEFAULT_TAG.to_string())
    };

    let base = if base.is_empty() { "image" } else { base };
    let tag = if tag.is_empty() { DEFAULT_TAG } else { &tag };

    format!("{}_{}{IMAGE_EXTENSION}", sanitize(base), sanitize(tag))
}

fn sanitize(part: &str) -> String {
    part.chars()
        .enumerate()
        .map(|(i, c)| match c {
            '.' if i == 0 => '_',
            c if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') => c,
            _ => '_',
        })
        .collect()
}
