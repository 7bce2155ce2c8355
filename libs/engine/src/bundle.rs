//! OCI bundle loading.
//!
//! A bundle is a directory holding `config.json` (an OCI runtime spec) and
//! usually a root filesystem. Reading and parsing the runtime spec are
//! separate steps with separate errors; nothing is launched from a bundle
//! that did not load completely.

use std::fs;
use std::path::{Path, PathBuf};

use oci_spec::runtime::Spec;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineError;
use crate::handoff::{CommonConfig, OCI_ENGINE_NAME};

/// Runtime spec file inside a bundle.
pub const CONFIG_FILE: &str = "config.json";

/// Container ID used when none is given and the bundle path has no name.
pub const DEFAULT_CONTAINER_ID: &str = "capsule";

/// Engine payload for OCI bundles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OciEngineConfig {
    #[serde(rename = "bundlePath")]
    pub bundle_path: PathBuf,
    #[serde(rename = "ociConfig")]
    pub oci_config: Spec,
}

/// Read and parse `<bundle>/config.json`.
pub fn load_spec(bundle: &Path) -> Result<Spec, EngineError> {
    let path = bundle.join(CONFIG_FILE);

    let bytes = fs::read(&path).map_err(|source| EngineError::ConfigRead {
        path: path.clone(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|e| EngineError::ConfigParse {
        path,
        cause: e.to_string(),
    })
}

/// Build the starter configuration for a bundle.
///
/// `container_id` defaults to the bundle directory's name.
pub fn build_config(
    bundle: &Path,
    container_id: Option<&str>,
) -> Result<CommonConfig, EngineError> {
    let bundle_path = std::path::absolute(bundle).map_err(|source| EngineError::ConfigRead {
        path: bundle.join(CONFIG_FILE),
        source,
    })?;
    let spec = load_spec(&bundle_path)?;

    let container_id = container_id
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_container_id(&bundle_path));

    debug!(
        container_id = %container_id,
        bundle = %bundle_path.display(),
        oci_version = %spec.version(),
        "Loaded bundle config"
    );

    Ok(CommonConfig {
        container_id,
        engine_name: OCI_ENGINE_NAME.to_string(),
        engine_config: OciEngineConfig {
            bundle_path,
            oci_config: spec,
        },
    })
}

fn default_container_id(bundle: &Path) -> String {
    bundle
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_CONTAINER_ID.to_string())
}
