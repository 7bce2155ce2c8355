//! The common configuration envelope handed to the starter.
//!
//! Wire format is JSON with Go-style field names:
//!
//! ```json
//! {"ContainerID": "web", "EngineName": "oci", "EngineConfig": {...}}
//! ```

use serde::{Deserialize, Serialize};

use crate::bundle::OciEngineConfig;
use crate::error::EngineError;

/// Engine name for OCI bundles.
pub const OCI_ENGINE_NAME: &str = "oci";

/// Everything the starter needs to instantiate one container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonConfig {
    #[serde(rename = "ContainerID")]
    pub container_id: String,
    #[serde(rename = "EngineName")]
    pub engine_name: String,
    #[serde(rename = "EngineConfig")]
    pub engine_config: OciEngineConfig,
}

impl CommonConfig {
    /// Marker argument telling the starter which engine to run.
    pub fn marker(&self) -> String {
        self.engine_name.to_ascii_uppercase()
    }

    /// Encode the envelope for the handoff pipe.
    pub fn to_payload(&self) -> Result<Vec<u8>, EngineError> {
        serde_json::to_vec(self).map_err(EngineError::HandoffSerialization)
    }

    /// Decode an envelope as the starter would.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oci_spec::runtime::Spec;
    use std::path::PathBuf;

    fn sample() -> CommonConfig {
        let spec: Spec = serde_json::from_str(
            r#"{
                "ociVersion": "1.0.2",
                "process": {
                    "user": {"uid": 0, "gid": 0},
                    "args": ["/bin/sh", "-c", "echo hi"],
                    "env": ["PATH=/usr/bin:/bin", "TERM=xterm"],
                    "cwd": "/"
                },
                "root": {"path": "rootfs", "readonly": true},
                "hostname": "web"
            }"#,
        )
        .unwrap();

        CommonConfig {
            container_id: "web".to_string(),
            engine_name: OCI_ENGINE_NAME.to_string(),
            engine_config: OciEngineConfig {
                bundle_path: PathBuf::from("/srv/bundles/web"),
                oci_config: spec,
            },
        }
    }

    #[test]
    fn test_payload_round_trip() {
        let config = sample();
        let decoded = CommonConfig::from_payload(&config.to_payload().unwrap()).unwrap();

        assert_eq!(decoded.container_id, config.container_id);
        assert_eq!(decoded.engine_name, config.engine_name);
        assert_eq!(decoded.engine_config.oci_config, config.engine_config.oci_config);
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_payload_field_names() {
        let value: serde_json::Value =
            serde_json::from_slice(&sample().to_payload().unwrap()).unwrap();

        assert_eq!(value["ContainerID"], "web");
        assert_eq!(value["EngineName"], "oci");
        assert_eq!(value["EngineConfig"]["bundlePath"], "/srv/bundles/web");
        assert_eq!(value["EngineConfig"]["ociConfig"]["hostname"], "web");
    }

    #[test]
    fn test_marker() {
        assert_eq!(sample().marker(), "OCI");
    }
}
