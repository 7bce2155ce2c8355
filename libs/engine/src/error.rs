//! Error types for bundle loading and the starter handoff.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Engine errors with standardized reason codes.
///
/// Any of these aborts before (or instead of) a successful container
/// start; none are retried.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The bundle's `config.json` could not be opened or read.
    #[error("failed to read {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bundle's `config.json` is not a valid runtime spec.
    #[error("failed to parse {}: {cause}", .path.display())]
    ConfigParse { path: PathBuf, cause: String },

    /// The handoff envelope could not be encoded.
    #[error("failed to encode engine configuration: {0}")]
    HandoffSerialization(#[source] serde_json::Error),

    /// The starter could not be started or handed its configuration.
    #[error("failed to execute {}: {source}", .path.display())]
    StarterLaunch {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The starter ran and exited unsuccessfully.
    #[error("starter exited with status {code}")]
    StarterRuntime { code: i32 },
}

impl EngineError {
    /// Get the standardized reason code for this error.
    pub fn reason_code(&self) -> &'static str {
        match self {
            EngineError::ConfigRead { .. } => "config_read_failed",
            EngineError::ConfigParse { .. } => "config_parse_failed",
            EngineError::HandoffSerialization(_) => "handoff_serialization_failed",
            EngineError::StarterLaunch { .. } => "starter_launch_failed",
            EngineError::StarterRuntime { .. } => "starter_exited",
        }
    }
}
