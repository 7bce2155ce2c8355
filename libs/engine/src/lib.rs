//! # capsule-engine
//!
//! Turns an OCI bundle into a starter configuration and hands it to the
//! privileged starter process.
//!
//! ```text
//! bundle dir -> build_config() -> CommonConfig -> Launcher::launch() -> starter
//!                                                   (pipe on fd 3)
//! ```

mod bundle;
mod error;
mod handoff;
mod starter;

pub use bundle::{build_config, load_spec, OciEngineConfig, CONFIG_FILE, DEFAULT_CONTAINER_ID};
pub use error::EngineError;
pub use handoff::{CommonConfig, OCI_ENGINE_NAME};
pub use starter::{
    Launcher, StarterConfig, StarterLauncher, DEFAULT_STARTER_PATH, HANDOFF_FD,
    MESSAGE_LEVEL_ENV, PIPE_FD_ENV, RUNTIME_ENV,
};

pub use oci_spec::runtime::Spec;
