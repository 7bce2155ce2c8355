//! Environment-derived configuration.
//!
//! Handles:
//! - Cache root for library images
//! - Library auth token
//! - Starter location

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use capsule_engine::DEFAULT_STARTER_PATH;
use directories::ProjectDirs;

use crate::error::CliError;

pub const CACHE_DIR_ENV: &str = "CAPSULE_CACHEDIR";
pub const LIBRARY_TOKEN_ENV: &str = "CAPSULE_LIBRARY_TOKEN";
pub const STARTER_ENV: &str = "CAPSULE_STARTER";

/// Token file in the config directory.
pub(crate) const TOKEN_FILE: &str = "library-token";

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("io", "capsule", "capsule")
}

/// Resolved configuration for one invocation.
///
/// Nothing is read from disk here; the token file is only opened by
/// [`Config::library_token`], so commands that never talk to the library
/// are unaffected by it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Cache root; `None` when no platform cache dir exists and none was set.
    pub cache_dir: Option<PathBuf>,
    pub starter_path: PathBuf,
    token_env: Option<String>,
    token_file: Option<PathBuf>,
}

impl Config {
    /// Load from the process environment and platform directories.
    pub fn from_env() -> Self {
        let dirs = project_dirs();
        Self::from_lookup(
            |key| std::env::var(key).ok(),
            dirs.as_ref().map(|d| d.cache_dir()),
            dirs.as_ref().map(|d| d.config_dir()),
        )
    }

    pub(crate) fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        platform_cache: Option<&Path>,
        platform_config: Option<&Path>,
    ) -> Self {
        let set = |key: &str| lookup(key).filter(|value| !value.is_empty());

        let cache_dir = set(CACHE_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| platform_cache.map(Path::to_path_buf));

        let starter_path = set(STARTER_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STARTER_PATH));

        Self {
            cache_dir,
            starter_path,
            token_env: set(LIBRARY_TOKEN_ENV),
            token_file: platform_config.map(|dir| dir.join(TOKEN_FILE)),
        }
    }

    /// Library token from the environment, else from the token file.
    pub fn library_token(&self) -> Result<Option<String>> {
        if let Some(token) = &self.token_env {
            return Ok(Some(token.clone()));
        }
        match &self.token_file {
            Some(path) => read_token(path),
            None => Ok(None),
        }
    }

    pub fn require_cache_dir(&self) -> Result<&Path, CliError> {
        self.cache_dir.as_deref().ok_or(CliError::NoCacheDir)
    }
}

fn read_token(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read library token from {:?}", path))?;
    let token = contents.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
