//! Handoff to the privileged starter.
//!
//! The starter is spawned with a cleared environment, a marker argument
//! naming the engine, and the encoded [`CommonConfig`] on a pipe installed
//! as fd 3. Its stdio is the caller's. The launcher writes the envelope
//! once, closes the pipe, and waits for the starter to exit.

use std::fs::File;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, RawFd};
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

use nix::fcntl::OFlag;
use nix::unistd::pipe2;
use tracing::{debug, info};

use crate::error::EngineError;
use crate::handoff::CommonConfig;

/// Where the starter is installed by default.
pub const DEFAULT_STARTER_PATH: &str = "/usr/local/libexec/capsule/bin/starter";

/// Selects the runtime inside the starter.
pub const RUNTIME_ENV: &str = "SRUNTIME";
/// Starter verbosity.
pub const MESSAGE_LEVEL_ENV: &str = "CAPSULE_MESSAGELEVEL";
/// Tells the starter which descriptor carries the envelope.
pub const PIPE_FD_ENV: &str = "PIPE_EXEC_FD";
/// Descriptor number of the handoff pipe in the starter.
pub const HANDOFF_FD: RawFd = 3;

/// Starts containers from a built configuration.
pub trait Launcher: Send + Sync {
    fn launch(&self, config: &CommonConfig) -> Result<(), EngineError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarterConfig {
    pub starter_path: PathBuf,
    pub message_level: i32,
}

impl Default for StarterConfig {
    fn default() -> Self {
        Self {
            starter_path: PathBuf::from(DEFAULT_STARTER_PATH),
            message_level: 0,
        }
    }
}

/// [`Launcher`] that execs the starter binary.
#[derive(Debug, Clone, Default)]
pub struct StarterLauncher {
    config: StarterConfig,
}

impl StarterLauncher {
    pub fn new(config: StarterConfig) -> Self {
        Self { config }
    }

    pub fn starter_path(&self) -> &Path {
        &self.config.starter_path
    }

    fn launch_error(&self, source: io::Error) -> EngineError {
        EngineError::StarterLaunch {
            path: self.config.starter_path.clone(),
            source,
        }
    }
}

impl Launcher for StarterLauncher {
    fn launch(&self, config: &CommonConfig) -> Result<(), EngineError> {
        let payload = config.to_payload()?;

        let (read_end, write_end) =
            pipe2(OFlag::O_CLOEXEC).map_err(|e| self.launch_error(e.into()))?;
        let read_fd = read_end.as_raw_fd();

        let mut command = Command::new(&self.config.starter_path);
        command
            .arg(config.marker())
            .env_clear()
            .env(RUNTIME_ENV, &config.engine_name)
            .env(MESSAGE_LEVEL_ENV, self.config.message_level.to_string())
            .env(PIPE_FD_ENV, HANDOFF_FD.to_string())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // SAFETY: the hook only calls async-signal-safe fcntl/dup2.
        unsafe {
            command.pre_exec(move || install_handoff_fd(read_fd));
        }

        info!(
            starter = %self.config.starter_path.display(),
            container_id = %config.container_id,
            engine = %config.engine_name,
            "Launching starter"
        );

        let mut child = command.spawn().map_err(|e| self.launch_error(e))?;
        drop(read_end);

        let mut writer = File::from(write_end);
        let written = writer.write_all(&payload);
        drop(writer);
        debug!(bytes = payload.len(), "Handoff payload sent");

        let status = child.wait().map_err(|e| self.launch_error(e))?;
        match exit_code(status) {
            0 => written.map_err(|e| self.launch_error(e)),
            code => Err(EngineError::StarterRuntime { code }),
        }
    }
}

/// Put the pipe's read end on the handoff descriptor, without close-on-exec.
fn install_handoff_fd(fd: RawFd) -> io::Result<()> {
    let rc = if fd == HANDOFF_FD {
        unsafe { libc::fcntl(fd, libc::F_SETFD, 0) }
    } else {
        unsafe { libc::dup2(fd, HANDOFF_FD) }
    };
    if rc == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Shell-style exit code: the status code, or 128 + signal.
fn exit_code(status: ExitStatus) -> i32 {
    status
        .code()
        .or_else(|| status.signal().map(|sig| 128 + sig))
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code() {
        assert_eq!(exit_code(ExitStatus::from_raw(0)), 0);
        assert_eq!(exit_code(ExitStatus::from_raw(3 << 8)), 3);
        assert_eq!(exit_code(ExitStatus::from_raw(libc::SIGKILL)), 137);
    }

    #[test]
    fn test_default_config() {
        let launcher = StarterLauncher::default();
        assert_eq!(launcher.starter_path(), Path::new(DEFAULT_STARTER_PATH));
    }
}
