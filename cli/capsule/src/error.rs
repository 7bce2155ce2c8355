//! Error handling and display for the CLI.

use capsule_engine::EngineError;
use capsule_image::PullError;
use colored::Colorize;
use thiserror::Error;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Could not determine a cache directory")]
    NoCacheDir,

    #[error("Docker credentials need both a username and a password")]
    IncompleteDockerAuth,
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(hint) = hint(err) {
        eprintln!("\n{}", format!("Hint: {hint}").yellow());
    }
}

fn hint(err: &anyhow::Error) -> Option<&'static str> {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return Some(match cli_err {
            CliError::NoCacheDir => "Set CAPSULE_CACHEDIR to a writable directory.",
            CliError::IncompleteDockerAuth => {
                "Pass --docker-password with --docker-username, or use --docker-login."
            }
        });
    }

    if let Some(pull_err) = err.downcast_ref::<PullError>() {
        return match pull_err {
            PullError::DestinationExists(_) => Some("Use --force to overwrite it."),
            PullError::InvalidReference(_) => {
                Some("References look like library://user/collection/image:tag or docker://alpine.")
            }
            _ => None,
        };
    }

    if let Some(engine_err) = err.downcast_ref::<EngineError>() {
        return match engine_err {
            EngineError::ConfigRead { .. } => {
                Some("Use --bundle to point at a directory containing config.json.")
            }
            EngineError::StarterLaunch { .. } => {
                Some("Set CAPSULE_STARTER to the installed starter binary.")
            }
            _ => None,
        };
    }

    None
}
