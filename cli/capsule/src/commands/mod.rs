//! CLI commands.

mod oci;
mod pull;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::config::Config;

/// capsule - pull container images and run OCI bundles.
#[derive(Debug, Parser)]
#[command(name = "capsule")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Pull an image from a library, hub, URL, or registry.
    Pull(pull::PullCommand),

    /// Manage containers from OCI bundles.
    Oci(oci::OciCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    pub fn verbose(&self) -> u8 {
        self.verbose
    }

    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let ctx = CommandContext {
            config: Config::from_env(),
            verbose: self.verbose,
        };

        match self.command {
            Commands::Pull(cmd) => cmd.run(ctx).await,
            Commands::Oci(cmd) => cmd.run(ctx).await,
            Commands::Version => {
                println!("capsule {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub config: Config,
    pub verbose: u8,
}
