//! OCI commands (create, run, start).
//!
//! All three load the bundle's runtime spec and hand it to the starter;
//! they differ only in how the container is named.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use capsule_engine::{build_config, Launcher, StarterConfig, StarterLauncher};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use super::CommandContext;

/// OCI command - manage containers from OCI bundles.
#[derive(Debug, Args)]
pub struct OciCommand {
    #[command(subcommand)]
    command: OciCommands,
}

#[derive(Debug, Subcommand)]
enum OciCommands {
    /// Create a container from a bundle.
    Create(ContainerArgs),

    /// Create and start a container from a bundle.
    Run(ContainerArgs),

    /// Start a created container.
    Start(StartArgs),
}

#[derive(Debug, Args)]
struct ContainerArgs {
    /// Container ID (defaults to the bundle directory name).
    #[arg(long, env = "CAPSULE_CONTAINER")]
    container: Option<String>,

    /// Bundle directory containing config.json.
    #[arg(short, long, env = "CAPSULE_BUNDLE", default_value = ".")]
    bundle: PathBuf,
}

#[derive(Debug, Args)]
struct StartArgs {
    /// Container ID.
    #[arg(value_name = "NAME")]
    container: String,

    /// Accepted for symmetry with create/run; NAME names the container.
    #[arg(id = "container_flag", long = "container", env = "CAPSULE_CONTAINER")]
    container_flag: Option<String>,

    /// Bundle directory containing config.json.
    #[arg(short, long, env = "CAPSULE_BUNDLE", default_value = ".")]
    bundle: PathBuf,
}

impl OciCommands {
    fn action(&self) -> &'static str {
        match self {
            OciCommands::Create(_) => "create",
            OciCommands::Run(_) => "run",
            OciCommands::Start(_) => "start",
        }
    }

    fn into_target(self) -> (Option<String>, PathBuf) {
        match self {
            OciCommands::Create(args) | OciCommands::Run(args) => (args.container, args.bundle),
            OciCommands::Start(args) => {
                if let Some(flag) = args.container_flag.filter(|flag| *flag != args.container) {
                    warn!(
                        ignored = %flag,
                        container_id = %args.container,
                        "--container ignored by start"
                    );
                }
                (Some(args.container), args.bundle)
            }
        }
    }
}

impl OciCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let launcher = StarterLauncher::new(starter_config(&ctx));
        self.run_with(Arc::new(launcher)).await
    }

    async fn run_with(self, launcher: Arc<dyn Launcher>) -> Result<()> {
        let action = self.command.action();
        let (container, bundle) = self.command.into_target();

        let config = build_config(&bundle, container.as_deref())?;
        info!(
            action = action,
            container_id = %config.container_id,
            bundle = %bundle.display(),
            "Handing bundle to starter"
        );

        tokio::task::spawn_blocking(move || launcher.launch(&config)).await??;
        Ok(())
    }
}

fn starter_config(ctx: &CommandContext) -> StarterConfig {
    StarterConfig {
        starter_path: ctx.config.starter_path.clone(),
        message_level: i32::from(ctx.verbose),
    }
}
