//! Pull command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use capsule_image::{
    ContentCache, DockerAuth, FetchDispatcher, PullRequest, RemoteConfig, Strategies,
    DEFAULT_LIBRARY_URL,
};
use clap::builder::BoolishValueParser;
use clap::Args;
use tracing::debug;

use crate::error::CliError;
use crate::output::{print_info, print_success};

use super::CommandContext;

/// Pull command - download an image to a local file.
///
/// `capsule pull [OUTPUT] <REF>`: the reference is always the last
/// argument; the output file is derived from it when omitted.
#[derive(Debug, Args)]
pub struct PullCommand {
    /// [OUTPUT] <REF>
    #[arg(value_name = "ARGS", num_args = 1..=2, required = true)]
    args: Vec<String>,

    /// The library to pull from.
    #[arg(long, env = "CAPSULE_LIBRARY", default_value = DEFAULT_LIBRARY_URL)]
    library: String,

    /// Overwrite an image file if it exists.
    #[arg(short = 'F', long, env = "CAPSULE_FORCE", value_parser = BoolishValueParser::new())]
    force: bool,

    /// Specify a custom image name.
    #[arg(long, env = "CAPSULE_NAME", hide = true)]
    name: Option<String>,

    /// Specify a temporary directory to use for build.
    #[arg(long, env = "CAPSULE_TMPDIR", hide = true)]
    tmpdir: Option<PathBuf>,

    /// Use http instead of https for docker:// and shub:// (local testing).
    #[arg(long, env = "CAPSULE_NOHTTPS", value_parser = BoolishValueParser::new())]
    nohttps: bool,

    /// Registry username.
    #[arg(long, env = "CAPSULE_DOCKER_USERNAME")]
    docker_username: Option<String>,

    /// Registry password.
    #[arg(long, env = "CAPSULE_DOCKER_PASSWORD", hide_env_values = true)]
    docker_password: Option<String>,

    /// Prompt for registry credentials.
    #[arg(long, env = "CAPSULE_DOCKER_LOGIN", value_parser = BoolishValueParser::new())]
    docker_login: bool,
}

impl PullCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        let cache_dir = ctx.config.require_cache_dir()?.to_path_buf();
        let remote = RemoteConfig {
            library_url: self.library.clone(),
            library_token: ctx.config.library_token()?,
            ..Default::default()
        };

        let request = self.request(&mut prompt_stdin)?;
        debug!(cache = %cache_dir.display(), reference = %request.reference, "Pull request built");

        let strategies = Strategies::remote(&remote)?;
        let dispatcher = FetchDispatcher::new(ContentCache::new(cache_dir), strategies);
        let outcome = dispatcher.pull(request).await?;

        if outcome.cached {
            print_info("Using cached image");
        }
        print_success(&format!("Image saved to {}", outcome.destination.display()));
        Ok(())
    }

    /// Build the request, prompting for credentials when asked to.
    fn request(self, prompt: &mut dyn FnMut(&str) -> Result<String>) -> Result<PullRequest> {
        let docker_auth = self.docker_auth(prompt)?;

        let mut args = self.args;
        let reference = args.pop().unwrap_or_default();
        let output = args.pop();

        Ok(PullRequest {
            reference,
            output,
            name: self.name,
            force: self.force,
            tmp_dir: self.tmpdir,
            no_https: self.nohttps,
            docker_auth,
        })
    }

    fn docker_auth(
        &self,
        prompt: &mut dyn FnMut(&str) -> Result<String>,
    ) -> Result<Option<DockerAuth>> {
        if self.docker_login {
            let username = match &self.docker_username {
                Some(username) => username.clone(),
                None => prompt("Enter Docker Username: ")?,
            };
            let password = prompt("Enter Docker Password: ")?;
            return Ok(Some(DockerAuth { username, password }));
        }

        match (&self.docker_username, &self.docker_password) {
            (Some(username), Some(password)) => Ok(Some(DockerAuth {
                username: username.clone(),
                password: password.clone(),
            })),
            (None, None) => Ok(None),
            _ => Err(CliError::IncompleteDockerAuth.into()),
        }
    }
}

/// Prompt on stderr and read one line from stdin.
fn prompt_stdin(message: &str) -> Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(message.as_bytes())?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
