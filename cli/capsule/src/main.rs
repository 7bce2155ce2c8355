//! capsule - pull images and start OCI containers
//!
//! `capsule pull` fetches images through the library cache or a direct
//! transport; `capsule oci` hands a bundle to the privileged starter.

use anyhow::Result;
use clap::Parser;

mod commands;
mod config;
mod error;
mod logging;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose());

    if let Err(e) = cli.run().await {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
