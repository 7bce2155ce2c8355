//! Log setup. Everything goes to stderr; stdout belongs to command output
//! and the starter.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directives, e.g. `CAPSULE_LOG=capsule_image=debug`.
pub const LOG_ENV: &str = "CAPSULE_LOG";

/// `json` switches to one JSON object per line.
pub const LOG_FORMAT_ENV: &str = "CAPSULE_LOG_FORMAT";

/// Default level for a `-v` count.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|format| format == "json");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
