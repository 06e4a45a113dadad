//! bnav - interactive navigator for S3-compatible buckets
//!
//! Browse folders, download, upload, create folders and delete objects
//! from a keyboard-driven terminal menu.

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bucket_nav::commands::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr so they never interleave with the menu repaint
    let default_level = if cli.debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let exit_code = commands::execute(cli).await;

    std::process::exit(exit_code.as_i32());
}
