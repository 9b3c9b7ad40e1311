//! LexiPro CLI
//!
//! Scores case evidence for forensic risk and prints the resulting
//! narrative, liability phrase and statutes.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;

use commands::Cli;

/// Initialize tracing on stderr so stdout stays clean for reports.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug level.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "lexipro=debug,lexipro_core=debug,lexipro_runtime=debug"
    } else {
        "lexipro=info,lexipro_core=info,lexipro_runtime=info"
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    cli.execute().await
}
