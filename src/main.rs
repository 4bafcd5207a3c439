//! Vaakku - Speech & Translation CLI
//!
//! Command-line front-end for the Vaakku text-to-speech, speech-to-text and
//! translation service.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vaakku=info,vaakku_core=warn,vaakku_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    debug!("Vaakku CLI v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli).await
}
