//! GSurvWeb - Graft Survival Prediction
//!
//! CLI entry point for the GSurvWeb server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod cli;
mod server;

const DEFAULT_FILTER: &str = "gsurvweb=info,gsurv_core=info,gsurv_data=info,tower_http=info";
const VERBOSE_FILTER: &str = "gsurvweb=debug,gsurv_core=debug,gsurv_data=debug,tower_http=info";

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = cli::Cli::parse();
    let default_filter = if cli.verbose {
        VERBOSE_FILTER
    } else {
        DEFAULT_FILTER
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GSurvWeb v{}", env!("CARGO_PKG_VERSION"));

    cli::run(cli).await
}
