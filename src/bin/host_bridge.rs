//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! Reads `CommandEnvelope` messages as newline-delimited JSON from stdin,
//! dispatches them through the reminders service, and writes one
//! `ResponseEnvelope` per request to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel.

use std::path::PathBuf;

use clap::Parser;
use remkit::host::stdio::run_stdio_bridge;
use remkit::{RemindersService, RemkitConfig};
use tracing_subscriber::EnvFilter;

/// Serve reminder queries and mutations over stdin/stdout.
#[derive(Parser)]
#[command(name = "remkit-host", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(RemkitConfig::default_config_path);
    let config = match cli.config {
        Some(ref path) => RemkitConfig::from_file(path)?,
        None => RemkitConfig::load_or_default(&config_path)?,
    };

    // Tracing goes to stderr only; stdout is the protocol channel.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    tracing::info!(config = %config_path.display(), "remkit-host starting");

    let service = RemindersService::from_config(&config)?;

    run_stdio_bridge(&service).await.map_err(|e| {
        tracing::error!(error = %e, "remkit-host exited with error");
        anyhow::anyhow!("remkit-host failed: {e}")
    })?;

    tracing::info!("remkit-host shut down cleanly");
    Ok(())
}
