//! Main entry point for vget CLI

use clap::Parser;
use std::process::ExitCode;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vget::cli::{Args, ProgressRenderer};
use vget::core::{Orchestrator, PreferenceStore};
use vget::engine::YtDlpEngine;
use vget::utils::default_download_dir;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    if let Err(e) = init_logging(args.log_level()) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting vget with args: {:?}", args);

    let orchestrator = Orchestrator::new(
        YtDlpEngine::new(&args.ytdlp),
        PreferenceStore::default(),
        default_download_dir(),
        ProgressRenderer::stdout(),
    );

    let status = orchestrator
        .run(&args, std::io::stdin().lock(), &mut std::io::stderr())
        .await;
    info!("Finished with exit code {}", status.code());
    status.into()
}

/// Initialize logging system
fn init_logging(default_level: &str) -> anyhow::Result<()> {
    // RUST_LOG wins over the verbosity flag
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr so the progress line on stdout stays intact
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .try_init()?;

    Ok(())
}
