use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use restock_watcher::logging::init_logging;
use restock_watcher::{AppConfig, ChangeDetector, Monitor, NotifierManager};

#[derive(Debug, Parser)]
#[command(name = "restock-watcher", version, about = "Watches a product listing page and alerts on restocks")]
struct Cli {
    /// JSON configuration file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Where the last notified products are recorded
    #[arg(long)]
    state_file: Option<PathBuf>,

    /// Log file, overriding `logging.file` from the configuration
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Run a single check and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;
    if let Some(state_file) = cli.state_file {
        config.state_file = state_file;
    }
    if let Some(log_file) = cli.log_file {
        config.logging.file = log_file;
    }
    if cli.once {
        config.single_run = true;
    }

    let logging = init_logging(&config.logging)?;
    info!("Starting Restock Watcher...");

    let dispatcher = NotifierManager::from_config(&config)?;
    let detector = ChangeDetector::new(config.state_file.clone());
    let monitor = Monitor::new(config, dispatcher, detector)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    let summary = monitor.run(shutdown).await;

    info!(
        "Shutting down after {} cycle(s), {} failed, {} notification(s)",
        summary.cycles, summary.failed_cycles, summary.notifications
    );
    logging.shutdown();

    Ok(())
}
