use anyhow::{Context, Result};
use clap::Parser;
use seawatch_core::AppConfig;
use seawatch_feed::HttpFeed;
use seawatch_map::{MapSession, TraceSurface};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

/// Seawatch - live maritime situational map engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/seawatch.yaml")]
    config: PathBuf,

    /// Override the feed base URL
    #[arg(long, env = "SEAWATCH_BASE_URL")]
    base_url: Option<String>,

    /// Override the log level
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Missing config file falls back to defaults; a present but broken one is fatal
    let mut config = if args.config.exists() {
        AppConfig::from_config_builder(&args.config)
            .with_context(|| format!("Failed to load config file: {:?}", args.config))?
    } else {
        AppConfig::default()
    };

    if let Some(base_url) = args.base_url {
        config.feeds.base_url = base_url;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }
    config.validate().context("Invalid configuration")?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.parse_level()?)
        .init();

    info!(
        base_url = %config.feeds.base_url,
        center_lat = config.map.center_lat,
        center_lon = config.map.center_lon,
        zoom = config.map.zoom,
        "starting seawatch"
    );

    let surface = Arc::new(TraceSurface::new(config.map.zoom));
    let feed = Arc::new(
        HttpFeed::new(config.feeds.base_url.as_str(), config.feeds.request_timeout())
            .context("Failed to build feed client")?,
    );

    let session = MapSession::new(
        surface,
        feed.clone(),
        feed.clone(),
        feed,
        &config,
    );
    session.start();

    signal::ctrl_c().await.context("Failed to listen for shutdown signal")?;
    info!("received shutdown signal, stopping session...");
    session.shutdown().await;

    Ok(())
}
