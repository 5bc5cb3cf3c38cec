//! emby302 - 302 redirect front proxy for Emby
//!
//! Sits in front of an Emby server and:
//! - Answers playback requests (`/Videos/...?MediaSourceId=...`) with a 302 to the mapped
//!   storage URL when a path-map rule matches
//! - Rejects filtered clients and blocked downloads with 403
//! - Reverse-proxies everything else to Emby untouched
//!
//! Configured from a single YAML file (default `/app/config.yml`).

use anyhow::Result;
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod config_commands;
mod server_utils;

use cli::{Cli, Commands, ConfigCommands};
use emby302_core::proxy::{build_proxy_router, AppState};
use server_utils::{create_listener, shutdown_signal};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config(ConfigCommands::Show { json })) => {
            config_commands::show_config(&cli.config, cli.port, json)
        },
        Some(Commands::Config(ConfigCommands::Check)) => config_commands::check_config(&cli.config),
        Some(Commands::Serve) | None => {
            init_tracing(&cli.log_level)?;
            run_server(&cli.config, cli.port).await
        },
    }
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level)
        .map_err(|e| anyhow::anyhow!("Invalid log level '{}': {}", log_level, e))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))?;
    Ok(())
}

async fn run_server(config_path: &Path, port_override: Option<u16>) -> Result<()> {
    info!("📄 Loading config from {}", config_path.display());
    let mut settings = emby302_core::load_config(config_path)
        .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;
    if let Some(port) = port_override {
        settings.port = port;
    }

    info!("🎬 Emby upstream: {}", settings.emby.host);
    info!("🗺️ {} path-map rules loaded", settings.rules.len());
    info!("⬇️ Download strategy: {}", settings.emby.download_policy);
    if settings.client_filter.is_enabled() {
        info!("🛡️ Client filter enabled ({})", settings.client_filter.mode());
    }

    let listener = create_listener(&settings.listen_host, settings.port).await?;
    let addr = listener.local_addr()?;

    let state = AppState::new(settings)?;
    let app = build_proxy_router(state);

    info!("🚀 emby302 v{} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server stopped");
    Ok(())
}
