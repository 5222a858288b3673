//! metasearch HTTP service binary.

use std::path::PathBuf;

use clap::Parser;
use metasearch::{AppConfig, SearchServer, build_registry};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Query several search engines at once and return one ranked list.
#[derive(Parser)]
#[command(name = "metasearch", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "METASEARCH_CONFIG")]
    config: Option<PathBuf>,

    /// Interface to bind, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding the config file.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Users can override with RUST_LOG=debug to see everything.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("metasearch=info,metasearch_core=info,tower_http=warn")
        }))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let registry = build_registry(&config)?;
    info!(
        engines = ?registry.names(),
        default_timeout_ms = config.search.default_timeout_ms,
        debug = config.search.debug,
        "metasearch starting"
    );

    let static_dir = config
        .server
        .static_dir
        .as_ref()
        .filter(|dir| dir.is_dir())
        .cloned();
    if static_dir.is_none() && config.server.static_dir.is_some() {
        tracing::warn!("static directory not found, serving API routes only");
    }
    config.server.static_dir = static_dir;

    let mut server = SearchServer::start(registry, &config.server).await?;

    tokio::select! {
        _ = server.wait() => {
            tracing::error!("metasearch server stopped unexpectedly");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down");
            server.shutdown();
        }
    }

    Ok(())
}
