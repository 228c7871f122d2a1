//! Serve command handler
//!
//! Starts the HTTP server in foreground mode.

use crate::config::Config;
use crate::error::Result;
use crate::server;
use clap::Args;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Serve command arguments
#[derive(Args)]
pub struct ServeArgs {
    /// Host address to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Override the simulated optimization latency (milliseconds)
    #[arg(long)]
    pub latency_ms: Option<u64>,
}

/// Run the serve command
pub async fn run(args: ServeArgs) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::load()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(latency) = args.latency_ms {
        config.optimizer.latency_ms = latency;
    }

    info!(
        "Starting gridplace server v{} on {} (latency {}ms, stale results: {})",
        env!("CARGO_PKG_VERSION"),
        config.server_addr(),
        config.optimizer.latency_ms,
        config.optimizer.stale_results
    );

    server::run(config).await
}
