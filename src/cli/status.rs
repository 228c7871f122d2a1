//! Status command handler
//!
//! Shows the effective configuration and, optionally, whether a server is up.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Check if server is running (tries to connect)
    #[arg(long)]
    pub server: bool,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;

    println!("gridplace v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("Optimizer:");
    println!("  Latency:        {}ms", config.optimizer.latency_ms);
    println!("  Stale results:  {}", config.stale_result_policy()?);
    println!("  Range checks:   {}", if config.optimizer.validate_range { "on" } else { "off" });
    println!();

    println!("Map:");
    println!("  Center: ({}, {}) zoom {}", config.map.center_lat, config.map.center_lng, config.map.zoom);
    println!("  Tiles:  {}", config.map.tile_url);
    println!();

    if args.server {
        check_server_status(&config).await;
    }

    Ok(())
}

/// Check if the server is running
async fn check_server_status(config: &Config) {
    let url = format!("http://{}/api/status", config.server_addr());

    match reqwest::get(&url).await {
        Ok(response) if response.status().is_success() => {
            println!("Server: RUNNING on {}", config.server_addr());
            if let Ok(status) = response.json::<serde_json::Value>().await {
                if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                    println!("  Version:  {}", version);
                }
                if let Some(sessions) = status.get("sessions").and_then(|v| v.as_u64()) {
                    println!("  Sessions: {}", sessions);
                }
            }
        }
        Ok(response) => {
            println!("Server: ERROR (status {})", response.status());
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", config.server_addr());
        }
    }
}
