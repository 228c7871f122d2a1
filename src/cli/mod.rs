//! CLI command handlers
//!
//! Each subcommand has its own module with handler functions.

pub mod config;
pub mod optimize;
pub mod serve;
pub mod status;

use clap::{Parser, Subcommand};

/// Solar microgrid placement from selected map points
#[derive(Parser)]
#[command(name = "gridplace")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Place grids for a set of points
    Optimize(optimize::OptimizeArgs),

    /// Start web server (foreground)
    Serve(serve::ServeArgs),

    /// Manage configuration
    Config(config::ConfigArgs),

    /// Show configuration summary and server status
    Status(status::StatusArgs),
}

/// Run the CLI
pub async fn run() -> crate::error::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize(args) => optimize::run(args).await,
        Commands::Serve(args) => serve::run(args).await,
        Commands::Config(args) => config::run(args),
        Commands::Status(args) => status::run(args).await,
    }
}
