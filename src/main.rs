//! gridplace CLI entry point
//!
//! Solar microgrid placement - CLI + web API

use gridplace::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
