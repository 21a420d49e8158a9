//! Vessel notification formatter
//!
//! Command-line client for the vessel-monitoring platform's notification
//! formatting.
//!
//! # Usage
//!
//! ```bash
//! # Convert a coordinate pair
//! vessel-notify dms 6.17 105.9067 --compact
//!
//! # Render a notification from JSON files
//! vessel-notify render --notification n.json --types types.json
//!
//! # Print the inbox from the API
//! export VESSEL_API_URL="https://vms.example.vn/api"
//! vessel-notify inbox --all --relative
//! ```

use clap::Parser;
use vessel_notify::cli::Cli;
use vessel_notify::commands;

#[tokio::main]
async fn main() {
    pretty_env_logger::init();
    log::info!("Application started version={}", env!("CARGO_PKG_VERSION"));
    let cli = Cli::parse();

    if let Err(e) = commands::run(cli).await {
        log::error!("Application error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
