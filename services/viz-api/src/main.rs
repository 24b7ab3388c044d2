//! Gridded dataset visualization service.
//!
//! Accepts uploaded NetCDF classic files and produces per-variable PNG
//! renders, per-variable CSV exports, and a combined outer-joined CSV.

mod config;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::VizApiConfig;
use server::ServerState;

#[derive(Parser, Debug)]
#[command(name = "viz-api")]
#[command(about = "Visualization API for gridded datasets")]
struct Args {
    /// Listen address
    #[arg(short, long, default_value = "0.0.0.0:8000")]
    listen: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting gridded dataset visualization service");

    let config = VizApiConfig::from_env();
    info!(media_root = %config.media_root.display(), "Loaded configuration");

    let state = Arc::new(ServerState::new(&config));

    let addr: SocketAddr = args.listen.parse()?;
    server::start_server(state, addr).await?;

    Ok(())
}
