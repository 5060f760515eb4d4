//! DayLog Server Binary
//!
//! Starts the TCP server and the retention sweeper.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use daylog::network::Server;
use daylog::{Config, Engine};
use tracing_subscriber::{fmt, EnvFilter};

/// DayLog Server
#[derive(Parser, Debug)]
#[command(name = "daylog-server")]
#[command(about = "Day-partitioned log storage server")]
#[command(version)]
struct Args {
    /// Data directory
    #[arg(short, long, default_value = "./data")]
    data_dir: String,

    /// Port to listen on (all interfaces); ignored when --listen is given
    #[arg(short, long, default_value = "9999")]
    port: u16,

    /// Full listen address (host:port)
    #[arg(short, long)]
    listen: Option<String>,

    /// Days of logs to keep
    #[arg(short, long, default_value = "7")]
    retain: u32,

    /// Hours between retention sweeps
    #[arg(long, default_value = "24")]
    sweep_hours: u64,

    /// Maximum concurrent connections
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Give up on a store lock after this many milliseconds (0 = wait forever)
    #[arg(long, default_value = "0")]
    lock_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,daylog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    let listen = args
        .listen
        .clone()
        .unwrap_or_else(|| format!("0.0.0.0:{}", args.port));

    tracing::info!("DayLog Server v{}", daylog::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", listen);

    // Build config from args
    let mut builder = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&listen)
        .retain_days(args.retain)
        .sweep_interval(Duration::from_secs(args.sweep_hours.max(1) * 60 * 60))
        .max_connections(args.max_connections);
    if args.lock_timeout_ms > 0 {
        builder = builder.lock_timeout(Duration::from_millis(args.lock_timeout_ms));
    }
    let config = builder.build();

    // Open engine; a data directory we cannot create is fatal
    let engine = match Engine::open(config.clone()) {
        Ok(e) => Arc::new(e),
        Err(e) => {
            tracing::error!("Failed to open engine: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = Server::new(config, engine);
    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
