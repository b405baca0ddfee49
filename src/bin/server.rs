//! tablewire Server Binary
//!
//! Opens the table directory and serves requests over TCP.

use std::sync::Arc;

use clap::Parser;
use tablewire::network::Server;
use tablewire::{Config, Dispatcher, HandlerRegistry, ServerContext};
use tracing_subscriber::{fmt, EnvFilter};

/// tablewire Server
#[derive(Parser, Debug)]
#[command(name = "tablewire-server")]
#[command(about = "Binary protocol server for named tables")]
#[command(version)]
struct Args {
    /// Data directory (one subdirectory per table)
    #[arg(short, long, default_value = "./tablewire_data")]
    data_dir: String,

    /// Listen address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:8585")]
    listen: String,

    /// Worker threads processing requests
    #[arg(short, long, default_value = "4")]
    workers: usize,

    /// Maximum accepted connections waiting for a worker
    #[arg(short, long, default_value = "1024")]
    max_connections: usize,

    /// Read timeout per connection in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    read_timeout_ms: u64,

    /// Write timeout per connection in milliseconds (0 disables)
    #[arg(long, default_value = "5000")]
    write_timeout_ms: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tablewire=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("tablewire server v{}", tablewire::VERSION);
    tracing::info!("Data directory: {}", args.data_dir);
    tracing::info!("Listen address: {}", args.listen);

    // Build config from args
    let config = Config::builder()
        .data_dir(&args.data_dir)
        .listen_addr(&args.listen)
        .worker_threads(args.workers)
        .max_connections(args.max_connections)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    let context = match ServerContext::open(&config) {
        Ok(context) => Arc::new(context),
        Err(e) => {
            tracing::error!("Failed to open tables: {}", e);
            std::process::exit(1);
        }
    };

    let handlers = match HandlerRegistry::standard() {
        Ok(handlers) => Arc::new(handlers),
        Err(e) => {
            tracing::error!("Invalid handler registry: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Registered handlers: {}", handlers.names().join(", "));

    let dispatcher = Arc::new(Dispatcher::new(handlers, context));

    let server = match Server::bind(config, dispatcher) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!("Failed to bind: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run() {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Server stopped");
}
