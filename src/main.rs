//! Redirect server.
//!
//! ```text
//!   GET /romeo/docs
//!        │
//!        ▼
//!   ┌─────────┐    ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//!   │  http   │───▶│ directory │───▶│ service tree │───▶│   template   │
//!   │ server  │    │ (prefix)  │    │ (segments)   │    │   render     │
//!   └─────────┘    └───────────┘    └──────────────┘    └──────┬───────┘
//!        ▲                                                      │
//!        └──────────── 307 Location: http://will.github.io/romeo┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirect_tree::config::{load_config, watcher::ConfigWatcher, RedirectConfig};
use redirect_tree::lifecycle::{signals, Shutdown};
use redirect_tree::observability::{logging, metrics};
use redirect_tree::HttpServer;

#[derive(Parser)]
#[command(name = "redirect-tree")]
#[command(about = "Redirect short paths to code hosts, docs and registries", long_about = None)]
struct Args {
    /// TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RedirectConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability);
    tracing::info!("redirect-tree v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        mounts = config.mounts.len(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        None => {
            let (_tx, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(signals::shutdown_on_signal(shutdown));

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
