//! Tenant Router
//!
//! Host-based request router for a multi-tenant web application.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ request id / trace / timeout
//!                 │
//!                 ▼
//!           hook scope? ── no ──────────────────────────┐
//!                 │ yes                                 │
//!                 ▼                                     │
//!           access gate ── anonymous + protected ──▶ 307 sign-in
//!                 │                                     │
//!                 ▼                                     │
//!           router: tenant / sign-in / site / app / pass│
//!                 │ (URI rewritten)                     │
//!                 ▼                                     ▼
//!           forward to upstream application ◀───────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use tenant_router::config::{load_config, watcher::ConfigWatcher, RouterConfig};
use tenant_router::lifecycle::{wait_for_signal, Shutdown};
use tenant_router::observability::{logging, metrics};
use tenant_router::HttpServer;

#[derive(Parser)]
#[command(name = "tenant-router")]
#[command(about = "Host-based request router for multi-tenant apps", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,

    /// Reload the configuration when the file changes.
    #[arg(long, requires = "config")]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    if cli.check {
        println!("configuration OK");
        return Ok(());
    }

    logging::init_logging(&config.observability)?;

    tracing::info!("tenant-router v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        base_domain = %config.tenancy.base_domain,
        public_routes = ?config.auth.public_routes,
        "Configuration loaded"
    );
    if config.tenancy.base_domain.is_empty() {
        tracing::warn!("tenancy.base_domain is empty; tenant rewrites are disabled");
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            (Some(watcher.run()?), rx)
        }
        _ => {
            let (_, rx) = mpsc::unbounded_channel();
            (None, rx)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            wait_for_signal().await;
            shutdown.trigger();
        }
    });

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
