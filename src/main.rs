//! Host-based HTTP redirector.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌───────────────────────────────────────────────────┐
//!                     │                    REDIRECTOR                     │
//!                     │                                                   │
//!   Client Request    │  ┌──────────┐   ┌──────────┐   ┌───────────────┐  │
//!   ──────────────────┼─▶│   http   │──▶│ SSL gate │──▶│    routing    │  │
//!                     │  │  server  │   │          │   │    engine     │  │
//!                     │  └──────────┘   └──────────┘   └───────┬───────┘  │
//!                     │                                        │          │
//!                     │                 ┌──────────────────────┤          │
//!                     │                 ▼                      ▼          │
//!                     │          ┌────────────┐        ┌─────────────┐    │
//!                     │          │ path table │        │ host table  │    │
//!                     │          │   (JSON)   │        │   (TOML)    │    │
//!                     │          └────────────┘        └─────────────┘    │
//!                     │                                        │          │
//!   Client Response   │  ┌──────────┐                          │          │
//!   ◀─────────────────┼──│ response │◀─────── decision ────────┘          │
//!   301/302/307/400/410  └──────────┘                                     │
//!                     │                                                   │
//!                     │  config · lifecycle · observability               │
//!                     └───────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use host_redirector::config::loader;
use host_redirector::http::HttpServer;
use host_redirector::lifecycle::{build_engine, signals, Shutdown};
use host_redirector::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "host-redirector")]
#[command(about = "Redirect legacy hostnames to their canonical destinations", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults plus environment overrides when absent.
    #[arg(short, long, env = "REDIRECTOR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,

    /// Validate configuration and tables, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = loader::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability, config.debug);

    tracing::info!("host-redirector v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        host_rules = config.rules.len(),
        force_ssl = config.force_ssl,
        debug = config.debug,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let engine = build_engine(&config)?;

    if cli.check {
        println!(
            "configuration OK: {} host rules, {} path redirects",
            engine.hosts().len(),
            engine.paths().len()
        );
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config, engine);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
