//! Firehose relay binary.
//!
//! Startup order: configuration first, then the downstream connection
//! (fatal if it fails), then the listener. Traffic is only accepted once
//! forwarding can work.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firehose_relay::config;
use firehose_relay::forward::{FluentForwarder, Forwarder};
use firehose_relay::lifecycle::{signals, Shutdown};
use firehose_relay::observability::metrics;
use firehose_relay::HttpServer;

#[derive(Parser)]
#[command(name = "firehose-relay")]
#[command(about = "Firehose-compatible ingestion endpoint relaying to a fluent forwarder")]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "FIREHOSE_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Listen address for the ingestion endpoint.
    #[arg(long, env = "FIREHOSE_RELAY_LISTEN")]
    listen: Option<String>,

    /// Static access key delivery requests must present.
    #[arg(long, env = "FIREHOSE_RELAY_ACCESS_KEY")]
    access_key: Option<String>,

    /// Downstream fluent aggregator as host:port.
    #[arg(long, env = "FIREHOSE_RELAY_FORWARD")]
    forward_address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firehose_relay=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
    }
    if let Some(access_key) = cli.access_key {
        config.auth.access_key = access_key;
    }
    if let Some(forward_address) = cli.forward_address {
        config.forward.address = forward_address;
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        forward = %config.forward.address,
        "configuration loaded"
    );

    // A bad forward address or failed initial connect is fatal: forwarding
    // is the relay's whole job.
    let target = config.forward.target()?;
    let forwarder = Arc::new(FluentForwarder::new(target));
    if let Err(error) = forwarder.connect().await {
        tracing::error!(error = %error, target = %config.forward.address, "error connecting to fluent forwarder");
        return Err(error.into());
    }

    let metrics_handle = if config.observability.metrics_enabled {
        metrics::install_recorder()
    } else {
        None
    };

    let shutdown = Shutdown::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::wait_for_termination().await;
        tracing::info!("termination signal received");
        signal_shutdown.trigger();
    });

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(config, forwarder, metrics_handle);
    server.run(listener, shutdown).await?;

    tracing::info!("shutdown complete");
    Ok(())
}
