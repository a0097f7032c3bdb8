//! Academy gateway entry point.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use academy_gateway::config::{load_config, GatewayConfig};
use academy_gateway::observability::{logging, metrics};
use academy_gateway::{AppState, HttpServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "academy-gateway", about = "Multi-tenant academy gateway")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_domain = %config.domain.base_domain,
        default_tenant = %config.domain.default_tenant,
        "Configuration loaded"
    );

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

    // Stores are in-memory until wired to the platform backends; tenants
    // and users arrive through operator tooling, not this binary.
    let state = AppState::in_memory(config);

    let shutdown = Shutdown::new();
    shutdown.listen_for_signals();

    let server = HttpServer::new(state);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
