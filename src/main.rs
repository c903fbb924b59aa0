//! CLI for priomq
//!
//! Subcommands:
//! - `serve`: run the HTTP broker
//! - `config`: print the effective configuration as JSON

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use priomq::broker::Broker;
use priomq::broker::janitor::start_expiry_loop;
use priomq::config::{Settings, load_config};
use priomq::persistence::open_store;
use priomq::transport::{AppState, start_http_server};
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "priomq")]
enum Command {
    /// Start the HTTP server
    Serve {
        /// Extra configuration file layered over config/default
        #[arg(long)]
        config: Option<String>,
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the effective configuration
    Config {
        #[arg(long)]
        config: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    match Command::parse() {
        Command::Serve { config, port } => {
            if let Err(e) = run_server(config.as_deref(), port).await {
                eprintln!("Server failed: {e}");
                std::process::exit(1);
            }
        }
        Command::Config { config } => match load_config(config.as_deref()) {
            Ok(settings) => match serde_json::to_string_pretty(&settings) {
                Ok(json) => println!("{json}"),
                Err(e) => eprintln!("Failed to render configuration: {e}"),
            },
            Err(e) => {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

async fn run_server(
    config_file: Option<&str>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings: Settings = load_config(config_file)?;
    if let Some(port) = port {
        settings.server.port = port;
    }
    priomq::utils::logging::init(&settings.log.level);

    let store = open_store(&settings.storage)?;
    let broker = Arc::new(Broker::new(store));

    let janitor = settings.broker.message_ttl_secs.map(|ttl| {
        info!("Expiring messages older than {ttl}s");
        tokio::spawn(start_expiry_loop(
            broker.clone(),
            Duration::from_secs(ttl),
            Duration::from_secs(settings.broker.sweep_interval_secs.max(1)),
        ))
    });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    let state = AppState {
        broker,
        max_payload_bytes: settings.server.max_payload_bytes,
    };

    start_http_server(listener, state, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for shutdown signal: {e}");
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received. Exiting gracefully.");
    })
    .await?;

    if let Some(handle) = janitor {
        handle.abort();
    }
    Ok(())
}
