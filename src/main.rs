//! Database Connector MCP Server - Main entry point.
//!
//! This server exposes a relational database to AI assistants through MCP
//! (Model Context Protocol) tools for reading tables, running custom SQL and
//! inserting rows.

use clap::Parser;
use db_connector_mcp::config::{Config, TransportMode};
use db_connector_mcp::tools::ToolGateway;
use db_connector_mcp::transport::{HttpTransport, StdioTransport, Transport};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Initialize the tracing subscriber for logging.
///
/// Logs go to stderr; stdout belongs to the stdio transport.
fn init_tracing(config: &Config) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.json_logs {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::parse();
    init_tracing(&config);

    let settings = config.db_settings();
    info!(
        transport = %config.transport,
        backend = %settings.backend,
        database = %settings.database_name(None),
        "Starting Database Connector MCP Server v{}",
        env!("CARGO_PKG_VERSION")
    );

    let gateway = Arc::new(ToolGateway::new(settings));

    let result = match config.transport {
        TransportMode::Stdio => StdioTransport::new(gateway).run().await,
        TransportMode::Http => {
            info!(
                host = %config.http_host,
                port = config.http_port,
                endpoint = %config.mcp_endpoint,
                "Using HTTP transport"
            );
            let transport = HttpTransport::new(
                gateway,
                &config.http_host,
                config.http_port,
                &config.mcp_endpoint,
            );
            transport.run().await
        }
    };

    if let Err(e) = result {
        error!(error = %e, "Server error");
        return Err(e.into());
    }

    info!("Server shutdown complete");
    Ok(())
}
