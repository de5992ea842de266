//! Stdio transport for the MCP server.
//!
//! This transport uses standard input/output for communication,
//! which is the standard mode for CLI-based MCP integrations.

use crate::error::{GatewayError, GatewayResult};
use crate::mcp::GatewayService;
use crate::tools::ToolGateway;
use crate::transport::{Transport, wait_for_signal};
use rmcp::{ServiceExt, transport::stdio};
use std::sync::Arc;
use tracing::{info, warn};

/// Stdio transport implementation.
///
/// This transport reads JSON-RPC messages from stdin and writes
/// responses to stdout. Logs go to stderr.
pub struct StdioTransport {
    gateway: Arc<ToolGateway>,
}

impl StdioTransport {
    pub fn new(gateway: Arc<ToolGateway>) -> Self {
        Self { gateway }
    }
}

impl Transport for StdioTransport {
    async fn run(&self) -> GatewayResult<()> {
        info!("Starting MCP server with stdio transport");

        let service = GatewayService::new(self.gateway.clone());
        let running_service = service.serve(stdio()).await.map_err(|e| {
            GatewayError::internal(format!("Failed to start stdio transport: {}", e))
        })?;

        tokio::select! {
            result = running_service.waiting() => {
                match result {
                    Ok(_quit_reason) => info!("Stdio transport completed normally"),
                    Err(e) => {
                        warn!(error = %e, "Stdio transport error");
                        return Err(GatewayError::internal(format!(
                            "Stdio transport error: {}",
                            e
                        )));
                    }
                }
            }
            _ = wait_for_signal() => {
                // tokio::select! cannot interrupt a blocking stdin read, so exit here.
                // Sockets of calls still in flight are closed by the OS
                info!("Shutdown signal received, exiting");
                std::process::exit(0);
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "stdio"
    }
}
