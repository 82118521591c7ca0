use anyhow::Result;

use polymath::mcp::run_mcp_server;
use polymath::{PolymathConfig, PolymathEngine};

/// Serve the engine's tools over MCP on stdio until stdin closes
pub fn execute(engine: PolymathEngine, config: &PolymathConfig) -> Result<()> {
    run_mcp_server(engine, config.dialogue.idle_timeout_secs)
}
