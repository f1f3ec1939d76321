//! Bugsink MCP server binary.
//!
//! This binary runs the MCP server using stdio transport. Stdout carries the
//! protocol, so all logging goes to stderr.

use anyhow::Context;
use bugsink::{BugsinkClient, ClientConfig};
use bugsink_mcp::BugsinkMcpServer;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Expose a Bugsink server to MCP clients over stdio.
#[derive(Parser, Debug)]
#[command(name = "bugsink-mcp", version, about)]
struct Args {
    /// Base URL of the Bugsink server, e.g. <https://bugsink.example.com>
    #[arg(long, env = "BUGSINK_URL")]
    url: String,

    /// API token sent as a bearer token
    #[arg(long, env = "BUGSINK_TOKEN", hide_env_values = true)]
    token: String,

    /// Per-request timeout in seconds
    #[arg(long, env = "BUGSINK_TIMEOUT_SECS", default_value_t = 30)]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Can be controlled via RUST_LOG, e.g. RUST_LOG=bugsink=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();

    let config = ClientConfig::new(args.url, args.token)
        .context("Invalid Bugsink configuration")?
        .with_timeout(Duration::from_secs(args.timeout_secs));
    tracing::info!(url = config.base_url(), "Starting bugsink-mcp server");

    let client = BugsinkClient::new(config).context("Failed to build HTTP client")?;
    let server = BugsinkMcpServer::new(Arc::new(client));
    server.run().await?;

    Ok(())
}
