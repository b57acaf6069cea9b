// Standalone MCP server binary

use anyhow::{Context, Result};
use clap::Parser;
use eka_core::types::SessionId;
use eka_mcp::server::McpServer;
use eka_mcp::tools::{
    MedicationInteractionTool, MedicationUnderstandingTool, ProtocolPublishersTool,
    ProtocolTagsTool, ProtocolWorkflow, SearchProtocolsTool, ToolRegistry,
};
use eka_sdk::EkaClient;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "eka-mcp")]
#[command(about = "MCP server exposing Eka clinical tools over stdio", long_about = None)]
struct Args {
    /// Base URL of the Eka API host
    #[arg(long = "eka-api-host")]
    eka_api_host: String,

    /// Client ID issued for this integration
    #[arg(long)]
    client_id: String,

    /// Client secret (also accepted as --client-token)
    #[arg(long, visible_alias = "client-token")]
    client_secret: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing. Stdout carries the MCP protocol, so logs go to
    // stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("Eka MCP server starting...");

    let client = EkaClient::builder()
        .api_host(&args.eka_api_host)
        .client_id(&args.client_id)
        .client_secret(&args.client_secret)
        .build()?;

    // Supported tags are fetched once and held for the life of the process;
    // bad credentials or an unreachable host fail fast here.
    let tags = client
        .protocols()
        .tags()
        .await
        .context("failed to fetch supported protocol tags")?;
    tracing::info!("Fetched {} supported protocol tags", tags.len());

    // One stdio connection, one conversation, one workflow session.
    let session = SessionId::new();
    let workflow = Arc::new(ProtocolWorkflow::new(client.clone(), tags));

    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(MedicationUnderstandingTool::new(client.clone())));
    registry.register(Arc::new(MedicationInteractionTool::new(client)));
    registry.register(Arc::new(ProtocolTagsTool::new(workflow.clone(), session)));
    registry.register(Arc::new(ProtocolPublishersTool::new(
        workflow.clone(),
        session,
    )));
    registry.register(Arc::new(SearchProtocolsTool::new(workflow, session)));

    tracing::info!("Registered {} tools", registry.list_schemas().len());

    let server = McpServer::new(registry);
    server.serve_stdio().await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_credential_flags_are_required() {
        let result = Args::try_parse_from([
            "eka-mcp",
            "--eka-api-host",
            "https://api.eka.care",
            "--client-id",
            "id",
        ]);
        assert!(result.is_err(), "missing --client-secret must be fatal");

        let result = Args::try_parse_from([
            "eka-mcp",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
        ]);
        assert!(result.is_err(), "missing --eka-api-host must be fatal");
    }

    #[test]
    fn client_token_is_an_alias_for_client_secret() {
        let args = Args::try_parse_from([
            "eka-mcp",
            "--eka-api-host",
            "https://api.eka.care",
            "--client-id",
            "id",
            "--client-token",
            "secret",
        ])
        .unwrap();
        assert_eq!(args.client_secret, "secret");
    }
}
