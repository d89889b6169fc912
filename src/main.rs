//! MCP server for the Appwrite backend platform.
//!
//! Run with `appwrite-mcp --project-id <ID> --api-key <KEY>`, or set
//! `APPWRITE_PROJECT_ID` / `APPWRITE_API_KEY` in the environment.

use appwrite_mcp::{AppwriteConfig, ClientRegistry, McpServer, ToolRegistry, DEFAULT_ENDPOINT};
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// MCP server for Appwrite.
///
/// Exposes the Appwrite REST API as MCP tools for AI agents.
/// Communicates via JSON-RPC 2.0 over stdin/stdout.
#[derive(Parser)]
#[command(name = "appwrite-mcp")]
#[command(version, about, long_about = None)]
struct Args {
    /// Appwrite project ID.
    #[arg(long, env = "APPWRITE_PROJECT_ID", value_name = "ID")]
    project_id: Option<String>,

    /// Appwrite server API key.
    #[arg(long, env = "APPWRITE_API_KEY", value_name = "KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Appwrite API endpoint, including the version prefix.
    #[arg(long, env = "APPWRITE_ENDPOINT", value_name = "URL", default_value = DEFAULT_ENDPOINT)]
    endpoint: Option<String>,

    /// Enable debug logging to stderr.
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        let filter = match "appwrite_mcp=debug".parse() {
            Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
            Err(_) => EnvFilter::from_default_env(),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let config = match AppwriteConfig::resolve(args.project_id, args.api_key, args.endpoint) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!(?config, "resolved configuration");

    let clients = match ClientRegistry::connect(config) {
        Ok(clients) => clients,
        Err(e) => {
            eprintln!("Error: Failed to initialize Appwrite clients: {}", e);
            std::process::exit(1);
        }
    };

    let registry = match ToolRegistry::new() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };
    tracing::info!(tools = registry.tools().len(), "appwrite-mcp ready");

    // Run the server
    let server = McpServer::new(registry, clients);
    if let Err(e) = server.run().await {
        eprintln!("Error: Server error: {}", e);
        std::process::exit(1);
    }
}
