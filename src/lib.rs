//! # appwrite-mcp
//!
//! MCP (Model Context Protocol) server for the Appwrite backend platform.
//!
//! This crate exposes the Appwrite REST API as tools for AI agents. It
//! implements the MCP protocol over stdin/stdout using JSON-RPC 2.0.
//!
//! ## Features
//!
//! - **143 tools** covering Databases, Users, Storage, Functions, Messaging,
//!   Teams, Avatars, Locale, Health and GraphQL
//! - **Composite operations**: bulk document create/update/delete, upsert,
//!   attribute increment and an aggregate health check
//! - **Typed arguments**: every argument bag is validated before any backend
//!   call is made
//!
//! ## Usage
//!
//! The server is typically run as an executable and configured in AI tools like Claude Desktop:
//!
//! ```json
//! {
//!   "mcpServers": {
//!     "appwrite": {
//!       "command": "/path/to/appwrite-mcp",
//!       "env": {
//!         "APPWRITE_PROJECT_ID": "my-project",
//!         "APPWRITE_API_KEY": "standard_...",
//!         "APPWRITE_ENDPOINT": "https://cloud.appwrite.io/v1"
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! ## Library Usage
//!
//! For testing or embedding, you can use the library API:
//!
//! ```no_run
//! use appwrite_mcp::{AppwriteConfig, ClientRegistry, McpServer, ToolRegistry};
//!
//! # async fn run() -> appwrite_mcp::Result<()> {
//! let config = AppwriteConfig::new("https://cloud.appwrite.io/v1", "my-project", "secret");
//! let server = McpServer::new(ToolRegistry::new()?, ClientRegistry::connect(config)?);
//!
//! // Reads from stdin, writes to stdout
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

pub mod appwrite;
mod clients;
mod config;
mod convert;
mod error;
mod server;
mod tools;

pub use clients::ClientRegistry;
pub use config::{AppwriteConfig, DEFAULT_ENDPOINT};
pub use error::{rpc_codes, McpError, Result};
pub use server::{tool_error, tool_result, JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpServer};
pub use tools::{Domain, ToolDef, ToolRegistry};
