//! Error types for the MCP server.
//!
//! Maps Appwrite REST failures and transport errors to MCP-friendly responses.

use serde::{Deserialize, Serialize};

/// MCP server errors.
#[derive(Debug, Clone, thiserror::Error, Serialize, Deserialize)]
pub enum McpError {
    /// Error reported by the Appwrite backend. The message is forwarded verbatim.
    #[error("{message}")]
    Appwrite {
        /// HTTP status code of the failed call
        code: u16,
        /// Appwrite error type (e.g. `document_not_found`), empty when unknown
        kind: String,
        /// Human-readable error message from the backend
        message: String,
    },

    /// Non-2xx response on a raw HTTP path (GraphQL, geo attributes).
    #[error("{context}: {body}")]
    Http {
        /// What was being attempted
        context: String,
        /// Response body text
        body: String,
    },

    /// Network or decoding failure below the Appwrite API.
    #[error("transport error: {0}")]
    Transport(String),

    /// Unknown tool requested.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// Two catalogs registered the same tool name.
    #[error("duplicate tool '{name}' registered by {first} and {second}")]
    DuplicateTool {
        /// Tool name
        name: String,
        /// Domain that registered it first
        first: String,
        /// Domain that tried to register it again
        second: String,
    },

    /// Invalid argument bag for a tool.
    #[error("invalid arguments for '{name}': {reason}")]
    InvalidArg {
        /// Tool or argument name
        name: String,
        /// Reason why it's invalid
        reason: String,
    },

    /// A client accessor was used before the registry was initialized.
    #[error("Appwrite client not initialized. Call initialize first.")]
    NotInitialized,

    /// The registry was initialized twice.
    #[error("Appwrite client already initialized")]
    AlreadyInitialized,

    /// Missing or invalid startup configuration.
    #[error("{0}")]
    Config(String),

    /// JSON-RPC protocol error.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl McpError {
    /// Build an error from a failed Appwrite response body.
    ///
    /// Appwrite answers with `{"message", "code", "type"}`; anything else is
    /// forwarded as plain text.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct AppwriteBody {
            message: String,
            #[serde(rename = "type", default)]
            kind: String,
        }

        match serde_json::from_str::<AppwriteBody>(body) {
            Ok(parsed) => McpError::Appwrite {
                code: status,
                kind: parsed.kind,
                message: parsed.message,
            },
            Err(_) => McpError::Appwrite {
                code: status,
                kind: String::new(),
                message: if body.is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.to_string()
                },
            },
        }
    }
}

impl From<std::io::Error> for McpError {
    fn from(err: std::io::Error) -> Self {
        McpError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for McpError {
    fn from(err: serde_json::Error) -> Self {
        McpError::Protocol(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for McpError {
    fn from(err: reqwest::Error) -> Self {
        McpError::Transport(err.to_string())
    }
}

/// JSON-RPC error codes.
pub mod rpc_codes {
    /// Parse error - Invalid JSON was received.
    pub const PARSE_ERROR: i32 = -32700;
    /// Invalid Request - The JSON sent is not a valid Request object.
    pub const INVALID_REQUEST: i32 = -32600;
    /// Method not found - The method does not exist / is not available.
    pub const METHOD_NOT_FOUND: i32 = -32601;
    /// Invalid params - Invalid method parameter(s).
    pub const INVALID_PARAMS: i32 = -32602;
}

/// Result type for MCP operations.
pub type Result<T> = std::result::Result<T, McpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appwrite_body_is_forwarded() {
        let err = McpError::from_response(
            404,
            r#"{"message":"Document with the requested ID could not be found.","code":404,"type":"document_not_found","version":"1.6.0"}"#,
        );
        assert_eq!(
            err.to_string(),
            "Document with the requested ID could not be found."
        );
        match err {
            McpError::Appwrite { code, kind, .. } => {
                assert_eq!(code, 404);
                assert_eq!(kind, "document_not_found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_body() {
        let err = McpError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "Bad Gateway");

        let err = McpError::from_response(500, "");
        assert_eq!(err.to_string(), "HTTP 500");
    }
}
