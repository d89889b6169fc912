//! Tool registry and domain definitions.
//!
//! Provides the infrastructure for registering and dispatching MCP tools.
//! Every domain contributes a static catalog; the registry merges them into a
//! single name-to-domain map at startup and refuses duplicate names.

pub mod avatars;
pub mod databases;
pub mod functions;
pub mod graphql;
pub mod health;
pub mod locale;
pub mod messaging;
pub mod storage;
pub mod teams;
pub mod users;

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use tracing::debug;

use crate::clients::ClientRegistry;
use crate::error::{McpError, Result};

/// A tool definition for the MCP tools/list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool name (e.g., "create_document")
    pub name: String,
    /// Tool description
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema")]
    pub input_schema: JsonValue,
}

impl ToolDef {
    /// Create a new tool definition.
    pub fn new(name: &str, description: &str, input_schema: JsonValue) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            input_schema,
        }
    }
}

/// A group of tools backed by one Appwrite subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Databases, collections, documents, attributes, indexes
    Databases,
    /// User accounts and sessions
    Users,
    /// Buckets and files
    Storage,
    /// Functions, executions, variables, deployments
    Functions,
    /// Health probes
    Health,
    /// Topics, subscribers, messages, providers
    Messaging,
    /// Teams and memberships
    Teams,
    /// Generated images
    Avatars,
    /// Locale reference data
    Locale,
    /// Raw GraphQL
    Graphql,
}

impl Domain {
    /// All domains in catalog order.
    pub const ALL: [Domain; 10] = [
        Domain::Databases,
        Domain::Users,
        Domain::Storage,
        Domain::Functions,
        Domain::Health,
        Domain::Messaging,
        Domain::Teams,
        Domain::Avatars,
        Domain::Locale,
        Domain::Graphql,
    ];

    /// Short lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Domain::Databases => "databases",
            Domain::Users => "users",
            Domain::Storage => "storage",
            Domain::Functions => "functions",
            Domain::Health => "health",
            Domain::Messaging => "messaging",
            Domain::Teams => "teams",
            Domain::Avatars => "avatars",
            Domain::Locale => "locale",
            Domain::Graphql => "graphql",
        }
    }

    /// The domain's tool catalog.
    pub fn tools(self) -> Vec<ToolDef> {
        match self {
            Domain::Databases => databases::tools(),
            Domain::Users => users::tools(),
            Domain::Storage => storage::tools(),
            Domain::Functions => functions::tools(),
            Domain::Health => health::tools(),
            Domain::Messaging => messaging::tools(),
            Domain::Teams => teams::tools(),
            Domain::Avatars => avatars::tools(),
            Domain::Locale => locale::tools(),
            Domain::Graphql => graphql::tools(),
        }
    }

    /// Run a tool owned by this domain.
    pub async fn dispatch(
        self,
        clients: &ClientRegistry,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        match self {
            Domain::Databases => databases::dispatch(clients, name, args).await,
            Domain::Users => users::dispatch(clients, name, args).await,
            Domain::Storage => storage::dispatch(clients, name, args).await,
            Domain::Functions => functions::dispatch(clients, name, args).await,
            Domain::Health => health::dispatch(clients, name, args).await,
            Domain::Messaging => messaging::dispatch(clients, name, args).await,
            Domain::Teams => teams::dispatch(clients, name, args).await,
            Domain::Avatars => avatars::dispatch(clients, name, args).await,
            Domain::Locale => locale::dispatch(clients, name, args).await,
            Domain::Graphql => graphql::dispatch(clients, name, args).await,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry of all available tools.
pub struct ToolRegistry {
    tools: Vec<ToolDef>,
    routes: HashMap<String, Domain>,
}

impl ToolRegistry {
    /// Create a new registry with every domain's tools registered.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::DuplicateTool`] if two catalogs share a name.
    pub fn new() -> Result<Self> {
        Self::from_catalogs(Domain::ALL.iter().map(|d| (*d, d.tools())))
    }

    /// Build a registry from explicit catalogs, in order.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::DuplicateTool`] on the first repeated name.
    pub fn from_catalogs<I>(catalogs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Domain, Vec<ToolDef>)>,
    {
        let mut tools = Vec::new();
        let mut routes = HashMap::new();

        for (domain, catalog) in catalogs {
            for tool in catalog {
                if let Some(first) = routes.insert(tool.name.clone(), domain) {
                    return Err(McpError::DuplicateTool {
                        name: tool.name,
                        first: first.to_string(),
                        second: domain.to_string(),
                    });
                }
                tools.push(tool);
            }
        }

        Ok(Self { tools, routes })
    }

    /// Get all tool definitions.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }

    /// The domain that owns a tool, if any.
    pub fn domain_of(&self, name: &str) -> Option<Domain> {
        self.routes.get(name).copied()
    }

    /// Dispatch a tool call to the owning domain.
    pub async fn dispatch(
        &self,
        clients: &ClientRegistry,
        name: &str,
        args: Map<String, JsonValue>,
    ) -> Result<JsonValue> {
        let domain = self
            .domain_of(name)
            .ok_or_else(|| McpError::UnknownTool(name.to_string()))?;

        debug!(tool = name, %domain, "dispatching tool call");
        domain.dispatch(clients, name, args).await
    }
}

/// Helper macro for creating JSON Schema for tool input parameters.
///
/// Each property is `"name": type` with an optional `=> "description"`.
/// Types: `string`, `number`, `integer`, `boolean`, `object`, `any`,
/// `array`, `array_number`, `array_string`, `array_object`, and
/// `(one_of "a", "b")` for string enums.
#[macro_export]
macro_rules! schema {
    // Object with required and optional properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(=> $req_desc:literal)?),* $(,)? },
        optional: { $($opt_name:literal : $opt_type:tt $(=> $opt_desc:literal)?),* $(,)? }
    }) => {{
        let required: Vec<&str> = vec![$($req_name),*];

        let mut props = serde_json::Map::new();
        $(props.insert($req_name.to_string(), $crate::schema!(@prop $req_type $(, $req_desc)?));)*
        $(props.insert($opt_name.to_string(), $crate::schema!(@prop $opt_type $(, $opt_desc)?));)*

        serde_json::json!({
            "type": "object",
            "properties": props,
            "required": required
        })
    }};

    // Object with only required properties
    (object {
        required: { $($req_name:literal : $req_type:tt $(=> $req_desc:literal)?),* $(,)? }
    }) => {
        $crate::schema!(object {
            required: { $($req_name : $req_type $(=> $req_desc)?),* },
            optional: {}
        })
    };

    // Object with only optional properties
    (object {
        optional: { $($opt_name:literal : $opt_type:tt $(=> $opt_desc:literal)?),* $(,)? }
    }) => {
        $crate::schema!(object {
            required: {},
            optional: { $($opt_name : $opt_type $(=> $opt_desc)?),* }
        })
    };

    // Empty object (no parameters)
    (object {}) => {{
        serde_json::json!({
            "type": "object",
            "properties": {},
            "required": []
        })
    }};

    (@prop $ty:tt) => { $crate::schema!(@type $ty) };
    (@prop $ty:tt, $desc:literal) => {{
        let mut prop = $crate::schema!(@type $ty);
        prop["description"] = serde_json::json!($desc);
        prop
    }};

    // Type mappings
    (@type string) => { serde_json::json!({"type": "string"}) };
    (@type number) => { serde_json::json!({"type": "number"}) };
    (@type integer) => { serde_json::json!({"type": "integer"}) };
    (@type boolean) => { serde_json::json!({"type": "boolean"}) };
    (@type object) => { serde_json::json!({"type": "object"}) };
    (@type any) => { serde_json::json!({}) };
    (@type array) => { serde_json::json!({"type": "array"}) };
    (@type array_number) => { serde_json::json!({"type": "array", "items": {"type": "number"}}) };
    (@type array_string) => { serde_json::json!({"type": "array", "items": {"type": "string"}}) };
    (@type array_object) => { serde_json::json!({"type": "array", "items": {"type": "object"}}) };
    (@type (one_of $($variant:literal),+ $(,)?)) => {
        serde_json::json!({"type": "string", "enum": [$($variant),+]})
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_with_descriptions() {
        let schema = crate::schema!(object {
            required: { "databaseId": string => "Database ID" },
            optional: {
                "enabled": boolean,
                "type": (one_of "key", "unique") => "Index type"
            }
        });
        assert_eq!(schema["required"], json!(["databaseId"]));
        assert_eq!(
            schema["properties"]["databaseId"],
            json!({"type": "string", "description": "Database ID"})
        );
        assert_eq!(schema["properties"]["enabled"], json!({"type": "boolean"}));
        assert_eq!(
            schema["properties"]["type"],
            json!({"type": "string", "enum": ["key", "unique"], "description": "Index type"})
        );
    }

    #[test]
    fn test_schema_empty() {
        let schema = crate::schema!(object {});
        assert_eq!(schema["properties"], json!({}));
        assert_eq!(schema["required"], json!([]));
    }

    #[test]
    fn test_duplicate_names_fail_loudly() {
        let catalogs = vec![
            (Domain::Health, health::tools()),
            (Domain::Locale, vec![ToolDef::new("get_health", "shadow", json!({}))]),
        ];
        match ToolRegistry::from_catalogs(catalogs) {
            Err(McpError::DuplicateTool { name, first, second }) => {
                assert_eq!(name, "get_health");
                assert_eq!(first, "health");
                assert_eq!(second, "locale");
            }
            Err(other) => panic!("unexpected error: {}", other),
            Ok(_) => panic!("duplicate registration should fail"),
        }
    }

    #[test]
    fn test_every_tool_has_one_domain() {
        let registry = ToolRegistry::new().unwrap();
        for domain in Domain::ALL {
            for tool in domain.tools() {
                assert_eq!(registry.domain_of(&tool.name), Some(domain), "{}", tool.name);
            }
        }
        assert_eq!(registry.domain_of("no_such_tool"), None);
    }
}
