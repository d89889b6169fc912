//! GraphQL tools: raw query and mutation passthrough.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{parse_call, to_body};
use crate::error::Result;
use crate::schema;

/// Get all GraphQL tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "graphql_query",
            "Execute a GraphQL query against Appwrite. Use this for complex queries that combine multiple resources.",
            schema!(object {
                required: { "query": string => "GraphQL query string" },
                optional: { "variables": object => "Optional variables for the query" }
            }),
        ),
        ToolDef::new(
            "graphql_mutation",
            "Execute a GraphQL mutation against Appwrite. Use this for complex mutations.",
            schema!(object {
                required: { "query": string => "GraphQL mutation string" },
                optional: { "variables": object => "Optional variables for the mutation" }
            }),
        ),
    ]
}

/// Request body for `POST /graphql`. `variables` is omitted when absent.
#[derive(Debug, Deserialize, Serialize)]
struct GraphqlArgs {
    query: String,
    variables: Option<Map<String, JsonValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum GraphqlCall {
    GraphqlQuery(GraphqlArgs),
    GraphqlMutation(GraphqlArgs),
}

/// Dispatch a GraphQL tool call. Queries and mutations share one endpoint.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let client = clients.client()?;

    let (GraphqlCall::GraphqlQuery(args) | GraphqlCall::GraphqlMutation(args)) =
        parse_call::<GraphqlCall>(name, args)?;
    client
        .post_raw("/graphql", &to_body(&args)?, "GraphQL error")
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_omits_absent_variables() {
        let args = GraphqlArgs {
            query: "{ health { status } }".into(),
            variables: None,
        };
        assert_eq!(to_body(&args).unwrap(), json!({"query": "{ health { status } }"}));
    }
}
