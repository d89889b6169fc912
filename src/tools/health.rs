//! Health tools: individual probes and a combined report.

use serde::Deserialize;
use serde_json::{json, Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{parse_call, NoArgs};
use crate::error::Result;
use crate::schema;

/// Get all health tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "get_health",
            "Check Appwrite HTTP server status",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_health_db",
            "Check database server status",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_health_cache",
            "Check cache server status",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_health_storage",
            "Check storage server status",
            schema!(object {}),
        ),
        ToolDef::new(
            "get_health_all",
            "Get comprehensive health status (HTTP, DB, cache, storage, time)",
            schema!(object {}),
        ),
    ]
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum HealthCall {
    GetHealth(NoArgs),
    GetHealthDb(NoArgs),
    GetHealthCache(NoArgs),
    GetHealthStorage(NoArgs),
    GetHealthAll(NoArgs),
}

/// Dispatch a health tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let health = clients.health()?;

    match parse_call::<HealthCall>(name, args)? {
        HealthCall::GetHealth(_) => health.get().await,
        HealthCall::GetHealthDb(_) => health.get_db().await,
        HealthCall::GetHealthCache(_) => health.get_cache().await,
        HealthCall::GetHealthStorage(_) => health.get_storage().await,
        HealthCall::GetHealthAll(_) => {
            let (http, db, cache, storage, time) = tokio::join!(
                health.get(),
                health.get_db(),
                health.get_cache(),
                health.get_storage(),
                health.get_time(),
            );
            Ok(json!({
                "http": probe(http),
                "db": probe(db),
                "cache": probe(cache),
                "storage": probe(storage),
                "time": probe(time),
            }))
        }
    }
}

/// A failed probe is reported in place rather than failing the whole report.
fn probe(result: Result<JsonValue>) -> JsonValue {
    match result {
        Ok(status) => status,
        Err(e) => {
            tracing::warn!(error = %e, "health probe failed");
            json!({ "status": "error", "message": e.to_string() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::McpError;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 5);
    }

    #[test]
    fn test_probe_error_shape() {
        let failed = probe(Err(McpError::Transport("connection refused".into())));
        assert_eq!(failed["status"], "error");
        assert!(failed["message"].as_str().unwrap().contains("connection refused"));

        let ok = probe(Ok(json!({"status": "pass"})));
        assert_eq!(ok, json!({"status": "pass"}));
    }
}
