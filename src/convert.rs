//! Conversion utilities between MCP argument bags, request bodies and results.
//!
//! Argument bags are deserialized into each domain's closed operation enum;
//! request bodies are serialized from the same typed arguments with unset
//! fields dropped.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use crate::error::{McpError, Result};

/// Placeholder Appwrite clients pass to request a server-generated ID.
const UNIQUE_PLACEHOLDER: &str = "unique()";

/// Arguments for tools that take none. Extra keys are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct NoArgs {}

/// Optional `queries` / `search` filters accepted by list tools.
#[derive(Debug, Default, Deserialize)]
pub struct ListArgs {
    pub queries: Option<Vec<String>>,
    pub search: Option<String>,
}

impl ListArgs {
    pub fn queries(&self) -> Option<&[String]> {
        self.queries.as_deref()
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

/// Parse a tool invocation into a domain's operation enum.
///
/// The enum is adjacently tagged (`name` / `arguments`), so an unknown name,
/// a missing required field or a mistyped value is rejected here, before any
/// backend call.
pub fn parse_call<T: DeserializeOwned>(name: &str, args: Map<String, JsonValue>) -> Result<T> {
    serde_json::from_value(json!({ "name": name, "arguments": JsonValue::Object(args) })).map_err(
        |e| McpError::InvalidArg {
            name: name.to_string(),
            reason: e.to_string(),
        },
    )
}

/// Serialize typed arguments as a request body, dropping unset fields.
pub fn to_body<T: Serialize>(args: &T) -> Result<JsonValue> {
    let mut body = serde_json::to_value(args)
        .map_err(|e| McpError::Internal(format!("failed to encode request body: {}", e)))?;
    if let JsonValue::Object(map) = &mut body {
        map.retain(|_, v| !v.is_null());
    }
    Ok(body)
}

/// Generate a fresh resource ID.
pub fn unique_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Use the caller's ID, or generate one when it is absent, empty, or the
/// `unique()` placeholder.
pub fn id_or_unique(id: Option<String>) -> String {
    match id {
        Some(id) if !id.is_empty() && id != UNIQUE_PLACEHOLDER => id,
        _ => unique_id(),
    }
}

/// Fill in an omittable ID in place.
pub fn ensure_id(id: &mut Option<String>) -> String {
    let resolved = id_or_unique(id.take());
    *id = Some(resolved.clone());
    resolved
}

/// Decode a base64 argument.
pub fn decode_base64(name: &str, encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded.trim())
        .map_err(|e| McpError::InvalidArg {
            name: name.to_string(),
            reason: format!("invalid base64: {}", e),
        })
}

/// Wrap image bytes for transport as text.
pub fn image_result(description: String, bytes: &[u8]) -> JsonValue {
    json!({
        "type": "image",
        "description": description,
        "data": BASE64.encode(bytes),
    })
}

/// Acknowledgement for operations with no natural return value.
pub fn ack(message: String) -> JsonValue {
    json!({ "success": true, "message": message })
}

/// Acknowledgement for a deleted resource, e.g. `Database main deleted`.
pub fn deleted(kind: &str, id: &str) -> JsonValue {
    ack(format!("{} {} deleted", kind, id))
}

/// Read a numeric attribute from a document, treating anything else as 0.
pub fn number_or_zero(document: &JsonValue, attribute: &str) -> serde_json::Number {
    match document.get(attribute) {
        Some(JsonValue::Number(n)) => n.clone(),
        _ => serde_json::Number::from(0),
    }
}

/// Add two JSON numbers, staying integral when both sides are integers.
pub fn add_numbers(base: &serde_json::Number, delta: &serde_json::Number) -> JsonValue {
    if let (Some(a), Some(b)) = (base.as_i64(), delta.as_i64()) {
        if let Some(sum) = a.checked_add(b) {
            return JsonValue::from(sum);
        }
    }
    let sum = base.as_f64().unwrap_or(0.0) + delta.as_f64().unwrap_or(0.0);
    serde_json::Number::from_f64(sum).map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        #[serde(skip_serializing)]
        database_id: String,
        name: String,
        enabled: Option<bool>,
    }

    #[derive(Debug, Deserialize)]
    #[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
    enum SampleCall {
        CreateSample(Sample),
        Ping(NoArgs),
    }

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_parse_call() {
        let call: SampleCall = parse_call(
            "create_sample",
            args(json!({"databaseId": "db", "name": "n", "extra": 1})),
        )
        .unwrap();
        match call {
            SampleCall::CreateSample(s) => {
                assert_eq!(s.database_id, "db");
                assert_eq!(s.enabled, None);
            }
            other => panic!("unexpected call: {:?}", other),
        }

        let call: SampleCall = parse_call("ping", Map::new()).unwrap();
        assert!(matches!(call, SampleCall::Ping(_)));
    }

    #[test]
    fn test_parse_call_rejects_missing_field() {
        let err =
            parse_call::<SampleCall>("create_sample", args(json!({"name": "n"}))).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("create_sample"));
        assert!(msg.contains("databaseId"));
    }

    #[test]
    fn test_to_body_drops_unset_and_path_fields() {
        let sample = Sample {
            database_id: "db".into(),
            name: "n".into(),
            enabled: None,
        };
        assert_eq!(to_body(&sample).unwrap(), json!({"name": "n"}));
    }

    #[test]
    fn test_unique_ids_are_distinct() {
        let a = unique_id();
        let b = unique_id();
        assert!(!a.is_empty());
        assert!(a.len() <= 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_id_or_unique() {
        assert_eq!(id_or_unique(Some("mine".into())), "mine");
        assert_ne!(id_or_unique(Some(String::new())), "");
        assert_ne!(id_or_unique(Some("unique()".into())), "unique()");
        assert!(!id_or_unique(None).is_empty());
    }

    #[test]
    fn test_base64_round_trip_rejects_garbage() {
        assert_eq!(decode_base64("f", "aGVsbG8=").unwrap(), b"hello");
        assert!(decode_base64("f", "not base64!").is_err());
        assert_eq!(image_result("x".into(), b"hello")["data"], "aGVsbG8=");
    }

    #[test]
    fn test_add_numbers() {
        let doc = json!({"count": 5, "name": "x"});
        assert_eq!(number_or_zero(&doc, "missing"), serde_json::Number::from(0));
        assert_eq!(number_or_zero(&doc, "name"), serde_json::Number::from(0));

        let five = number_or_zero(&doc, "count");
        assert_eq!(add_numbers(&five, &serde_json::Number::from(-3)), json!(2));
        let half = serde_json::Number::from_f64(0.5).unwrap();
        assert_eq!(add_numbers(&five, &half), json!(5.5));
    }
}
