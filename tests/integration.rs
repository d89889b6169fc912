//! Integration tests for the MCP server.
//!
//! Every test runs the real tool handlers against a `wiremock` stand-in for
//! the Appwrite REST API.

use std::collections::HashSet;

use appwrite_mcp::{
    rpc_codes, AppwriteConfig, ClientRegistry, Domain, JsonRpcRequest, McpError, McpServer,
    ToolRegistry,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde_json::{json, Map, Value as JsonValue};
use wiremock::matchers::{any, body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROJECT: &str = "test-project";
const KEY: &str = "test-key";

/// Start a stub backend and a registry pointed at it.
async fn backend() -> (MockServer, ClientRegistry) {
    let server = MockServer::start().await;
    let config = AppwriteConfig::new(format!("{}/v1", server.uri()), PROJECT, KEY);
    let clients = ClientRegistry::connect(config).expect("Failed to initialize clients");
    (server, clients)
}

fn as_map(args: JsonValue) -> Map<String, JsonValue> {
    match args {
        JsonValue::Object(m) => m,
        _ => Map::new(),
    }
}

/// Helper to dispatch a tool call.
async fn call_tool(clients: &ClientRegistry, name: &str, args: JsonValue) -> JsonValue {
    let registry = ToolRegistry::new().expect("registry");
    registry
        .dispatch(clients, name, as_map(args))
        .await
        .unwrap_or_else(|e| panic!("Tool {} failed: {}", name, e))
}

/// Helper to dispatch a tool call and expect an error.
async fn call_tool_err(clients: &ClientRegistry, name: &str, args: JsonValue) -> McpError {
    let registry = ToolRegistry::new().expect("registry");
    match registry.dispatch(clients, name, as_map(args)).await {
        Ok(v) => panic!("Expected tool {} to fail, got {}", name, v),
        Err(e) => e,
    }
}

/// Bodies of every request the stub received on `path`, in order.
async fn bodies(server: &MockServer, path: &str) -> Vec<JsonValue> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == path)
        .map(|r| r.body_json::<JsonValue>().unwrap_or(JsonValue::Null))
        .collect()
}

fn ok(body: JsonValue) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({
        "message": "Document with the requested ID could not be found.",
        "code": 404,
        "type": "document_not_found"
    }))
}

const DOCS: &str = "/v1/databases/db/collections/col/documents";

// =============================================================================
// Registry
// =============================================================================

#[test]
fn test_catalog_size_and_uniqueness() {
    let registry = ToolRegistry::new().unwrap();
    assert_eq!(registry.tools().len(), 143);

    let names: HashSet<&str> = registry.tools().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), 143);
}

#[test]
fn test_every_tool_routes_to_its_catalog() {
    let registry = ToolRegistry::new().unwrap();
    for domain in Domain::ALL {
        for tool in domain.tools() {
            assert_eq!(registry.domain_of(&tool.name), Some(domain), "{}", tool.name);
        }
    }
}

/// Each required property filled with a value of its declared type.
fn minimal_args(schema: &JsonValue) -> JsonValue {
    let mut args = Map::new();
    for key in schema["required"].as_array().cloned().unwrap_or_default() {
        let key = key.as_str().unwrap_or_default().to_string();
        let prop = &schema["properties"][key.as_str()];
        let value = match (prop["type"].as_str(), prop.get("enum")) {
            (_, Some(variants)) => variants[0].clone(),
            (Some("boolean"), _) => json!(true),
            (Some("integer"), _) | (Some("number"), _) => json!(1),
            (Some("object"), _) => json!({}),
            (Some("array"), _) => json!([]),
            // Upload payloads must be valid base64.
            _ if key == "fileContent" || key == "code" => json!("aGVsbG8="),
            _ => json!("x"),
        };
        args.insert(key, value);
    }
    JsonValue::Object(args)
}

#[tokio::test]
async fn test_every_tool_accepts_minimal_args() {
    let (server, clients) = backend().await;
    Mock::given(any())
        .respond_with(ok(json!({"$id": "x", "total": 0, "documents": []})))
        .mount(&server)
        .await;

    let registry = ToolRegistry::new().unwrap();
    let mut failed = Vec::new();
    for tool in registry.tools() {
        let args = as_map(minimal_args(&tool.input_schema));
        if let Err(e) = registry.dispatch(&clients, &tool.name, args).await {
            failed.push(format!("{}: {}", tool.name, e));
        }
    }
    assert!(failed.is_empty(), "tools rejected minimal arguments: {:#?}", failed);
}

#[test]
fn test_duplicate_registration_fails() {
    let err = ToolRegistry::from_catalogs(vec![
        (Domain::Health, Domain::Health.tools()),
        (Domain::Locale, Domain::Health.tools()),
    ])
    .err()
    .expect("duplicate names must be rejected");
    assert!(matches!(err, McpError::DuplicateTool { .. }));
    assert!(err.to_string().contains("get_health"));
}

#[test]
fn test_schemas_are_objects() {
    let registry = ToolRegistry::new().unwrap();
    for tool in registry.tools() {
        assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
        assert!(tool.input_schema["properties"].is_object(), "{}", tool.name);
        assert!(!tool.description.is_empty(), "{}", tool.name);
    }
}

#[tokio::test]
async fn test_unknown_tool() {
    let (_server, clients) = backend().await;
    let err = call_tool_err(&clients, "drop_everything", json!({})).await;
    assert!(matches!(err, McpError::UnknownTool(_)));
    assert_eq!(err.to_string(), "Unknown tool: drop_everything");
}

#[tokio::test]
async fn test_uninitialized_registry() {
    let clients = ClientRegistry::new();
    let err = call_tool_err(&clients, "get_health", json!({})).await;
    assert!(matches!(err, McpError::NotInitialized));
}

#[tokio::test]
async fn test_second_initialize_fails() {
    let (server, clients) = backend().await;
    let err = clients
        .initialize(AppwriteConfig::new(server.uri(), PROJECT, KEY))
        .unwrap_err();
    assert!(matches!(err, McpError::AlreadyInitialized));
}

#[tokio::test]
async fn test_invalid_arguments_never_reach_backend() {
    let (server, clients) = backend().await;
    let err = call_tool_err(&clients, "get_database", json!({})).await;
    assert!(matches!(err, McpError::InvalidArg { .. }));

    let err = call_tool_err(
        &clients,
        "create_index",
        json!({
            "databaseId": "db",
            "collectionId": "col",
            "key": "k",
            "type": "spatial",
            "attributes": ["a"]
        }),
    )
    .await;
    assert!(matches!(err, McpError::InvalidArg { .. }));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Transport
// =============================================================================

#[tokio::test]
async fn test_requests_carry_project_and_key() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/main"))
        .and(header("X-Appwrite-Project", PROJECT))
        .and(header("X-Appwrite-Key", KEY))
        .respond_with(ok(json!({"$id": "main", "name": "Main"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(&clients, "get_database", json!({"databaseId": "main"})).await;
    assert_eq!(result["name"], "Main");
}

#[tokio::test]
async fn test_list_passes_queries_and_search() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path("/v1/users"))
        .and(query_param("queries[]", "limit(5)"))
        .and(query_param("search", "ada"))
        .respond_with(ok(json!({"total": 0, "users": []})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "list_users",
        json!({"queries": ["limit(5)"], "search": "ada"}),
    )
    .await;
    assert_eq!(result["total"], 0);
}

#[tokio::test]
async fn test_backend_error_message_is_forwarded() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/missing", DOCS)))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let err = call_tool_err(
        &clients,
        "get_document",
        json!({"databaseId": "db", "collectionId": "col", "documentId": "missing"}),
    )
    .await;
    assert_eq!(
        err.to_string(),
        "Document with the requested ID could not be found."
    );
}

// =============================================================================
// ID generation
// =============================================================================

#[tokio::test]
async fn test_create_generates_distinct_ids() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases"))
        .respond_with(ok(json!({"$id": "generated"})))
        .expect(2)
        .mount(&server)
        .await;

    call_tool(&clients, "create_database", json!({"name": "One"})).await;
    call_tool(&clients, "create_database", json!({"name": "Two", "databaseId": "unique()"})).await;

    let ids: Vec<String> = bodies(&server, "/v1/databases")
        .await
        .iter()
        .map(|b| b["databaseId"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ids.len(), 2);
    assert!(ids.iter().all(|id| !id.is_empty() && id != "unique()"));
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn test_create_keeps_explicit_id() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases"))
        .and(body_json(json!({"databaseId": "main", "name": "Main"})))
        .respond_with(ok(json!({"$id": "main"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "create_database",
        json!({"databaseId": "main", "name": "Main"}),
    )
    .await;
    assert_eq!(result["$id"], "main");
}

// =============================================================================
// Bulk documents
// =============================================================================

#[tokio::test]
async fn test_create_documents_in_order() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .respond_with(ok(json!({"$id": "doc"})))
        .expect(3)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "create_documents",
        json!({
            "databaseId": "db",
            "collectionId": "col",
            "documents": [{"n": "A"}, {"n": "B"}, {"n": "C"}]
        }),
    )
    .await;
    assert_eq!(result["success"], true);
    assert_eq!(result["created"], 3);
    assert_eq!(result["documents"].as_array().unwrap().len(), 3);

    let sent = bodies(&server, DOCS).await;
    let order: Vec<&str> = sent.iter().map(|b| b["data"]["n"].as_str().unwrap()).collect();
    assert_eq!(order, vec!["A", "B", "C"]);

    let ids: HashSet<&str> = sent.iter().map(|b| b["documentId"].as_str().unwrap()).collect();
    assert_eq!(ids.len(), 3);
}

#[tokio::test]
async fn test_create_documents_stops_at_first_failure() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .respond_with(ok(json!({"$id": "first"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid document structure",
            "code": 400,
            "type": "document_invalid_structure"
        })))
        .mount(&server)
        .await;

    let err = call_tool_err(
        &clients,
        "create_documents",
        json!({
            "databaseId": "db",
            "collectionId": "col",
            "documents": [{"n": "A"}, {"n": "B"}, {"n": "C"}]
        }),
    )
    .await;
    assert_eq!(err.to_string(), "Invalid document structure");

    // A was created and stays; C was never attempted; nothing was deleted.
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.method.as_str() == "POST"));
}

#[tokio::test]
async fn test_update_documents_first_page() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(DOCS))
        .and(query_param("queries[]", "equal(\"status\", [\"draft\"])"))
        .respond_with(ok(json!({
            "total": 2,
            "documents": [{"$id": "d1"}, {"$id": "d2"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    for id in ["d1", "d2"] {
        Mock::given(method("PATCH"))
            .and(path(format!("{}/{}", DOCS, id)))
            .and(body_json(json!({"data": {"status": "published"}})))
            .respond_with(ok(json!({"$id": id})))
            .expect(1)
            .mount(&server)
            .await;
    }

    let result = call_tool(
        &clients,
        "update_documents",
        json!({
            "databaseId": "db",
            "collectionId": "col",
            "queries": ["equal(\"status\", [\"draft\"])"],
            "data": {"status": "published"}
        }),
    )
    .await;
    assert_eq!(result, json!({"success": true, "updated": 2}));
}

#[tokio::test]
async fn test_delete_documents_requires_queries() {
    let (server, clients) = backend().await;
    let err = call_tool_err(
        &clients,
        "delete_documents",
        json!({"databaseId": "db", "collectionId": "col"}),
    )
    .await;
    assert!(matches!(err, McpError::InvalidArg { .. }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_delete_documents() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(DOCS))
        .respond_with(ok(json!({"total": 1, "documents": [{"$id": "old"}]})))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("{}/old", DOCS)))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "delete_documents",
        json!({"databaseId": "db", "collectionId": "col", "queries": ["limit(1)"]}),
    )
    .await;
    assert_eq!(result, json!({"success": true, "deleted": 1}));
}

// =============================================================================
// Upsert and increment
// =============================================================================

#[tokio::test]
async fn test_upsert_creates_missing_document() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/p1", DOCS)))
        .respond_with(not_found())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .and(body_json(json!({"documentId": "p1", "data": {"x": 1}})))
        .respond_with(ok(json!({"$id": "p1", "x": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "upsert_document",
        json!({"databaseId": "db", "collectionId": "col", "documentId": "p1", "data": {"x": 1}}),
    )
    .await;
    assert_eq!(result["$id"], "p1");
}

#[tokio::test]
async fn test_upsert_updates_existing_document() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/p1", DOCS)))
        .respond_with(ok(json!({"$id": "p1", "x": 1})))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/p1", DOCS)))
        .and(body_json(json!({"data": {"x": 2}})))
        .respond_with(ok(json!({"$id": "p1", "x": 2})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(DOCS))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "upsert_document",
        json!({"databaseId": "db", "collectionId": "col", "documentId": "p1", "data": {"x": 2}}),
    )
    .await;
    assert_eq!(result["x"], 2);
}

async fn increment(existing: JsonValue, by: JsonValue, expected: JsonValue) {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path(format!("{}/c1", DOCS)))
        .respond_with(ok(existing))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("{}/c1", DOCS)))
        .and(body_json(json!({"data": {"count": expected}})))
        .respond_with(ok(json!({"$id": "c1", "count": expected})))
        .expect(1)
        .mount(&server)
        .await;

    let mut args = json!({
        "databaseId": "db",
        "collectionId": "col",
        "documentId": "c1",
        "attribute": "count"
    });
    if !by.is_null() {
        args["value"] = by;
    }
    let result = call_tool(&clients, "increment_document_attribute", args).await;
    assert_eq!(result["count"], expected);
}

#[tokio::test]
async fn test_increment_from_absent() {
    increment(json!({"$id": "c1"}), json!(5), json!(5)).await;
}

#[tokio::test]
async fn test_increment_negative() {
    increment(json!({"$id": "c1", "count": 5}), json!(-3), json!(2)).await;
}

#[tokio::test]
async fn test_increment_defaults_to_one() {
    increment(json!({"$id": "c1", "count": 41}), JsonValue::Null, json!(42)).await;
}

#[tokio::test]
async fn test_increment_honors_explicit_zero() {
    increment(json!({"$id": "c1", "count": 7}), json!(0), json!(7)).await;
}

// =============================================================================
// Attributes
// =============================================================================

#[tokio::test]
async fn test_point_attribute_error_carries_body() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/db/collections/col/attributes/point"))
        .respond_with(ResponseTemplate::new(400).set_body_string("geo attributes disabled"))
        .mount(&server)
        .await;

    let err = call_tool_err(
        &clients,
        "create_point_attribute",
        json!({"databaseId": "db", "collectionId": "col", "key": "loc", "required": false}),
    )
    .await;
    assert_eq!(
        err.to_string(),
        "Failed to create point attribute: geo attributes disabled"
    );
}

#[tokio::test]
async fn test_update_integer_attribute_fills_bounds() {
    let (server, clients) = backend().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/databases/db/collections/col/attributes/integer/age"))
        .and(body_json(json!({
            "required": false,
            "min": -9_007_199_254_740_991_i64,
            "max": 9_007_199_254_740_991_i64,
            "default": null
        })))
        .respond_with(ok(json!({"key": "age"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "update_integer_attribute",
        json!({"databaseId": "db", "collectionId": "col", "key": "age", "required": false}),
    )
    .await;
    assert_eq!(result["key"], "age");
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_all_survives_failing_probe() {
    let (server, clients) = backend().await;
    for probe in ["/v1/health", "/v1/health/db", "/v1/health/storage", "/v1/health/time"] {
        Mock::given(method("GET"))
            .and(path(probe))
            .respond_with(ok(json!({"status": "pass"})))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/v1/health/cache"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "message": "Cache unavailable",
            "code": 503,
            "type": "general_server_error"
        })))
        .mount(&server)
        .await;

    let result = call_tool(&clients, "get_health_all", json!({})).await;
    for key in ["http", "db", "storage", "time"] {
        assert_eq!(result[key]["status"], "pass", "{}", key);
    }
    assert_eq!(
        result["cache"],
        json!({"status": "error", "message": "Cache unavailable"})
    );
}

// =============================================================================
// GraphQL
// =============================================================================

#[tokio::test]
async fn test_graphql_forwards_body() {
    let (server, clients) = backend().await;
    let query = "query($id: String!) { usersGet(userId: $id) { name } }";
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .and(body_json(json!({"query": query, "variables": {"id": "u1"}})))
        .respond_with(ok(json!({"data": {"usersGet": {"name": "Ada"}}})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "graphql_query",
        json!({"query": query, "variables": {"id": "u1"}}),
    )
    .await;
    assert_eq!(result["data"]["usersGet"]["name"], "Ada");
}

#[tokio::test]
async fn test_graphql_error_body() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path("/v1/graphql"))
        .respond_with(ResponseTemplate::new(400).set_body_string("Syntax Error: Unexpected Name"))
        .mount(&server)
        .await;

    let err =
        call_tool_err(&clients, "graphql_mutation", json!({"query": "mutation { oops"})).await;
    assert_eq!(err.to_string(), "GraphQL error: Syntax Error: Unexpected Name");
    assert_eq!(
        bodies(&server, "/v1/graphql").await,
        vec![json!({"query": "mutation { oops"})]
    );
}

// =============================================================================
// Users, storage, avatars
// =============================================================================

#[tokio::test]
async fn test_update_user_skips_empty_fields() {
    let (server, clients) = backend().await;
    Mock::given(method("PATCH"))
        .and(path("/v1/users/u1/email"))
        .and(body_json(json!({"email": "ada@example.com"})))
        .respond_with(ok(json!({"$id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/v1/users/u1/phone"))
        .and(body_json(json!({"number": "+15550100"})))
        .respond_with(ok(json!({"$id": "u1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "update_user",
        json!({"userId": "u1", "email": "ada@example.com", "name": "", "phone": "+15550100"}),
    )
    .await;
    assert_eq!(
        result,
        json!({"success": true, "updated": ["email", "phone"], "userId": "u1"})
    );
}

#[tokio::test]
async fn test_delete_user_sessions() {
    let (server, clients) = backend().await;
    Mock::given(method("DELETE"))
        .and(path("/v1/users/u1/sessions"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(&clients, "delete_user_sessions", json!({"userId": "u1"})).await;
    assert_eq!(result["message"], "All sessions for user u1 deleted");
}

#[tokio::test]
async fn test_get_file_url_makes_no_request() {
    let (server, clients) = backend().await;
    let result = call_tool(
        &clients,
        "get_file_url",
        json!({"bucketId": "b1", "fileId": "f1", "type": "view"}),
    )
    .await;
    assert_eq!(result["type"], "view");
    assert_eq!(
        result["url"],
        format!(
            "{}/v1/storage/buckets/b1/files/f1/view?project={}",
            server.uri(),
            PROJECT
        )
    );

    let result =
        call_tool(&clients, "get_file_url", json!({"bucketId": "b1", "fileId": "f1"})).await;
    assert_eq!(result["type"], "download");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_avatar_is_base64() {
    let (server, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path("/v1/avatars/initials"))
        .and(query_param("name", "Ada Lovelace"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .mount(&server)
        .await;

    let result = call_tool(&clients, "get_avatar_initials", json!({"name": "Ada Lovelace"})).await;
    assert_eq!(result["type"], "image");
    assert_eq!(result["description"], "Initials avatar for Ada Lovelace");
    assert_eq!(result["data"], "UE5H");
}

#[tokio::test]
async fn test_unknown_browser_code_rejected() {
    let (server, clients) = backend().await;
    let err = call_tool_err(&clients, "get_browser_icon", json!({"code": "netscape"})).await;
    assert!(matches!(err, McpError::InvalidArg { .. }));
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Uploads
// =============================================================================

const FILES: &str = "/v1/storage/buckets/b1/files";
const CHUNK: usize = 5 * 1024 * 1024;

fn header_value(request: &wiremock::Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[tokio::test]
async fn test_create_file_single_request() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path(FILES))
        .respond_with(ok(json!({"$id": "notes", "name": "notes.txt"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "create_file",
        json!({
            "bucketId": "b1",
            "fileId": "notes",
            "fileName": "notes.txt",
            "fileContent": BASE64.encode(b"hello world"),
            "permissions": ["read(\"any\")"]
        }),
    )
    .await;
    assert_eq!(result["$id"], "notes");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(header_value(request, "content-range"), None);
    assert_eq!(header_value(request, "x-appwrite-id"), None);
    assert!(contains(&request.body, b"hello world"));
    assert!(contains(&request.body, b"notes.txt"));
    assert!(contains(&request.body, b"permissions[]"));
}

#[tokio::test]
async fn test_create_file_uploads_in_chunks() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path(FILES))
        .respond_with(ok(json!({"$id": "srv-id", "chunksUploaded": 1})))
        .expect(2)
        .mount(&server)
        .await;

    let total = CHUNK + 10;
    let payload = vec![b'a'; total];
    let result = call_tool(
        &clients,
        "create_file",
        json!({
            "bucketId": "b1",
            "fileName": "big.bin",
            "fileContent": BASE64.encode(&payload)
        }),
    )
    .await;
    assert_eq!(result["$id"], "srv-id");

    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
    assert_eq!(
        header_value(&requests[0], "content-range"),
        Some(format!("bytes 0-{}/{}", CHUNK - 1, total))
    );
    assert_eq!(header_value(&requests[0], "x-appwrite-id"), None);
    assert_eq!(
        header_value(&requests[1], "content-range"),
        Some(format!("bytes {}-{}/{}", CHUNK, total - 1, total))
    );
    assert_eq!(
        header_value(&requests[1], "x-appwrite-id"),
        Some("srv-id".to_string())
    );
}

#[tokio::test]
async fn test_create_deployment_decodes_code() {
    let (server, clients) = backend().await;
    Mock::given(method("POST"))
        .and(path("/v1/functions/fn1/deployments"))
        .respond_with(ok(json!({"$id": "dep1"})))
        .expect(1)
        .mount(&server)
        .await;

    let result = call_tool(
        &clients,
        "create_deployment",
        json!({
            "functionId": "fn1",
            "code": BASE64.encode(b"tarball-bytes"),
            "activate": true,
            "entrypoint": "index.js"
        }),
    )
    .await;
    assert_eq!(result["$id"], "dep1");

    let requests = server.received_requests().await.unwrap_or_default();
    let body = &requests[0].body;
    assert!(contains(body, b"tarball-bytes"));
    assert!(contains(body, b"code.tar.gz"));
    assert!(contains(body, b"index.js"));
}

#[tokio::test]
async fn test_invalid_base64_rejected() {
    let (server, clients) = backend().await;
    let err = call_tool_err(
        &clients,
        "create_file",
        json!({"bucketId": "b1", "fileName": "a.txt", "fileContent": "not base64!"}),
    )
    .await;
    assert!(matches!(err, McpError::InvalidArg { .. }));

    let err = call_tool_err(
        &clients,
        "create_deployment",
        json!({"functionId": "fn1", "code": "%%%", "activate": false}),
    )
    .await;
    assert!(matches!(err, McpError::InvalidArg { .. }));

    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

// =============================================================================
// Server
// =============================================================================

fn request(value: JsonValue) -> JsonRpcRequest {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_server_tools_list() {
    let (_backend, clients) = backend().await;
    let server = McpServer::new(ToolRegistry::new().unwrap(), clients);

    let response = server
        .handle_request(request(json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})))
        .await
        .unwrap();
    let tools = &response.result.unwrap()["tools"];
    assert_eq!(tools.as_array().unwrap().len(), 143);
    assert!(tools[0]["inputSchema"].is_object());
}

#[tokio::test]
async fn test_server_tools_call_envelopes() {
    let (backend, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path("/v1/locale/continents"))
        .respond_with(ok(json!({"total": 1, "continents": [{"name": "Europe", "code": "EU"}]})))
        .mount(&backend)
        .await;
    let server = McpServer::new(ToolRegistry::new().unwrap(), clients);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 2,
            "method": "tools/call",
            "params": {"name": "list_continents"}
        })))
        .await
        .unwrap();
    let result = response.result.unwrap();
    assert!(result.get("isError").is_none());
    let text = result["content"][0]["text"].as_str().unwrap();
    assert!(text.contains('\n'));
    let parsed: JsonValue = serde_json::from_str(text).unwrap();
    assert_eq!(parsed["continents"][0]["code"], "EU");

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "method": "tools/call",
            "params": {"name": "no_such_tool", "arguments": {}}
        })))
        .await
        .unwrap();
    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(result["content"][0]["text"], "Error: Unknown tool: no_such_tool");

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 4,
            "method": "tools/call",
            "params": {"name": "list_continents", "arguments": "nope"}
        })))
        .await
        .unwrap();
    assert_eq!(response.error.unwrap().code, rpc_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_server_backend_failure_is_tool_error() {
    let (backend, clients) = backend().await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Database not found",
            "code": 404,
            "type": "database_not_found"
        })))
        .mount(&backend)
        .await;
    let server = McpServer::new(ToolRegistry::new().unwrap(), clients);

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 5,
            "method": "tools/call",
            "params": {"name": "get_database", "arguments": {"databaseId": "gone"}}
        })))
        .await
        .unwrap();
    assert!(response.error.is_none());
    let result = response.result.unwrap();
    assert_eq!(result["isError"], true);
    assert_eq!(result["content"][0]["text"], "Error: Database not found");

    let response = server
        .handle_request(request(json!({
            "jsonrpc": "2.0",
            "id": 6,
            "method": "tools/call",
            "params": {"name": "get_database", "arguments": {}}
        })))
        .await
        .unwrap();
    assert!(response.error.is_none());
    assert_eq!(response.result.unwrap()["isError"], true);
}
