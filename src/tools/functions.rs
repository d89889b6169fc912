//! Function tools: functions, executions, variables, deployments, runtimes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{decode_base64, deleted, ensure_id, parse_call, to_body, ListArgs, NoArgs};
use crate::error::Result;
use crate::schema;

/// Get all function tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "create_function",
            "Create a new serverless function",
            schema!(object {
                required: {
                    "name": string => "Function name",
                    "runtime": string => "Runtime environment (e.g., 'node-18.0', 'python-3.9')"
                },
                optional: {
                    "functionId": string => "Unique function ID. Use 'unique()' for auto-generation",
                    "execute": array_string => "Execution permissions",
                    "events": array_string => "Events that trigger the function",
                    "schedule": string => "Cron schedule for automatic execution",
                    "timeout": integer => "Execution timeout in seconds",
                    "enabled": boolean => "Enable function",
                    "logging": boolean => "Enable logging",
                    "entrypoint": string => "Entrypoint file",
                    "commands": string => "Build commands",
                    "scopes": array_string => "Function scopes"
                }
            }),
        ),
        ToolDef::new(
            "get_function",
            "Get function by ID",
            schema!(object {
                required: { "functionId": string => "Function ID" }
            }),
        ),
        ToolDef::new(
            "list_functions",
            "List all functions",
            schema!(object {
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_function",
            "Update function by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "name": string => "Function name"
                },
                optional: {
                    "runtime": string => "Runtime environment",
                    "execute": array_string => "Execution permissions",
                    "events": array_string => "Events that trigger the function",
                    "schedule": string => "Cron schedule",
                    "timeout": integer => "Execution timeout in seconds",
                    "enabled": boolean => "Enable function",
                    "logging": boolean => "Enable logging",
                    "entrypoint": string => "Entrypoint file",
                    "commands": string => "Build commands",
                    "scopes": array_string => "Function scopes"
                }
            }),
        ),
        ToolDef::new(
            "delete_function",
            "Delete function by ID",
            schema!(object {
                required: { "functionId": string => "Function ID" }
            }),
        ),
        ToolDef::new(
            "create_execution",
            "Execute a function",
            schema!(object {
                required: { "functionId": string => "Function ID" },
                optional: {
                    "body": string => "Request body (string or JSON string)",
                    "async": boolean => "Execute asynchronously",
                    "path": string => "Request path",
                    "method": (one_of "GET", "POST", "PUT", "PATCH", "DELETE") => "HTTP method",
                    "headers": object => "Request headers",
                    "scheduledAt": string => "Scheduled execution time (ISO 8601)"
                }
            }),
        ),
        ToolDef::new(
            "get_execution",
            "Get execution result by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "executionId": string => "Execution ID"
                }
            }),
        ),
        ToolDef::new(
            "list_executions",
            "List all executions for a function",
            schema!(object {
                required: { "functionId": string => "Function ID" },
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "delete_execution",
            "Delete execution by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "executionId": string => "Execution ID"
                }
            }),
        ),
        ToolDef::new(
            "create_variable",
            "Create a function environment variable",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "key": string => "Variable key",
                    "value": string => "Variable value"
                }
            }),
        ),
        ToolDef::new(
            "get_variable",
            "Get variable by key",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "variableId": string => "Variable ID"
                }
            }),
        ),
        ToolDef::new(
            "list_variables",
            "List all variables for a function",
            schema!(object {
                required: { "functionId": string => "Function ID" }
            }),
        ),
        ToolDef::new(
            "update_variable",
            "Update variable by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "variableId": string => "Variable ID",
                    "key": string => "Variable key"
                },
                optional: { "value": string => "Variable value" }
            }),
        ),
        ToolDef::new(
            "delete_variable",
            "Delete variable by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "variableId": string => "Variable ID"
                }
            }),
        ),
        ToolDef::new(
            "create_deployment",
            "Create a new function deployment (upload code). Provide code as base64-encoded tar.gz file.",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "code": string => "Base64-encoded tar.gz file containing function code",
                    "activate": boolean => "Activate deployment after creation"
                },
                optional: {
                    "entrypoint": string => "Entrypoint file (e.g., 'index.js')",
                    "commands": string => "Build commands"
                }
            }),
        ),
        ToolDef::new(
            "get_deployment",
            "Get deployment by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "deploymentId": string => "Deployment ID"
                }
            }),
        ),
        ToolDef::new(
            "list_deployments",
            "List all deployments for a function",
            schema!(object {
                required: { "functionId": string => "Function ID" },
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_deployment",
            "Update function deployment (activate a specific deployment)",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "deploymentId": string => "Deployment ID to activate"
                }
            }),
        ),
        ToolDef::new(
            "delete_deployment",
            "Delete deployment by ID",
            schema!(object {
                required: {
                    "functionId": string => "Function ID",
                    "deploymentId": string => "Deployment ID"
                }
            }),
        ),
        ToolDef::new(
            "list_runtimes",
            "List all available function runtimes",
            schema!(object {}),
        ),
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum ExecutionMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFunctionArgs {
    function_id: Option<String>,
    name: String,
    runtime: String,
    execute: Option<Vec<String>>,
    events: Option<Vec<String>>,
    schedule: Option<String>,
    timeout: Option<u64>,
    enabled: Option<bool>,
    logging: Option<bool>,
    entrypoint: Option<String>,
    commands: Option<String>,
    scopes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFunctionArgs {
    #[serde(skip_serializing)]
    function_id: String,
    name: String,
    runtime: Option<String>,
    execute: Option<Vec<String>>,
    events: Option<Vec<String>>,
    schedule: Option<String>,
    timeout: Option<u64>,
    enabled: Option<bool>,
    logging: Option<bool>,
    entrypoint: Option<String>,
    commands: Option<String>,
    scopes: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionRef {
    function_id: String,
}

/// A function plus `queries` / `search`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FunctionList {
    function_id: String,
    #[serde(flatten)]
    list: ListArgs,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateExecutionArgs {
    #[serde(skip_serializing)]
    function_id: String,
    body: Option<String>,
    #[serde(rename = "async")]
    is_async: Option<bool>,
    path: Option<String>,
    method: Option<ExecutionMethod>,
    headers: Option<HashMap<String, String>>,
    scheduled_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionRef {
    function_id: String,
    execution_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateVariableArgs {
    #[serde(skip_serializing)]
    function_id: String,
    key: String,
    value: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariableRef {
    function_id: String,
    variable_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateVariableArgs {
    #[serde(skip_serializing)]
    function_id: String,
    #[serde(skip_serializing)]
    variable_id: String,
    key: String,
    value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDeploymentArgs {
    function_id: String,
    code: String,
    activate: bool,
    entrypoint: Option<String>,
    commands: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeploymentRef {
    function_id: String,
    deployment_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum FunctionCall {
    CreateFunction(CreateFunctionArgs),
    GetFunction(FunctionRef),
    ListFunctions(ListArgs),
    UpdateFunction(UpdateFunctionArgs),
    DeleteFunction(FunctionRef),
    CreateExecution(CreateExecutionArgs),
    GetExecution(ExecutionRef),
    ListExecutions(FunctionList),
    DeleteExecution(ExecutionRef),
    CreateVariable(CreateVariableArgs),
    GetVariable(VariableRef),
    ListVariables(FunctionRef),
    UpdateVariable(UpdateVariableArgs),
    DeleteVariable(VariableRef),
    CreateDeployment(CreateDeploymentArgs),
    GetDeployment(DeploymentRef),
    ListDeployments(FunctionList),
    UpdateDeployment(DeploymentRef),
    DeleteDeployment(DeploymentRef),
    ListRuntimes(NoArgs),
}

/// Dispatch a function tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let functions = clients.functions()?;

    match parse_call::<FunctionCall>(name, args)? {
        FunctionCall::CreateFunction(mut args) => {
            ensure_id(&mut args.function_id);
            functions.create(to_body(&args)?).await
        }
        FunctionCall::GetFunction(args) => functions.get(&args.function_id).await,
        FunctionCall::ListFunctions(args) => functions.list(args.queries(), args.search()).await,
        FunctionCall::UpdateFunction(args) => {
            functions.update(&args.function_id, to_body(&args)?).await
        }
        FunctionCall::DeleteFunction(args) => {
            functions.delete(&args.function_id).await?;
            Ok(deleted("Function", &args.function_id))
        }

        FunctionCall::CreateExecution(args) => {
            functions
                .create_execution(&args.function_id, to_body(&args)?)
                .await
        }
        FunctionCall::GetExecution(args) => {
            functions
                .get_execution(&args.function_id, &args.execution_id)
                .await
        }
        FunctionCall::ListExecutions(args) => {
            functions
                .list_executions(&args.function_id, args.list.queries(), args.list.search())
                .await
        }
        FunctionCall::DeleteExecution(args) => {
            functions
                .delete_execution(&args.function_id, &args.execution_id)
                .await?;
            Ok(deleted("Execution", &args.execution_id))
        }

        FunctionCall::CreateVariable(args) => {
            functions
                .create_variable(&args.function_id, to_body(&args)?)
                .await
        }
        FunctionCall::GetVariable(args) => {
            functions
                .get_variable(&args.function_id, &args.variable_id)
                .await
        }
        FunctionCall::ListVariables(args) => functions.list_variables(&args.function_id).await,
        FunctionCall::UpdateVariable(args) => {
            functions
                .update_variable(&args.function_id, &args.variable_id, to_body(&args)?)
                .await
        }
        FunctionCall::DeleteVariable(args) => {
            functions
                .delete_variable(&args.function_id, &args.variable_id)
                .await?;
            Ok(deleted("Variable", &args.variable_id))
        }

        FunctionCall::CreateDeployment(args) => {
            let code = decode_base64("code", &args.code)?;
            functions
                .create_deployment(
                    &args.function_id,
                    code,
                    args.activate,
                    args.entrypoint.as_deref(),
                    args.commands.as_deref(),
                )
                .await
        }
        FunctionCall::GetDeployment(args) => {
            functions
                .get_deployment(&args.function_id, &args.deployment_id)
                .await
        }
        FunctionCall::ListDeployments(args) => {
            functions
                .list_deployments(&args.function_id, args.list.queries(), args.list.search())
                .await
        }
        FunctionCall::UpdateDeployment(args) => {
            functions
                .update_deployment(&args.function_id, &args.deployment_id)
                .await
        }
        FunctionCall::DeleteDeployment(args) => {
            functions
                .delete_deployment(&args.function_id, &args.deployment_id)
                .await?;
            Ok(deleted("Deployment", &args.deployment_id))
        }

        FunctionCall::ListRuntimes(_) => functions.list_runtimes().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 20);
    }

    #[test]
    fn test_execution_body() {
        let mut map = Map::new();
        map.insert("functionId".into(), json!("fn"));
        map.insert("async".into(), json!(true));
        map.insert("method".into(), json!("PATCH"));
        map.insert("headers".into(), json!({"x-trace": "1"}));

        match parse_call::<FunctionCall>("create_execution", map).unwrap() {
            FunctionCall::CreateExecution(a) => assert_eq!(
                to_body(&a).unwrap(),
                json!({"async": true, "method": "PATCH", "headers": {"x-trace": "1"}})
            ),
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_method() {
        let mut map = Map::new();
        map.insert("functionId".into(), json!("fn"));
        map.insert("method".into(), json!("TRACE"));
        assert!(parse_call::<FunctionCall>("create_execution", map).is_err());
    }
}
