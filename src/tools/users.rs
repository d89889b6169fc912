//! User tools: accounts, preferences, sessions, memberships, logs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{ack, deleted, ensure_id, parse_call, to_body, ListArgs};
use crate::error::Result;
use crate::schema;

/// Get all user tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "create_user",
            "Create a new user",
            schema!(object {
                optional: {
                    "userId": string => "Unique user ID. Use 'unique()' for auto-generation",
                    "email": string => "User email",
                    "phone": string => "User phone number",
                    "password": string => "User password",
                    "name": string => "User name"
                }
            }),
        ),
        ToolDef::new(
            "get_user",
            "Get user by ID",
            schema!(object {
                required: { "userId": string => "User ID" }
            }),
        ),
        ToolDef::new(
            "list_users",
            "List all users",
            schema!(object {
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_user",
            "Update user properties (email, name, password, phone)",
            schema!(object {
                required: { "userId": string => "User ID" },
                optional: {
                    "email": string => "New email address",
                    "name": string => "New name",
                    "password": string => "New password",
                    "phone": string => "New phone number"
                }
            }),
        ),
        ToolDef::new(
            "update_user_labels",
            "Update user labels",
            schema!(object {
                required: {
                    "userId": string => "User ID",
                    "labels": array_string => "Array of user labels"
                }
            }),
        ),
        ToolDef::new(
            "update_user_status",
            "Update user status (enable/disable)",
            schema!(object {
                required: {
                    "userId": string => "User ID",
                    "status": boolean => "User status (true = active, false = blocked)"
                }
            }),
        ),
        ToolDef::new(
            "update_user_prefs",
            "Update user preferences",
            schema!(object {
                required: {
                    "userId": string => "User ID",
                    "prefs": object => "User preferences as JSON object"
                }
            }),
        ),
        ToolDef::new(
            "get_user_prefs",
            "Get user preferences",
            schema!(object {
                required: { "userId": string => "User ID" }
            }),
        ),
        ToolDef::new(
            "delete_user",
            "Delete user by ID",
            schema!(object {
                required: { "userId": string => "User ID" }
            }),
        ),
        ToolDef::new(
            "list_user_sessions",
            "List all sessions for a user",
            schema!(object {
                required: { "userId": string => "User ID" }
            }),
        ),
        ToolDef::new(
            "delete_user_sessions",
            "Delete user sessions (specific or all)",
            schema!(object {
                required: { "userId": string => "User ID" },
                optional: {
                    "sessionId": string => "Session ID (omit to delete all sessions)"
                }
            }),
        ),
        ToolDef::new(
            "list_user_memberships",
            "List all team memberships for a user",
            schema!(object {
                required: { "userId": string => "User ID" }
            }),
        ),
        ToolDef::new(
            "list_user_logs",
            "List user activity logs",
            schema!(object {
                required: { "userId": string => "User ID" },
                optional: { "queries": array_string => "Query strings for filtering" }
            }),
        ),
    ]
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateUserArgs {
    user_id: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    password: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserRef {
    user_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateUserArgs {
    user_id: String,
    email: Option<String>,
    name: Option<String>,
    password: Option<String>,
    phone: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LabelsArgs {
    user_id: String,
    labels: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusArgs {
    user_id: String,
    status: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PrefsArgs {
    user_id: String,
    prefs: Map<String, JsonValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteSessionsArgs {
    user_id: String,
    session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LogsArgs {
    user_id: String,
    queries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum UserCall {
    CreateUser(CreateUserArgs),
    GetUser(UserRef),
    ListUsers(ListArgs),
    UpdateUser(UpdateUserArgs),
    UpdateUserLabels(LabelsArgs),
    UpdateUserStatus(StatusArgs),
    UpdateUserPrefs(PrefsArgs),
    GetUserPrefs(UserRef),
    DeleteUser(UserRef),
    ListUserSessions(UserRef),
    DeleteUserSessions(DeleteSessionsArgs),
    ListUserMemberships(UserRef),
    ListUserLogs(LogsArgs),
}

/// Dispatch a user tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let users = clients.users()?;

    match parse_call::<UserCall>(name, args)? {
        UserCall::CreateUser(mut args) => {
            ensure_id(&mut args.user_id);
            users.create(to_body(&args)?).await
        }
        UserCall::GetUser(args) => users.get(&args.user_id).await,
        UserCall::ListUsers(args) => users.list(args.queries(), args.search()).await,
        UserCall::UpdateUser(args) => {
            let user_id = args.user_id.as_str();
            let mut updated = Vec::new();

            if let Some(email) = non_empty(&args.email) {
                users.update_email(user_id, email).await?;
                updated.push("email");
            }
            if let Some(name) = non_empty(&args.name) {
                users.update_name(user_id, name).await?;
                updated.push("name");
            }
            if let Some(password) = non_empty(&args.password) {
                users.update_password(user_id, password).await?;
                updated.push("password");
            }
            if let Some(phone) = non_empty(&args.phone) {
                users.update_phone(user_id, phone).await?;
                updated.push("phone");
            }

            Ok(json!({ "success": true, "updated": updated, "userId": user_id }))
        }
        UserCall::UpdateUserLabels(args) => users.update_labels(&args.user_id, &args.labels).await,
        UserCall::UpdateUserStatus(args) => users.update_status(&args.user_id, args.status).await,
        UserCall::UpdateUserPrefs(args) => {
            users
                .update_prefs(&args.user_id, &JsonValue::Object(args.prefs))
                .await
        }
        UserCall::GetUserPrefs(args) => users.get_prefs(&args.user_id).await,
        UserCall::DeleteUser(args) => {
            users.delete(&args.user_id).await?;
            Ok(deleted("User", &args.user_id))
        }
        UserCall::ListUserSessions(args) => users.list_sessions(&args.user_id).await,
        UserCall::DeleteUserSessions(args) => match non_empty(&args.session_id) {
            Some(session_id) => {
                users.delete_session(&args.user_id, session_id).await?;
                Ok(deleted("Session", session_id))
            }
            None => {
                users.delete_sessions(&args.user_id).await?;
                Ok(ack(format!("All sessions for user {} deleted", args.user_id)))
            }
        },
        UserCall::ListUserMemberships(args) => users.list_memberships(&args.user_id).await,
        UserCall::ListUserLogs(args) => {
            users
                .list_logs(&args.user_id, args.queries.as_deref())
                .await
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 13);
    }

    #[test]
    fn test_create_user_body_generates_id() {
        let mut map = Map::new();
        map.insert("email".into(), json!("a@example.com"));
        match parse_call::<UserCall>("create_user", map).unwrap() {
            UserCall::CreateUser(mut args) => {
                let id = ensure_id(&mut args.user_id);
                let body = to_body(&args).unwrap();
                assert_eq!(body["userId"], json!(id));
                assert_eq!(body["email"], "a@example.com");
                assert!(body.get("phone").is_none());
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(&Some("x".into())), Some("x"));
        assert_eq!(non_empty(&Some(String::new())), None);
        assert_eq!(non_empty(&None), None);
    }
}
