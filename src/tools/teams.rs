//! Team tools: teams, preferences, memberships.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{deleted, ensure_id, parse_call, to_body, ListArgs};
use crate::error::Result;
use crate::schema;

/// Get all team tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "create_team",
            "Create a new team",
            schema!(object {
                required: { "name": string => "Team name" },
                optional: {
                    "teamId": string => "Unique team ID. Use 'unique()' for auto-generation",
                    "roles": array_string => "Array of roles"
                }
            }),
        ),
        ToolDef::new(
            "get_team",
            "Get team by ID",
            schema!(object {
                required: { "teamId": string => "Team ID" }
            }),
        ),
        ToolDef::new(
            "list_teams",
            "List all teams",
            schema!(object {
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_team",
            "Update team by ID",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "name": string => "New team name"
                }
            }),
        ),
        ToolDef::new(
            "delete_team",
            "Delete team by ID",
            schema!(object {
                required: { "teamId": string => "Team ID" }
            }),
        ),
        ToolDef::new(
            "update_team_prefs",
            "Update team preferences",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "prefs": object => "Team preferences as JSON object"
                }
            }),
        ),
        ToolDef::new(
            "create_membership",
            "Create a new team membership (invite user)",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "roles": array_string => "Array of roles for the member"
                },
                optional: {
                    "email": string => "User email (for email invitation)",
                    "userId": string => "User ID (for direct membership)",
                    "phone": string => "User phone (for SMS invitation)",
                    "url": string => "URL to redirect after accepting invitation",
                    "name": string => "User name"
                }
            }),
        ),
        ToolDef::new(
            "get_membership",
            "Get team membership by ID",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "membershipId": string => "Membership ID"
                }
            }),
        ),
        ToolDef::new(
            "list_memberships",
            "List all memberships for a team",
            schema!(object {
                required: { "teamId": string => "Team ID" },
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_membership",
            "Update team membership roles",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "membershipId": string => "Membership ID",
                    "roles": array_string => "New roles for the member"
                }
            }),
        ),
        ToolDef::new(
            "delete_membership",
            "Delete team membership",
            schema!(object {
                required: {
                    "teamId": string => "Team ID",
                    "membershipId": string => "Membership ID"
                }
            }),
        ),
    ]
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTeamArgs {
    team_id: Option<String>,
    name: String,
    roles: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamRef {
    team_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTeamArgs {
    team_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TeamPrefsArgs {
    team_id: String,
    prefs: Map<String, JsonValue>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMembershipArgs {
    #[serde(skip_serializing)]
    team_id: String,
    roles: Vec<String>,
    email: Option<String>,
    user_id: Option<String>,
    phone: Option<String>,
    url: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MembershipRef {
    team_id: String,
    membership_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMembershipsArgs {
    team_id: String,
    #[serde(flatten)]
    list: ListArgs,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateMembershipArgs {
    team_id: String,
    membership_id: String,
    roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum TeamCall {
    CreateTeam(CreateTeamArgs),
    GetTeam(TeamRef),
    ListTeams(ListArgs),
    UpdateTeam(UpdateTeamArgs),
    DeleteTeam(TeamRef),
    UpdateTeamPrefs(TeamPrefsArgs),
    CreateMembership(CreateMembershipArgs),
    GetMembership(MembershipRef),
    ListMemberships(ListMembershipsArgs),
    UpdateMembership(UpdateMembershipArgs),
    DeleteMembership(MembershipRef),
}

/// Dispatch a team tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let teams = clients.teams()?;

    match parse_call::<TeamCall>(name, args)? {
        TeamCall::CreateTeam(mut args) => {
            ensure_id(&mut args.team_id);
            teams.create(to_body(&args)?).await
        }
        TeamCall::GetTeam(args) => teams.get(&args.team_id).await,
        TeamCall::ListTeams(args) => teams.list(args.queries(), args.search()).await,
        TeamCall::UpdateTeam(args) => teams.update_name(&args.team_id, &args.name).await,
        TeamCall::DeleteTeam(args) => {
            teams.delete(&args.team_id).await?;
            Ok(deleted("Team", &args.team_id))
        }
        TeamCall::UpdateTeamPrefs(args) => {
            teams
                .update_prefs(&args.team_id, &JsonValue::Object(args.prefs))
                .await
        }
        TeamCall::CreateMembership(args) => {
            teams
                .create_membership(&args.team_id, to_body(&args)?)
                .await
        }
        TeamCall::GetMembership(args) => {
            teams
                .get_membership(&args.team_id, &args.membership_id)
                .await
        }
        TeamCall::ListMemberships(args) => {
            teams
                .list_memberships(&args.team_id, args.list.queries(), args.list.search())
                .await
        }
        TeamCall::UpdateMembership(args) => {
            teams
                .update_membership(&args.team_id, &args.membership_id, &args.roles)
                .await
        }
        TeamCall::DeleteMembership(args) => {
            teams
                .delete_membership(&args.team_id, &args.membership_id)
                .await?;
            Ok(deleted("Membership", &args.membership_id))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 11);
    }

    #[test]
    fn test_membership_requires_roles() {
        let mut map = Map::new();
        map.insert("teamId".into(), json!("t"));
        map.insert("email".into(), json!("a@example.com"));
        let err = parse_call::<TeamCall>("create_membership", map).unwrap_err();
        assert!(err.to_string().contains("roles"));
    }
}
