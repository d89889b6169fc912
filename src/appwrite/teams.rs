//! Teams service: teams and memberships.

use serde_json::{json, Value as JsonValue};

use super::{list_params, AppwriteClient};
use crate::error::Result;

/// Handle for the Teams API.
#[derive(Clone)]
pub struct Teams {
    client: AppwriteClient,
}

impl Teams {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn team(team_id: &str) -> String {
        format!("/teams/{}", team_id)
    }

    fn membership(team_id: &str, membership_id: &str) -> String {
        format!("{}/memberships/{}", Self::team(team_id), membership_id)
    }

    /// `POST /teams`.
    pub async fn create(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/teams", body).await
    }

    /// Fetch one team.
    pub async fn get(&self, team_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::team(team_id), &[]).await
    }

    /// List teams.
    pub async fn list(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client.get("/teams", &list_params(queries, search)).await
    }

    /// Rename a team.
    pub async fn update_name(&self, team_id: &str, name: &str) -> Result<JsonValue> {
        self.client
            .put(&Self::team(team_id), json!({ "name": name }))
            .await
    }

    /// Delete a team.
    pub async fn delete(&self, team_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::team(team_id)).await
    }

    /// Replace a team's preferences.
    pub async fn update_prefs(&self, team_id: &str, prefs: &JsonValue) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/prefs", Self::team(team_id)), json!({ "prefs": prefs }))
            .await
    }

    /// Invite a user or email address to a team.
    pub async fn create_membership(&self, team_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client
            .post(&format!("{}/memberships", Self::team(team_id)), body)
            .await
    }

    /// Fetch one membership.
    pub async fn get_membership(&self, team_id: &str, membership_id: &str) -> Result<JsonValue> {
        self.client
            .get(&Self::membership(team_id, membership_id), &[])
            .await
    }

    /// List memberships of a team.
    pub async fn list_memberships(
        &self,
        team_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/memberships", Self::team(team_id)),
                &list_params(queries, search),
            )
            .await
    }

    /// Replace a member's roles.
    pub async fn update_membership(
        &self,
        team_id: &str,
        membership_id: &str,
        roles: &[String],
    ) -> Result<JsonValue> {
        self.client
            .patch(
                &Self::membership(team_id, membership_id),
                json!({ "roles": roles }),
            )
            .await
    }

    /// Remove a member.
    pub async fn delete_membership(&self, team_id: &str, membership_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&Self::membership(team_id, membership_id))
            .await
    }
}
