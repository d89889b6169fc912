//! Users service.

use serde_json::{json, Value as JsonValue};

use super::{list_params, AppwriteClient};
use crate::error::Result;

/// Handle for the Users API.
#[derive(Clone)]
pub struct Users {
    client: AppwriteClient,
}

impl Users {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn user(user_id: &str) -> String {
        format!("/users/{}", user_id)
    }

    /// `POST /users`.
    pub async fn create(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/users", body).await
    }

    /// Fetch one user.
    pub async fn get(&self, user_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::user(user_id), &[]).await
    }

    /// List users.
    pub async fn list(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client.get("/users", &list_params(queries, search)).await
    }

    /// Change a user's email.
    pub async fn update_email(&self, user_id: &str, email: &str) -> Result<JsonValue> {
        self.client
            .patch(&format!("{}/email", Self::user(user_id)), json!({ "email": email }))
            .await
    }

    /// Change a user's name.
    pub async fn update_name(&self, user_id: &str, name: &str) -> Result<JsonValue> {
        self.client
            .patch(&format!("{}/name", Self::user(user_id)), json!({ "name": name }))
            .await
    }

    /// Change a user's password.
    pub async fn update_password(&self, user_id: &str, password: &str) -> Result<JsonValue> {
        self.client
            .patch(
                &format!("{}/password", Self::user(user_id)),
                json!({ "password": password }),
            )
            .await
    }

    /// The phone endpoint names its field `number`.
    pub async fn update_phone(&self, user_id: &str, phone: &str) -> Result<JsonValue> {
        self.client
            .patch(&format!("{}/phone", Self::user(user_id)), json!({ "number": phone }))
            .await
    }

    /// Replace a user's labels.
    pub async fn update_labels(&self, user_id: &str, labels: &[String]) -> Result<JsonValue> {
        self.client
            .put(&format!("{}/labels", Self::user(user_id)), json!({ "labels": labels }))
            .await
    }

    /// Block (`false`) or unblock (`true`) a user.
    pub async fn update_status(&self, user_id: &str, status: bool) -> Result<JsonValue> {
        self.client
            .patch(&format!("{}/status", Self::user(user_id)), json!({ "status": status }))
            .await
    }

    /// Replace a user's preferences.
    pub async fn update_prefs(&self, user_id: &str, prefs: &JsonValue) -> Result<JsonValue> {
        self.client
            .patch(&format!("{}/prefs", Self::user(user_id)), json!({ "prefs": prefs }))
            .await
    }

    /// A user's preferences.
    pub async fn get_prefs(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("{}/prefs", Self::user(user_id)), &[])
            .await
    }

    /// Delete a user.
    pub async fn delete(&self, user_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::user(user_id)).await
    }

    /// Active sessions of a user.
    pub async fn list_sessions(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("{}/sessions", Self::user(user_id)), &[])
            .await
    }

    /// Revoke one session.
    pub async fn delete_session(&self, user_id: &str, session_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/sessions/{}", Self::user(user_id), session_id))
            .await
    }

    /// Revoke every session of a user.
    pub async fn delete_sessions(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/sessions", Self::user(user_id)))
            .await
    }

    /// Team memberships of a user.
    pub async fn list_memberships(&self, user_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("{}/memberships", Self::user(user_id)), &[])
            .await
    }

    /// Activity logs of a user.
    pub async fn list_logs(&self, user_id: &str, queries: Option<&[String]>) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/logs", Self::user(user_id)),
                &list_params(queries, None),
            )
            .await
    }
}
