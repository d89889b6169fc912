//! Messaging service: topics, subscribers, messages, providers.

use serde_json::{json, Value as JsonValue};

use super::{list_params, AppwriteClient};
use crate::error::Result;

/// Handle for the Messaging API.
#[derive(Clone)]
pub struct Messaging {
    client: AppwriteClient,
}

impl Messaging {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn topic(topic_id: &str) -> String {
        format!("/messaging/topics/{}", topic_id)
    }

    /// Create a topic.
    pub async fn create_topic(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/messaging/topics", body).await
    }

    /// Fetch one topic.
    pub async fn get_topic(&self, topic_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::topic(topic_id), &[]).await
    }

    /// List topics.
    pub async fn list_topics(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/messaging/topics", &list_params(queries, search))
            .await
    }

    /// Patch a topic's name or subscribe roles.
    pub async fn update_topic(&self, topic_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client.patch(&Self::topic(topic_id), body).await
    }

    /// Delete a topic.
    pub async fn delete_topic(&self, topic_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::topic(topic_id)).await
    }

    /// Subscribe a target to a topic.
    pub async fn create_subscriber(
        &self,
        topic_id: &str,
        subscriber_id: &str,
        target_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .post(
                &format!("{}/subscribers", Self::topic(topic_id)),
                json!({ "subscriberId": subscriber_id, "targetId": target_id }),
            )
            .await
    }

    /// List subscribers of a topic.
    pub async fn list_subscribers(
        &self,
        topic_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/subscribers", Self::topic(topic_id)),
                &list_params(queries, search),
            )
            .await
    }

    /// Remove a subscriber from a topic.
    pub async fn delete_subscriber(
        &self,
        topic_id: &str,
        subscriber_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/subscribers/{}", Self::topic(topic_id), subscriber_id))
            .await
    }

    /// Create (and send or schedule) an email message.
    pub async fn create_email(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/messaging/messages/email", body).await
    }

    /// Create an SMS message.
    pub async fn create_sms(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/messaging/messages/sms", body).await
    }

    /// Create a push notification.
    pub async fn create_push(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/messaging/messages/push", body).await
    }

    /// Fetch one message.
    pub async fn get_message(&self, message_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("/messaging/messages/{}", message_id), &[])
            .await
    }

    /// List messages.
    pub async fn list_messages(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/messaging/messages", &list_params(queries, search))
            .await
    }

    /// Delete a message.
    pub async fn delete_message(&self, message_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("/messaging/messages/{}", message_id))
            .await
    }

    /// List messaging providers.
    pub async fn list_providers(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/messaging/providers", &list_params(queries, search))
            .await
    }

    /// Fetch one provider.
    pub async fn get_provider(&self, provider_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("/messaging/providers/{}", provider_id), &[])
            .await
    }

    /// Delete a provider.
    pub async fn delete_provider(&self, provider_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("/messaging/providers/{}", provider_id))
            .await
    }

    /// Register an SMTP provider.
    pub async fn create_smtp_provider(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/messaging/providers/smtp", body).await
    }
}
