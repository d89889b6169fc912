//! Messaging tools: topics, subscribers, email/SMS/push messages, providers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{ack, deleted, ensure_id, parse_call, to_body, ListArgs};
use crate::error::Result;
use crate::schema;

/// Get all messaging tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        // Topics
        ToolDef::new(
            "create_topic",
            "Create a messaging topic for grouping subscribers",
            schema!(object {
                required: { "name": string => "Topic name" },
                optional: {
                    "topicId": string => "Unique topic ID",
                    "subscribe": array_string => "Roles that can subscribe"
                }
            }),
        ),
        ToolDef::new(
            "get_topic",
            "Get topic by ID",
            schema!(object {
                required: { "topicId": string => "Topic ID" }
            }),
        ),
        ToolDef::new(
            "list_topics",
            "List all topics",
            schema!(object {
                optional: {
                    "queries": array_string => "Query filters",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_topic",
            "Update topic by ID",
            schema!(object {
                required: { "topicId": string => "Topic ID" },
                optional: {
                    "name": string => "Topic name",
                    "subscribe": array_string => "Roles that can subscribe"
                }
            }),
        ),
        ToolDef::new(
            "delete_topic",
            "Delete topic by ID",
            schema!(object {
                required: { "topicId": string => "Topic ID" }
            }),
        ),
        // Subscribers
        ToolDef::new(
            "create_subscriber",
            "Add a subscriber to a topic",
            schema!(object {
                required: {
                    "topicId": string => "Topic ID",
                    "subscriberId": string => "Subscriber ID",
                    "targetId": string => "Target ID (user target)"
                }
            }),
        ),
        ToolDef::new(
            "list_subscribers",
            "List subscribers of a topic",
            schema!(object {
                required: { "topicId": string => "Topic ID" },
                optional: {
                    "queries": array_string => "Query filters",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "delete_subscriber",
            "Remove a subscriber from a topic",
            schema!(object {
                required: {
                    "topicId": string => "Topic ID",
                    "subscriberId": string => "Subscriber ID"
                }
            }),
        ),
        // Messages
        ToolDef::new(
            "create_email",
            "Create and send an email message",
            schema!(object {
                required: {
                    "subject": string => "Email subject",
                    "content": string => "Email body (HTML supported)"
                },
                optional: {
                    "messageId": string => "Message ID",
                    "topics": array_string => "Topic IDs to send to",
                    "users": array_string => "User IDs to send to",
                    "targets": array_string => "Target IDs to send to",
                    "cc": array_string => "CC email addresses",
                    "bcc": array_string => "BCC email addresses",
                    "draft": boolean => "Save as draft",
                    "html": boolean => "Content is HTML",
                    "scheduledAt": string => "Schedule time (ISO 8601)"
                }
            }),
        ),
        ToolDef::new(
            "create_sms",
            "Create and send an SMS message",
            schema!(object {
                required: { "content": string => "SMS content" },
                optional: {
                    "messageId": string => "Message ID",
                    "topics": array_string => "Topic IDs",
                    "users": array_string => "User IDs",
                    "targets": array_string => "Target IDs",
                    "draft": boolean => "Save as draft",
                    "scheduledAt": string => "Schedule time (ISO 8601)"
                }
            }),
        ),
        ToolDef::new(
            "create_push",
            "Create and send a push notification",
            schema!(object {
                required: {
                    "title": string => "Notification title",
                    "body": string => "Notification body"
                },
                optional: {
                    "messageId": string => "Message ID",
                    "topics": array_string => "Topic IDs",
                    "users": array_string => "User IDs",
                    "targets": array_string => "Target IDs",
                    "data": object => "Custom data payload",
                    "action": string => "Click action URL",
                    "icon": string => "Icon URL",
                    "sound": string => "Sound file",
                    "color": string => "Notification color",
                    "tag": string => "Notification tag",
                    "badge": integer => "Badge count",
                    "draft": boolean => "Save as draft",
                    "scheduledAt": string => "Schedule time (ISO 8601)"
                }
            }),
        ),
        ToolDef::new(
            "get_message",
            "Get message by ID",
            schema!(object {
                required: { "messageId": string => "Message ID" }
            }),
        ),
        ToolDef::new(
            "list_messages",
            "List all messages",
            schema!(object {
                optional: {
                    "queries": array_string => "Query filters",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "delete_message",
            "Delete message by ID",
            schema!(object {
                required: { "messageId": string => "Message ID" }
            }),
        ),
        // Providers
        ToolDef::new(
            "list_providers",
            "List all messaging providers",
            schema!(object {
                optional: {
                    "queries": array_string => "Query filters",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "get_provider",
            "Get provider by ID",
            schema!(object {
                required: { "providerId": string => "Provider ID" }
            }),
        ),
        ToolDef::new(
            "delete_provider",
            "Delete provider by ID",
            schema!(object {
                required: { "providerId": string => "Provider ID" }
            }),
        ),
        ToolDef::new(
            "create_smtp_provider",
            "Create SMTP email provider",
            schema!(object {
                required: {
                    "name": string => "Provider name",
                    "host": string => "SMTP host"
                },
                optional: {
                    "providerId": string => "Provider ID",
                    "port": integer => "SMTP port",
                    "username": string => "SMTP username",
                    "password": string => "SMTP password",
                    "encryption": (one_of "none", "ssl", "tls") => "Encryption type",
                    "autoTLS": boolean => "Auto TLS",
                    "mailer": string => "Mailer name",
                    "fromName": string => "From name",
                    "fromEmail": string => "From email",
                    "replyToName": string => "Reply-to name",
                    "replyToEmail": string => "Reply-to email",
                    "enabled": boolean => "Enable provider"
                }
            }),
        ),
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum SmtpEncryption {
    None,
    Ssl,
    Tls,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTopicArgs {
    topic_id: Option<String>,
    name: String,
    subscribe: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TopicRef {
    topic_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTopicArgs {
    #[serde(skip_serializing)]
    topic_id: String,
    name: Option<String>,
    subscribe: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSubscriberArgs {
    topic_id: String,
    subscriber_id: String,
    target_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListSubscribersArgs {
    topic_id: String,
    #[serde(flatten)]
    list: ListArgs,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubscriberRef {
    topic_id: String,
    subscriber_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateEmailArgs {
    message_id: Option<String>,
    subject: String,
    content: String,
    topics: Option<Vec<String>>,
    users: Option<Vec<String>>,
    targets: Option<Vec<String>>,
    cc: Option<Vec<String>>,
    bcc: Option<Vec<String>>,
    draft: Option<bool>,
    html: Option<bool>,
    scheduled_at: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSmsArgs {
    message_id: Option<String>,
    content: String,
    topics: Option<Vec<String>>,
    users: Option<Vec<String>>,
    targets: Option<Vec<String>>,
    draft: Option<bool>,
    scheduled_at: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreatePushArgs {
    message_id: Option<String>,
    title: String,
    body: String,
    topics: Option<Vec<String>>,
    users: Option<Vec<String>>,
    targets: Option<Vec<String>>,
    data: Option<Map<String, JsonValue>>,
    action: Option<String>,
    icon: Option<String>,
    sound: Option<String>,
    color: Option<String>,
    tag: Option<String>,
    badge: Option<i64>,
    draft: Option<bool>,
    scheduled_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageRef {
    message_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderRef {
    provider_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct SmtpProviderArgs {
    provider_id: Option<String>,
    name: String,
    host: String,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    encryption: Option<SmtpEncryption>,
    #[serde(rename = "autoTLS")]
    auto_tls: Option<bool>,
    mailer: Option<String>,
    from_name: Option<String>,
    from_email: Option<String>,
    reply_to_name: Option<String>,
    reply_to_email: Option<String>,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum MessagingCall {
    CreateTopic(CreateTopicArgs),
    GetTopic(TopicRef),
    ListTopics(ListArgs),
    UpdateTopic(UpdateTopicArgs),
    DeleteTopic(TopicRef),
    CreateSubscriber(CreateSubscriberArgs),
    ListSubscribers(ListSubscribersArgs),
    DeleteSubscriber(SubscriberRef),
    CreateEmail(CreateEmailArgs),
    CreateSms(CreateSmsArgs),
    CreatePush(CreatePushArgs),
    GetMessage(MessageRef),
    ListMessages(ListArgs),
    DeleteMessage(MessageRef),
    ListProviders(ListArgs),
    GetProvider(ProviderRef),
    DeleteProvider(ProviderRef),
    CreateSmtpProvider(SmtpProviderArgs),
}

/// Dispatch a messaging tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let messaging = clients.messaging()?;

    match parse_call::<MessagingCall>(name, args)? {
        MessagingCall::CreateTopic(mut args) => {
            ensure_id(&mut args.topic_id);
            messaging.create_topic(to_body(&args)?).await
        }
        MessagingCall::GetTopic(args) => messaging.get_topic(&args.topic_id).await,
        MessagingCall::ListTopics(args) => {
            messaging.list_topics(args.queries(), args.search()).await
        }
        MessagingCall::UpdateTopic(args) => {
            messaging
                .update_topic(&args.topic_id, to_body(&args)?)
                .await
        }
        MessagingCall::DeleteTopic(args) => {
            messaging.delete_topic(&args.topic_id).await?;
            Ok(deleted("Topic", &args.topic_id))
        }

        MessagingCall::CreateSubscriber(args) => {
            messaging
                .create_subscriber(&args.topic_id, &args.subscriber_id, &args.target_id)
                .await
        }
        MessagingCall::ListSubscribers(args) => {
            messaging
                .list_subscribers(&args.topic_id, args.list.queries(), args.list.search())
                .await
        }
        MessagingCall::DeleteSubscriber(args) => {
            messaging
                .delete_subscriber(&args.topic_id, &args.subscriber_id)
                .await?;
            Ok(ack(format!("Subscriber {} removed", args.subscriber_id)))
        }

        MessagingCall::CreateEmail(mut args) => {
            ensure_id(&mut args.message_id);
            messaging.create_email(to_body(&args)?).await
        }
        MessagingCall::CreateSms(mut args) => {
            ensure_id(&mut args.message_id);
            messaging.create_sms(to_body(&args)?).await
        }
        MessagingCall::CreatePush(mut args) => {
            ensure_id(&mut args.message_id);
            messaging.create_push(to_body(&args)?).await
        }
        MessagingCall::GetMessage(args) => messaging.get_message(&args.message_id).await,
        MessagingCall::ListMessages(args) => {
            messaging.list_messages(args.queries(), args.search()).await
        }
        MessagingCall::DeleteMessage(args) => {
            messaging.delete_message(&args.message_id).await?;
            Ok(deleted("Message", &args.message_id))
        }

        MessagingCall::ListProviders(args) => {
            messaging.list_providers(args.queries(), args.search()).await
        }
        MessagingCall::GetProvider(args) => messaging.get_provider(&args.provider_id).await,
        MessagingCall::DeleteProvider(args) => {
            messaging.delete_provider(&args.provider_id).await?;
            Ok(deleted("Provider", &args.provider_id))
        }
        MessagingCall::CreateSmtpProvider(mut args) => {
            ensure_id(&mut args.provider_id);
            messaging.create_smtp_provider(to_body(&args)?).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 18);
    }

    #[test]
    fn test_smtp_body_field_names() {
        let mut map = Map::new();
        map.insert("name".into(), json!("mail"));
        map.insert("host".into(), json!("smtp.example.com"));
        map.insert("autoTLS".into(), json!(true));
        map.insert("encryption".into(), json!("tls"));
        map.insert("replyToEmail".into(), json!("noreply@example.com"));

        match parse_call::<MessagingCall>("create_smtp_provider", map).unwrap() {
            MessagingCall::CreateSmtpProvider(mut a) => {
                let id = ensure_id(&mut a.provider_id);
                assert_eq!(
                    to_body(&a).unwrap(),
                    json!({
                        "providerId": id,
                        "name": "mail",
                        "host": "smtp.example.com",
                        "encryption": "tls",
                        "autoTLS": true,
                        "replyToEmail": "noreply@example.com"
                    })
                );
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }
}
