//! Appwrite REST client and per-subsystem service handles.
//!
//! [`AppwriteClient`] owns the HTTP connection pool and the configuration
//! triple; every service handle wraps a clone of it and maps SDK-shaped
//! methods onto REST paths.

pub mod avatars;
pub mod databases;
pub mod functions;
pub mod health;
pub mod locale;
pub mod messaging;
pub mod storage;
pub mod teams;
pub mod users;

use std::sync::Arc;

use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::AppwriteConfig;
use crate::error::{McpError, Result};

pub use avatars::Avatars;
pub use databases::Databases;
pub use functions::Functions;
pub use health::Health;
pub use locale::Locale;
pub use messaging::Messaging;
pub use storage::Storage;
pub use teams::Teams;
pub use users::Users;

/// Response format the request and response shapes follow.
const RESPONSE_FORMAT: &str = "1.6.0";

/// Uploads above this size are split into `Content-Range` chunks.
pub const CHUNK_SIZE: usize = 5 * 1024 * 1024;

/// Query string pairs for a request.
pub type Params = Vec<(String, String)>;

/// Shared HTTP client bound to one Appwrite project.
#[derive(Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    config: Arc<AppwriteConfig>,
}

/// A file sent as `multipart/form-data`.
pub struct Upload<'a> {
    /// Form field carrying the file bytes (`file` or `code`).
    pub field: &'a str,
    /// File name reported to the backend.
    pub file_name: &'a str,
    /// Raw file content.
    pub bytes: Vec<u8>,
    /// Extra text fields sent with every chunk.
    pub fields: Params,
}

impl AppwriteClient {
    /// Create a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Transport`] if the HTTP client cannot be built.
    pub fn new(config: AppwriteConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("appwrite-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &AppwriteConfig {
        &self.config
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.endpoint, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .header("X-Appwrite-Project", &self.config.project_id)
            .header("X-Appwrite-Key", &self.config.api_key)
            .header("X-Appwrite-Response-Format", RESPONSE_FORMAT)
    }

    /// Issue a JSON call and decode the JSON response.
    ///
    /// # Errors
    ///
    /// Non-2xx responses become [`McpError::Appwrite`] with the backend's
    /// message; network failures become [`McpError::Transport`].
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        params: &[(String, String)],
        body: Option<JsonValue>,
    ) -> Result<JsonValue> {
        debug!(%method, path, "appwrite request");
        let mut request = self
            .request(method, path)
            .header(CONTENT_TYPE, "application/json")
            .query(params);
        if let Some(body) = body {
            request = request.json(&body);
        }
        decode(request.send().await?).await
    }

    /// GET with query parameters.
    pub async fn get(&self, path: &str, params: &[(String, String)]) -> Result<JsonValue> {
        self.call(Method::GET, path, params, None).await
    }

    /// POST a JSON body.
    pub async fn post(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.call(Method::POST, path, &[], Some(body)).await
    }

    /// PUT a JSON body.
    pub async fn put(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.call(Method::PUT, path, &[], Some(body)).await
    }

    /// PATCH a JSON body.
    pub async fn patch(&self, path: &str, body: JsonValue) -> Result<JsonValue> {
        self.call(Method::PATCH, path, &[], Some(body)).await
    }

    /// DELETE a resource. Appwrite answers with an empty body.
    pub async fn delete(&self, path: &str) -> Result<JsonValue> {
        self.call(Method::DELETE, path, &[], None).await
    }

    /// GET a binary resource (avatars, images).
    pub async fn get_bytes(&self, path: &str, params: &[(String, String)]) -> Result<Vec<u8>> {
        debug!(path, "appwrite binary request");
        let response = self.request(Method::GET, path).query(params).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            return Err(McpError::from_response(status.as_u16(), &text));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// POST outside the SDK error model: a non-2xx response becomes
    /// [`McpError::Http`] carrying `context` and the raw response body.
    pub async fn post_raw(&self, path: &str, body: &JsonValue, context: &str) -> Result<JsonValue> {
        debug!(path, "appwrite raw request");
        let response = self
            .request(Method::POST, path)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(McpError::Http {
                context: context.to_string(),
                body: text,
            });
        }
        parse_json(&text)
    }

    /// Upload a file as multipart form data, chunking anything larger than
    /// [`CHUNK_SIZE`]. Chunks after the first carry the `$id` returned by the
    /// first one in `X-Appwrite-ID`.
    pub async fn upload(&self, path: &str, upload: Upload<'_>) -> Result<JsonValue> {
        let total = upload.bytes.len();
        let chunked = total > CHUNK_SIZE;
        let mut upload_id: Option<String> = None;
        let mut start = 0;

        loop {
            let end = (start + CHUNK_SIZE).min(total);
            let mut form = Form::new();
            for (name, value) in &upload.fields {
                form = form.text(name.clone(), value.clone());
            }
            let part = Part::bytes(upload.bytes[start..end].to_vec())
                .file_name(upload.file_name.to_string());
            form = form.part(upload.field.to_string(), part);

            let mut request = self.request(Method::POST, path);
            if chunked {
                request = request.header(
                    "Content-Range",
                    format!("bytes {}-{}/{}", start, end.saturating_sub(1), total),
                );
            }
            if let Some(id) = &upload_id {
                request = request.header("X-Appwrite-ID", id);
            }

            debug!(path, start, end, total, "appwrite upload chunk");
            let response = decode(request.multipart(form).send().await?).await?;

            start = end;
            if start >= total {
                return Ok(response);
            }
            if upload_id.is_none() {
                upload_id = response
                    .get("$id")
                    .and_then(|v| v.as_str())
                    .map(|s| s.to_string());
            }
        }
    }
}

async fn decode(response: Response) -> Result<JsonValue> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(McpError::from_response(status.as_u16(), &text));
    }
    parse_json(&text)
}

fn parse_json(text: &str) -> Result<JsonValue> {
    if text.trim().is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(text)
        .map_err(|e| McpError::Transport(format!("invalid JSON response: {}", e)))
}

/// Build the `queries[]` / `search` parameters shared by every list endpoint.
pub fn list_params(queries: Option<&[String]>, search: Option<&str>) -> Params {
    let mut params: Params = queries
        .unwrap_or_default()
        .iter()
        .map(|q| ("queries[]".to_string(), q.clone()))
        .collect();
    if let Some(search) = search {
        params.push(("search".to_string(), search.to_string()));
    }
    params
}

/// Append an optional query parameter.
pub(crate) fn push_param<T: ToString>(params: &mut Params, name: &str, value: Option<T>) {
    if let Some(value) = value {
        params.push((name.to_string(), value.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params() {
        let queries = vec!["limit(10)".to_string(), "orderDesc(\"$createdAt\")".to_string()];
        let params = list_params(Some(&queries), Some("alice"));
        assert_eq!(
            params,
            vec![
                ("queries[]".to_string(), "limit(10)".to_string()),
                ("queries[]".to_string(), "orderDesc(\"$createdAt\")".to_string()),
                ("search".to_string(), "alice".to_string()),
            ]
        );
        assert!(list_params(None, None).is_empty());
    }

    #[test]
    fn test_push_param() {
        let mut params = Params::new();
        push_param(&mut params, "width", Some(120));
        push_param::<u32>(&mut params, "height", None);
        assert_eq!(params, vec![("width".to_string(), "120".to_string())]);
    }

    #[test]
    fn test_url_joins_endpoint() {
        let client =
            AppwriteClient::new(AppwriteConfig::new("http://localhost/v1/", "p", "k")).unwrap();
        assert_eq!(client.url("/health"), "http://localhost/v1/health");
    }
}
