//! Startup configuration for the Appwrite connection.

use std::fmt;

use crate::error::{McpError, Result};

/// Endpoint used when neither `--endpoint` nor `APPWRITE_ENDPOINT` is given.
pub const DEFAULT_ENDPOINT: &str = "https://cloud.appwrite.io/v1";

/// Connection triple shared by every Appwrite service handle.
#[derive(Clone, PartialEq, Eq)]
pub struct AppwriteConfig {
    /// API endpoint including the version prefix, without a trailing slash.
    pub endpoint: String,
    /// Project identifier sent as `X-Appwrite-Project`.
    pub project_id: String,
    /// Server API key sent as `X-Appwrite-Key`.
    pub api_key: String,
}

impl AppwriteConfig {
    /// Create a configuration, normalising the endpoint.
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        }
    }

    /// Resolve the configuration from already-merged flag/environment values.
    ///
    /// Empty strings count as missing. Project ID and API key are mandatory;
    /// the endpoint falls back to [`DEFAULT_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns [`McpError::Config`] naming the first missing credential.
    pub fn resolve(
        project_id: Option<String>,
        api_key: Option<String>,
        endpoint: Option<String>,
    ) -> Result<Self> {
        let project_id = non_empty(project_id).ok_or_else(|| {
            McpError::Config("APPWRITE_PROJECT_ID or --project-id is required".to_string())
        })?;
        let api_key = non_empty(api_key).ok_or_else(|| {
            McpError::Config("APPWRITE_API_KEY or --api-key is required".to_string())
        })?;
        let endpoint = non_empty(endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        Ok(Self::new(endpoint, project_id, api_key))
    }
}

// The API key must never end up in logs.
impl fmt::Debug for AppwriteConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppwriteConfig")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
