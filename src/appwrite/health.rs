//! Health service probes.

use serde_json::Value as JsonValue;

use super::AppwriteClient;
use crate::error::Result;

/// Handle for the Health API.
#[derive(Clone)]
pub struct Health {
    client: AppwriteClient,
}

impl Health {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    /// HTTP server status.
    pub async fn get(&self) -> Result<JsonValue> {
        self.client.get("/health", &[]).await
    }

    /// Database server status.
    pub async fn get_db(&self) -> Result<JsonValue> {
        self.client.get("/health/db", &[]).await
    }

    /// Cache server status.
    pub async fn get_cache(&self) -> Result<JsonValue> {
        self.client.get("/health/cache", &[]).await
    }

    /// Storage device status.
    pub async fn get_storage(&self) -> Result<JsonValue> {
        self.client.get("/health/storage", &[]).await
    }

    /// Server time drift against an NTP source.
    pub async fn get_time(&self) -> Result<JsonValue> {
        self.client.get("/health/time", &[]).await
    }
}
