//! Locale service: static reference lists.

use serde_json::Value as JsonValue;

use super::AppwriteClient;
use crate::error::Result;

/// Handle for the Locale API.
#[derive(Clone)]
pub struct Locale {
    client: AppwriteClient,
}

impl Locale {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    async fn list(&self, resource: &str) -> Result<JsonValue> {
        self.client.get(&format!("/locale/{}", resource), &[]).await
    }

    /// All countries.
    pub async fn list_countries(&self) -> Result<JsonValue> {
        self.list("countries").await
    }

    /// EU member countries.
    pub async fn list_countries_eu(&self) -> Result<JsonValue> {
        self.list("countries/eu").await
    }

    /// Country dialling codes.
    pub async fn list_countries_phones(&self) -> Result<JsonValue> {
        self.list("countries/phones").await
    }

    /// All continents.
    pub async fn list_continents(&self) -> Result<JsonValue> {
        self.list("continents").await
    }

    /// ISO 639-1 languages.
    pub async fn list_languages(&self) -> Result<JsonValue> {
        self.list("languages").await
    }

    /// All currencies.
    pub async fn list_currencies(&self) -> Result<JsonValue> {
        self.list("currencies").await
    }

    /// Locale codes supported by the backend.
    pub async fn list_codes(&self) -> Result<JsonValue> {
        self.list("codes").await
    }
}
