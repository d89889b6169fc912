//! Storage service: buckets and files.

use serde_json::Value as JsonValue;

use super::{list_params, AppwriteClient, Params, Upload};
use crate::error::Result;

/// Handle for the Storage API.
#[derive(Clone)]
pub struct Storage {
    client: AppwriteClient,
}

impl Storage {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    fn bucket(bucket_id: &str) -> String {
        format!("/storage/buckets/{}", bucket_id)
    }

    fn file(bucket_id: &str, file_id: &str) -> String {
        format!("{}/files/{}", Self::bucket(bucket_id), file_id)
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/storage/buckets", body).await
    }

    /// Fetch one bucket.
    pub async fn get_bucket(&self, bucket_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::bucket(bucket_id), &[]).await
    }

    /// List buckets.
    pub async fn list_buckets(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/storage/buckets", &list_params(queries, search))
            .await
    }

    /// Replace a bucket's settings (`PUT`).
    pub async fn update_bucket(&self, bucket_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client.put(&Self::bucket(bucket_id), body).await
    }

    /// Delete a bucket and its files.
    pub async fn delete_bucket(&self, bucket_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::bucket(bucket_id)).await
    }

    /// File metadata.
    pub async fn get_file(&self, bucket_id: &str, file_id: &str) -> Result<JsonValue> {
        self.client.get(&Self::file(bucket_id, file_id), &[]).await
    }

    /// List files in a bucket.
    pub async fn list_files(
        &self,
        bucket_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/files", Self::bucket(bucket_id)),
                &list_params(queries, search),
            )
            .await
    }

    /// Rename a file or change its permissions.
    pub async fn update_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        body: JsonValue,
    ) -> Result<JsonValue> {
        self.client.put(&Self::file(bucket_id, file_id), body).await
    }

    /// Delete a file.
    pub async fn delete_file(&self, bucket_id: &str, file_id: &str) -> Result<JsonValue> {
        self.client.delete(&Self::file(bucket_id, file_id)).await
    }

    /// Public URL for downloading or viewing a file. No request is made; the
    /// project is carried as a query parameter so the URL works on its own.
    pub fn file_url(&self, bucket_id: &str, file_id: &str, view: bool) -> String {
        let action = if view { "view" } else { "download" };
        format!(
            "{}/{}?project={}",
            self.client.url(&Self::file(bucket_id, file_id)),
            action,
            self.client.config().project_id
        )
    }

    /// Upload file content. Large files are chunked by the client.
    pub async fn create_file(
        &self,
        bucket_id: &str,
        file_id: &str,
        file_name: &str,
        bytes: Vec<u8>,
        permissions: Option<&[String]>,
    ) -> Result<JsonValue> {
        let mut fields: Params = vec![("fileId".to_string(), file_id.to_string())];
        for permission in permissions.unwrap_or_default() {
            fields.push(("permissions[]".to_string(), permission.clone()));
        }

        self.client
            .upload(
                &format!("{}/files", Self::bucket(bucket_id)),
                Upload {
                    field: "file",
                    file_name,
                    bytes,
                    fields,
                },
            )
            .await
    }
}
