//! Databases service: databases, collections, documents, attributes, indexes.

use serde_json::{json, Value as JsonValue};

use super::{list_params, AppwriteClient};
use crate::error::Result;

/// Attribute types with a dedicated create/update endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    /// Sized string
    String,
    /// 64-bit integer with optional bounds
    Integer,
    /// Float with optional bounds
    Float,
    /// Boolean
    Boolean,
    /// Email-validated string
    Email,
    /// One of a fixed set of strings
    Enum,
    /// ISO 8601 datetime
    Datetime,
    /// URL-validated string
    Url,
    /// IP address
    Ip,
    /// Link to another collection
    Relationship,
    /// GeoJSON point
    Point,
    /// GeoJSON polygon
    Polygon,
}

impl AttributeKind {
    /// Path segment used by the REST API.
    pub fn as_str(self) -> &'static str {
        match self {
            AttributeKind::String => "string",
            AttributeKind::Integer => "integer",
            AttributeKind::Float => "float",
            AttributeKind::Boolean => "boolean",
            AttributeKind::Email => "email",
            AttributeKind::Enum => "enum",
            AttributeKind::Datetime => "datetime",
            AttributeKind::Url => "url",
            AttributeKind::Ip => "ip",
            AttributeKind::Relationship => "relationship",
            AttributeKind::Point => "point",
            AttributeKind::Polygon => "polygon",
        }
    }
}

/// Handle for the Databases API.
#[derive(Clone)]
pub struct Databases {
    client: AppwriteClient,
}

impl Databases {
    /// Wrap a shared client.
    pub fn new(client: AppwriteClient) -> Self {
        Self { client }
    }

    /// `POST /databases`.
    pub async fn create(&self, body: JsonValue) -> Result<JsonValue> {
        self.client.post("/databases", body).await
    }

    /// Fetch one database.
    pub async fn get(&self, database_id: &str) -> Result<JsonValue> {
        self.client
            .get(&format!("/databases/{}", database_id), &[])
            .await
    }

    /// List databases, filtered by `queries[]` and `search`.
    pub async fn list(
        &self,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get("/databases", &list_params(queries, search))
            .await
    }

    /// Replace a database's name and enabled flag.
    pub async fn update(&self, database_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client
            .put(&format!("/databases/{}", database_id), body)
            .await
    }

    /// Delete a database and everything in it.
    pub async fn delete(&self, database_id: &str) -> Result<JsonValue> {
        self.client
            .delete(&format!("/databases/{}", database_id))
            .await
    }

    fn collections(database_id: &str) -> String {
        format!("/databases/{}/collections", database_id)
    }

    fn collection(database_id: &str, collection_id: &str) -> String {
        format!("/databases/{}/collections/{}", database_id, collection_id)
    }

    /// Create a collection in a database.
    pub async fn create_collection(&self, database_id: &str, body: JsonValue) -> Result<JsonValue> {
        self.client.post(&Self::collections(database_id), body).await
    }

    /// Fetch one collection.
    pub async fn get_collection(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .get(&Self::collection(database_id, collection_id), &[])
            .await
    }

    /// List the collections of a database.
    pub async fn list_collections(
        &self,
        database_id: &str,
        queries: Option<&[String]>,
        search: Option<&str>,
    ) -> Result<JsonValue> {
        self.client
            .get(&Self::collections(database_id), &list_params(queries, search))
            .await
    }

    /// Replace a collection's settings (`PUT`).
    pub async fn update_collection(
        &self,
        database_id: &str,
        collection_id: &str,
        body: JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .put(&Self::collection(database_id, collection_id), body)
            .await
    }

    /// Delete a collection and its documents.
    pub async fn delete_collection(
        &self,
        database_id: &str,
        collection_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&Self::collection(database_id, collection_id))
            .await
    }

    /// Create a document. `permissions` is omitted from the body when `None`.
    pub async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &JsonValue,
        permissions: Option<&[String]>,
    ) -> Result<JsonValue> {
        let mut body = json!({ "documentId": document_id, "data": data });
        if let Some(permissions) = permissions {
            body["permissions"] = json!(permissions);
        }
        self.client
            .post(
                &format!("{}/documents", Self::collection(database_id, collection_id)),
                body,
            )
            .await
    }

    /// Fetch one document; `queries` may select attributes.
    pub async fn get_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        queries: Option<&[String]>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!(
                    "{}/documents/{}",
                    Self::collection(database_id, collection_id),
                    document_id
                ),
                &list_params(queries, None),
            )
            .await
    }

    /// List documents. Returns the first page only, as the backend pages it.
    pub async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: Option<&[String]>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/documents", Self::collection(database_id, collection_id)),
                &list_params(queries, None),
            )
            .await
    }

    /// Patch a document. Absent `data` or `permissions` are left untouched.
    pub async fn update_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: Option<&JsonValue>,
        permissions: Option<&[String]>,
    ) -> Result<JsonValue> {
        let mut body = json!({});
        if let Some(data) = data {
            body["data"] = data.clone();
        }
        if let Some(permissions) = permissions {
            body["permissions"] = json!(permissions);
        }
        self.client
            .patch(
                &format!(
                    "{}/documents/{}",
                    Self::collection(database_id, collection_id),
                    document_id
                ),
                body,
            )
            .await
    }

    /// Delete one document.
    pub async fn delete_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!(
                "{}/documents/{}",
                Self::collection(database_id, collection_id),
                document_id
            ))
            .await
    }

    fn attributes(database_id: &str, collection_id: &str) -> String {
        format!("{}/attributes", Self::collection(database_id, collection_id))
    }

    /// Create a typed attribute; `kind` picks the endpoint.
    pub async fn create_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        kind: AttributeKind,
        body: JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .post(
                &format!("{}/{}", Self::attributes(database_id, collection_id), kind.as_str()),
                body,
            )
            .await
    }

    /// Create an attribute type the typed API does not cover, surfacing
    /// failures with the raw response body.
    pub async fn create_attribute_raw(
        &self,
        database_id: &str,
        collection_id: &str,
        kind: AttributeKind,
        body: &JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .post_raw(
                &format!("{}/{}", Self::attributes(database_id, collection_id), kind.as_str()),
                body,
                &format!("Failed to create {} attribute", kind.as_str()),
            )
            .await
    }

    /// Patch a typed attribute. Relationships use `{key}/relationship`.
    pub async fn update_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        kind: AttributeKind,
        key: &str,
        body: JsonValue,
    ) -> Result<JsonValue> {
        let path = match kind {
            AttributeKind::Relationship => format!(
                "{}/{}/relationship",
                Self::attributes(database_id, collection_id),
                key
            ),
            _ => format!(
                "{}/{}/{}",
                Self::attributes(database_id, collection_id),
                kind.as_str(),
                key
            ),
        };
        self.client.patch(&path, body).await
    }

    /// List the attributes of a collection.
    pub async fn list_attributes(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: Option<&[String]>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &Self::attributes(database_id, collection_id),
                &list_params(queries, None),
            )
            .await
    }

    /// Fetch one attribute by key.
    pub async fn get_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/{}", Self::attributes(database_id, collection_id), key),
                &[],
            )
            .await
    }

    /// Delete an attribute by key.
    pub async fn delete_attribute(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/{}", Self::attributes(database_id, collection_id), key))
            .await
    }

    fn indexes(database_id: &str, collection_id: &str) -> String {
        format!("{}/indexes", Self::collection(database_id, collection_id))
    }

    /// Create an index (`key`, `unique` or `fulltext`).
    pub async fn create_index(
        &self,
        database_id: &str,
        collection_id: &str,
        body: JsonValue,
    ) -> Result<JsonValue> {
        self.client
            .post(&Self::indexes(database_id, collection_id), body)
            .await
    }

    /// List the indexes of a collection.
    pub async fn list_indexes(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: Option<&[String]>,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &Self::indexes(database_id, collection_id),
                &list_params(queries, None),
            )
            .await
    }

    /// Fetch one index by key.
    pub async fn get_index(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
    ) -> Result<JsonValue> {
        self.client
            .get(
                &format!("{}/{}", Self::indexes(database_id, collection_id), key),
                &[],
            )
            .await
    }

    /// Delete an index by key.
    pub async fn delete_index(
        &self,
        database_id: &str,
        collection_id: &str,
        key: &str,
    ) -> Result<JsonValue> {
        self.client
            .delete(&format!("{}/{}", Self::indexes(database_id, collection_id), key))
            .await
    }
}
