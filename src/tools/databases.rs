//! Database tools: databases, collections, documents, attributes, indexes,
//! plus the bulk, upsert and increment composites built on top of them.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value as JsonValue};
use tracing::debug;

use super::ToolDef;
use crate::appwrite::databases::AttributeKind;
use crate::appwrite::Databases;
use crate::clients::ClientRegistry;
use crate::convert::{
    add_numbers, deleted, ensure_id, id_or_unique, number_or_zero, parse_call, to_body, unique_id,
    ListArgs,
};
use crate::error::Result;
use crate::schema;

/// Bounds sent when an integer attribute update omits `min` / `max`.
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Get all database tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        // Databases
        ToolDef::new(
            "create_database",
            "Create a new database",
            schema!(object {
                required: { "name": string => "Database name" },
                optional: {
                    "databaseId": string => "Unique database ID. Use 'unique()' for auto-generation",
                    "enabled": boolean => "Enable database (default: true)"
                }
            }),
        ),
        ToolDef::new(
            "get_database",
            "Get database by ID",
            schema!(object {
                required: { "databaseId": string => "Database ID" }
            }),
        ),
        ToolDef::new(
            "list_databases",
            "List all databases",
            schema!(object {
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_database",
            "Update database by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "name": string => "New database name"
                },
                optional: { "enabled": boolean => "Enable or disable database" }
            }),
        ),
        ToolDef::new(
            "delete_database",
            "Delete database by ID",
            schema!(object {
                required: { "databaseId": string => "Database ID" }
            }),
        ),
        // Collections
        ToolDef::new(
            "create_collection",
            "Create a new collection in a database",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "name": string => "Collection name"
                },
                optional: {
                    "collectionId": string => "Unique collection ID. Use 'unique()' for auto-generation",
                    "permissions": array_string => "Array of permission strings",
                    "documentSecurity": boolean => "Enable document-level security",
                    "enabled": boolean => "Enable collection"
                }
            }),
        ),
        ToolDef::new(
            "get_collection",
            "Get collection by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID"
                }
            }),
        ),
        ToolDef::new(
            "list_collections",
            "List all collections in a database",
            schema!(object {
                required: { "databaseId": string => "Database ID" },
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_collection",
            "Update collection by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "name": string => "New collection name"
                },
                optional: {
                    "permissions": array_string => "Array of permission strings",
                    "documentSecurity": boolean => "Enable document-level security",
                    "enabled": boolean => "Enable collection"
                }
            }),
        ),
        ToolDef::new(
            "delete_collection",
            "Delete collection by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID"
                }
            }),
        ),
        // Documents
        ToolDef::new(
            "create_document",
            "Create a new document in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "data": object => "Document data as JSON object"
                },
                optional: {
                    "documentId": string => "Unique document ID. Use 'unique()' for auto-generation",
                    "permissions": array_string => "Array of permission strings"
                }
            }),
        ),
        ToolDef::new(
            "get_document",
            "Get document by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documentId": string => "Document ID"
                },
                optional: { "queries": array_string => "Query strings for selecting fields" }
            }),
        ),
        ToolDef::new(
            "list_documents",
            "List documents in a collection with optional filtering",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID"
                },
                optional: {
                    "queries": array_string => "Query strings for filtering (e.g., 'Query.equal(\"name\", \"John\")' or 'Query.limit(10)')"
                }
            }),
        ),
        ToolDef::new(
            "update_document",
            "Update document by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documentId": string => "Document ID"
                },
                optional: {
                    "data": object => "Document data to update as JSON object",
                    "permissions": array_string => "Array of permission strings"
                }
            }),
        ),
        ToolDef::new(
            "delete_document",
            "Delete document by ID",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documentId": string => "Document ID"
                }
            }),
        ),
        // Attribute creation
        ToolDef::new(
            "create_string_attribute",
            "Create a string attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "size": integer => "Maximum string length",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default value",
                    "array": boolean => "Is array attribute",
                    "encrypt": boolean => "Encrypt attribute value"
                }
            }),
        ),
        ToolDef::new(
            "create_integer_attribute",
            "Create an integer attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "min": integer => "Minimum value",
                    "max": integer => "Maximum value",
                    "default": integer => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_float_attribute",
            "Create a float attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "min": number => "Minimum value",
                    "max": number => "Maximum value",
                    "default": number => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_boolean_attribute",
            "Create a boolean attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": boolean => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_email_attribute",
            "Create an email attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_enum_attribute",
            "Create an enum attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "elements": array_string => "Allowed enum values",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_datetime_attribute",
            "Create a datetime attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default value in ISO 8601 format",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_url_attribute",
            "Create a URL attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        // Attribute inspection
        ToolDef::new(
            "list_attributes",
            "List all attributes in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID"
                },
                optional: { "queries": array_string => "Query strings for filtering" }
            }),
        ),
        ToolDef::new(
            "get_attribute",
            "Get attribute by key",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key"
                }
            }),
        ),
        ToolDef::new(
            "delete_attribute",
            "Delete attribute by key",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key"
                }
            }),
        ),
        ToolDef::new(
            "create_relationship_attribute",
            "Create a relationship attribute between two collections (1:1, 1:N, N:1, N:M)",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID (parent)",
                    "relatedCollectionId": string => "Related collection ID",
                    "type": (one_of "oneToOne", "oneToMany", "manyToOne", "manyToMany") => "Relationship type"
                },
                optional: {
                    "twoWay": boolean => "Create two-way relationship",
                    "key": string => "Attribute key",
                    "twoWayKey": string => "Two-way attribute key (for related collection)",
                    "onDelete": (one_of "cascade", "restrict", "setNull") => "On delete behavior"
                }
            }),
        ),
        // Indexes
        ToolDef::new(
            "create_index",
            "Create an index in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Index key/name",
                    "type": (one_of "key", "unique", "fulltext") => "Index type",
                    "attributes": array_string => "Attribute keys to index"
                },
                optional: {
                    "orders": array_string => "Order direction for each attribute (asc/desc)"
                }
            }),
        ),
        ToolDef::new(
            "list_indexes",
            "List all indexes in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID"
                },
                optional: { "queries": array_string => "Query strings for filtering" }
            }),
        ),
        ToolDef::new(
            "get_index",
            "Get index by key",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Index key"
                }
            }),
        ),
        ToolDef::new(
            "delete_index",
            "Delete index by key",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Index key"
                }
            }),
        ),
        // Bulk documents
        ToolDef::new(
            "create_documents",
            "Create multiple documents in a collection at once",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documents": array_object => "Array of document data objects"
                }
            }),
        ),
        ToolDef::new(
            "update_documents",
            "Update multiple documents matching a query",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "data": object => "Data to update in matching documents"
                },
                optional: {
                    "queries": array_string => "Query strings to filter documents to update"
                }
            }),
        ),
        ToolDef::new(
            "delete_documents",
            "Delete multiple documents matching a query",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "queries": array_string => "Query strings to filter documents to delete"
                }
            }),
        ),
        ToolDef::new(
            "upsert_document",
            "Create or update a document (upsert)",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documentId": string => "Document ID",
                    "data": object => "Document data"
                },
                optional: { "permissions": array_string => "Permissions" }
            }),
        ),
        ToolDef::new(
            "increment_document_attribute",
            "Atomically increment a numeric attribute value",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "documentId": string => "Document ID",
                    "attribute": string => "Attribute key to increment"
                },
                optional: {
                    "value": number => "Value to increment by (can be negative)"
                }
            }),
        ),
        // Network and geo attributes
        ToolDef::new(
            "create_ip_attribute",
            "Create an IP address attribute in a collection",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": string => "Default IP address value",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_point_attribute",
            "Create a GeoJSON Point attribute for storing geographic coordinates [longitude, latitude]",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": array_number => "Default value as [longitude, latitude]",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        ToolDef::new(
            "create_polygon_attribute",
            "Create a GeoJSON Polygon attribute for storing geographic boundaries",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required"
                },
                optional: {
                    "default": array => "Default polygon coordinates as array of [longitude, latitude] arrays",
                    "array": boolean => "Is array attribute"
                }
            }),
        ),
        // Attribute updates
        ToolDef::new(
            "update_string_attribute",
            "Update a string attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value"
                },
                optional: {
                    "size": integer => "Maximum string length",
                    "newKey": string => "New attribute key (rename)"
                }
            }),
        ),
        ToolDef::new(
            "update_integer_attribute",
            "Update an integer attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": integer => "Default value"
                },
                optional: {
                    "min": integer => "Minimum value",
                    "max": integer => "Maximum value",
                    "newKey": string => "New attribute key (rename)"
                }
            }),
        ),
        ToolDef::new(
            "update_float_attribute",
            "Update a float attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": number => "Default value"
                },
                optional: {
                    "min": number => "Minimum value",
                    "max": number => "Maximum value",
                    "newKey": string => "New attribute key (rename)"
                }
            }),
        ),
        ToolDef::new(
            "update_boolean_attribute",
            "Update a boolean attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": boolean => "Default value"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_email_attribute",
            "Update an email attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_enum_attribute",
            "Update an enum attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "elements": array_string => "Allowed enum values",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_datetime_attribute",
            "Update a datetime attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value in ISO 8601 format"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_url_attribute",
            "Update a URL attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_ip_attribute",
            "Update an IP address attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key",
                    "required": boolean => "Is attribute required",
                    "default": string => "Default value"
                },
                optional: { "newKey": string => "New attribute key (rename)" }
            }),
        ),
        ToolDef::new(
            "update_relationship_attribute",
            "Update a relationship attribute",
            schema!(object {
                required: {
                    "databaseId": string => "Database ID",
                    "collectionId": string => "Collection ID",
                    "key": string => "Attribute key"
                },
                optional: {
                    "onDelete": (one_of "cascade", "restrict", "setNull") => "On delete behavior",
                    "newKey": string => "New attribute key (rename)"
                }
            }),
        ),
    ]
}

// =============================================================================
// Arguments
// =============================================================================

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
enum OnDelete {
    Cascade,
    Restrict,
    SetNull,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum IndexType {
    Key,
    Unique,
    Fulltext,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDatabaseArgs {
    database_id: Option<String>,
    name: String,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DatabaseRef {
    database_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListCollectionsArgs {
    database_id: String,
    #[serde(flatten)]
    list: ListArgs,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDatabaseArgs {
    #[serde(skip_serializing)]
    database_id: String,
    name: String,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateCollectionArgs {
    #[serde(skip_serializing)]
    database_id: String,
    collection_id: Option<String>,
    name: String,
    permissions: Option<Vec<String>>,
    document_security: Option<bool>,
    enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionRef {
    database_id: String,
    collection_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateCollectionArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    name: String,
    permissions: Option<Vec<String>>,
    document_security: Option<bool>,
    enabled: Option<bool>,
}

/// A collection plus optional `queries`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionQuery {
    database_id: String,
    collection_id: String,
    queries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentArgs {
    database_id: String,
    collection_id: String,
    document_id: Option<String>,
    data: Map<String, JsonValue>,
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetDocumentArgs {
    database_id: String,
    collection_id: String,
    document_id: String,
    queries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDocumentArgs {
    database_id: String,
    collection_id: String,
    document_id: String,
    data: Option<Map<String, JsonValue>>,
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRef {
    database_id: String,
    collection_id: String,
    document_id: String,
}

/// A keyed attribute or index.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyRef {
    database_id: String,
    collection_id: String,
    key: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct StringAttributeArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    key: String,
    size: u64,
    required: bool,
    #[serde(rename = "default")]
    default_value: Option<String>,
    array: Option<bool>,
    encrypt: Option<bool>,
}

/// Integer and float attributes.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct NumericAttributeArgs<N> {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    key: String,
    required: bool,
    min: Option<N>,
    max: Option<N>,
    #[serde(rename = "default")]
    default_value: Option<N>,
    array: Option<bool>,
}

/// Attributes whose only settings are `required`, `default` and `array`.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct AttributeArgs<D> {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    key: String,
    required: bool,
    #[serde(rename = "default")]
    default_value: Option<D>,
    array: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct EnumAttributeArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    key: String,
    elements: Vec<String>,
    required: bool,
    #[serde(rename = "default")]
    default_value: Option<String>,
    array: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelationshipAttributeArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    related_collection_id: String,
    #[serde(rename = "type")]
    kind: RelationshipType,
    two_way: Option<bool>,
    key: Option<String>,
    two_way_key: Option<String>,
    on_delete: Option<OnDelete>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateIndexArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    key: String,
    #[serde(rename = "type")]
    kind: IndexType,
    attributes: Vec<String>,
    orders: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentsArgs {
    database_id: String,
    collection_id: String,
    documents: Vec<Map<String, JsonValue>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateDocumentsArgs {
    database_id: String,
    collection_id: String,
    data: Map<String, JsonValue>,
    queries: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteDocumentsArgs {
    database_id: String,
    collection_id: String,
    queries: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpsertDocumentArgs {
    database_id: String,
    collection_id: String,
    document_id: String,
    data: Map<String, JsonValue>,
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncrementArgs {
    database_id: String,
    collection_id: String,
    document_id: String,
    attribute: String,
    value: Option<Number>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateStringAttributeArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    #[serde(skip_serializing)]
    key: String,
    required: bool,
    #[serde(rename = "default", skip_serializing)]
    default_value: Option<String>,
    size: Option<u64>,
    new_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateNumericAttributeArgs<N> {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    #[serde(skip_serializing)]
    key: String,
    required: bool,
    #[serde(rename = "default", skip_serializing)]
    default_value: Option<N>,
    min: Option<N>,
    max: Option<N>,
    new_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateAttributeArgs<D> {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    #[serde(skip_serializing)]
    key: String,
    required: bool,
    #[serde(rename = "default", skip_serializing)]
    default_value: Option<D>,
    new_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateEnumAttributeArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    #[serde(skip_serializing)]
    key: String,
    elements: Vec<String>,
    required: bool,
    #[serde(rename = "default", skip_serializing)]
    default_value: Option<String>,
    new_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRelationshipArgs {
    #[serde(skip_serializing)]
    database_id: String,
    #[serde(skip_serializing)]
    collection_id: String,
    #[serde(skip_serializing)]
    key: String,
    on_delete: Option<OnDelete>,
    new_key: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum DatabaseCall {
    CreateDatabase(CreateDatabaseArgs),
    GetDatabase(DatabaseRef),
    ListDatabases(ListArgs),
    UpdateDatabase(UpdateDatabaseArgs),
    DeleteDatabase(DatabaseRef),

    CreateCollection(CreateCollectionArgs),
    GetCollection(CollectionRef),
    ListCollections(ListCollectionsArgs),
    UpdateCollection(UpdateCollectionArgs),
    DeleteCollection(CollectionRef),

    CreateDocument(CreateDocumentArgs),
    GetDocument(GetDocumentArgs),
    ListDocuments(CollectionQuery),
    UpdateDocument(UpdateDocumentArgs),
    DeleteDocument(DocumentRef),

    CreateStringAttribute(StringAttributeArgs),
    CreateIntegerAttribute(NumericAttributeArgs<i64>),
    CreateFloatAttribute(NumericAttributeArgs<f64>),
    CreateBooleanAttribute(AttributeArgs<bool>),
    CreateEmailAttribute(AttributeArgs<String>),
    CreateEnumAttribute(EnumAttributeArgs),
    CreateDatetimeAttribute(AttributeArgs<String>),
    CreateUrlAttribute(AttributeArgs<String>),
    CreateIpAttribute(AttributeArgs<String>),
    CreatePointAttribute(AttributeArgs<JsonValue>),
    CreatePolygonAttribute(AttributeArgs<JsonValue>),
    CreateRelationshipAttribute(RelationshipAttributeArgs),
    ListAttributes(CollectionQuery),
    GetAttribute(KeyRef),
    DeleteAttribute(KeyRef),

    UpdateStringAttribute(UpdateStringAttributeArgs),
    UpdateIntegerAttribute(UpdateNumericAttributeArgs<i64>),
    UpdateFloatAttribute(UpdateNumericAttributeArgs<f64>),
    UpdateBooleanAttribute(UpdateAttributeArgs<bool>),
    UpdateEmailAttribute(UpdateAttributeArgs<String>),
    UpdateEnumAttribute(UpdateEnumAttributeArgs),
    UpdateDatetimeAttribute(UpdateAttributeArgs<String>),
    UpdateUrlAttribute(UpdateAttributeArgs<String>),
    UpdateIpAttribute(UpdateAttributeArgs<String>),
    UpdateRelationshipAttribute(UpdateRelationshipArgs),

    CreateIndex(CreateIndexArgs),
    ListIndexes(CollectionQuery),
    GetIndex(KeyRef),
    DeleteIndex(KeyRef),

    CreateDocuments(CreateDocumentsArgs),
    UpdateDocuments(UpdateDocumentsArgs),
    DeleteDocuments(DeleteDocumentsArgs),
    UpsertDocument(UpsertDocumentArgs),
    IncrementDocumentAttribute(IncrementArgs),
}

// =============================================================================
// Dispatch
// =============================================================================

/// Dispatch a database tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let databases = clients.databases()?;

    match parse_call::<DatabaseCall>(name, args)? {
        // Databases
        DatabaseCall::CreateDatabase(mut args) => {
            ensure_id(&mut args.database_id);
            databases.create(to_body(&args)?).await
        }
        DatabaseCall::GetDatabase(args) => databases.get(&args.database_id).await,
        DatabaseCall::ListDatabases(args) => databases.list(args.queries(), args.search()).await,
        DatabaseCall::UpdateDatabase(args) => {
            databases.update(&args.database_id, to_body(&args)?).await
        }
        DatabaseCall::DeleteDatabase(args) => {
            databases.delete(&args.database_id).await?;
            Ok(deleted("Database", &args.database_id))
        }

        // Collections
        DatabaseCall::CreateCollection(mut args) => {
            ensure_id(&mut args.collection_id);
            databases
                .create_collection(&args.database_id, to_body(&args)?)
                .await
        }
        DatabaseCall::GetCollection(args) => {
            databases
                .get_collection(&args.database_id, &args.collection_id)
                .await
        }
        DatabaseCall::ListCollections(args) => {
            databases
                .list_collections(&args.database_id, args.list.queries(), args.list.search())
                .await
        }
        DatabaseCall::UpdateCollection(args) => {
            databases
                .update_collection(&args.database_id, &args.collection_id, to_body(&args)?)
                .await
        }
        DatabaseCall::DeleteCollection(args) => {
            databases
                .delete_collection(&args.database_id, &args.collection_id)
                .await?;
            Ok(deleted("Collection", &args.collection_id))
        }

        // Documents
        DatabaseCall::CreateDocument(args) => {
            let document_id = id_or_unique(args.document_id);
            databases
                .create_document(
                    &args.database_id,
                    &args.collection_id,
                    &document_id,
                    &JsonValue::Object(args.data),
                    args.permissions.as_deref(),
                )
                .await
        }
        DatabaseCall::GetDocument(args) => {
            databases
                .get_document(
                    &args.database_id,
                    &args.collection_id,
                    &args.document_id,
                    args.queries.as_deref(),
                )
                .await
        }
        DatabaseCall::ListDocuments(args) => {
            databases
                .list_documents(&args.database_id, &args.collection_id, args.queries.as_deref())
                .await
        }
        DatabaseCall::UpdateDocument(args) => {
            let data = args.data.map(JsonValue::Object);
            databases
                .update_document(
                    &args.database_id,
                    &args.collection_id,
                    &args.document_id,
                    data.as_ref(),
                    args.permissions.as_deref(),
                )
                .await
        }
        DatabaseCall::DeleteDocument(args) => {
            databases
                .delete_document(&args.database_id, &args.collection_id, &args.document_id)
                .await?;
            Ok(deleted("Document", &args.document_id))
        }

        // Attribute creation
        DatabaseCall::CreateStringAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::String,
                &args,
            )
            .await
        }
        DatabaseCall::CreateIntegerAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Integer,
                &args,
            )
            .await
        }
        DatabaseCall::CreateFloatAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Float,
                &args,
            )
            .await
        }
        DatabaseCall::CreateBooleanAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Boolean,
                &args,
            )
            .await
        }
        DatabaseCall::CreateEmailAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Email,
                &args,
            )
            .await
        }
        DatabaseCall::CreateEnumAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Enum,
                &args,
            )
            .await
        }
        DatabaseCall::CreateDatetimeAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Datetime,
                &args,
            )
            .await
        }
        DatabaseCall::CreateUrlAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Url,
                &args,
            )
            .await
        }
        DatabaseCall::CreateIpAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Ip,
                &args,
            )
            .await
        }
        DatabaseCall::CreatePointAttribute(args) => {
            databases
                .create_attribute_raw(
                    &args.database_id,
                    &args.collection_id,
                    AttributeKind::Point,
                    &to_body(&args)?,
                )
                .await
        }
        DatabaseCall::CreatePolygonAttribute(args) => {
            databases
                .create_attribute_raw(
                    &args.database_id,
                    &args.collection_id,
                    AttributeKind::Polygon,
                    &to_body(&args)?,
                )
                .await
        }
        DatabaseCall::CreateRelationshipAttribute(args) => {
            create(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Relationship,
                &args,
            )
            .await
        }
        DatabaseCall::ListAttributes(args) => {
            databases
                .list_attributes(&args.database_id, &args.collection_id, args.queries.as_deref())
                .await
        }
        DatabaseCall::GetAttribute(args) => {
            databases
                .get_attribute(&args.database_id, &args.collection_id, &args.key)
                .await
        }
        DatabaseCall::DeleteAttribute(args) => {
            databases
                .delete_attribute(&args.database_id, &args.collection_id, &args.key)
                .await?;
            Ok(deleted("Attribute", &args.key))
        }

        // Attribute updates
        DatabaseCall::UpdateStringAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::String,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateIntegerAttribute(mut args) => {
            args.min = args.min.or(Some(-MAX_SAFE_INTEGER));
            args.max = args.max.or(Some(MAX_SAFE_INTEGER));
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Integer,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateFloatAttribute(mut args) => {
            args.min = args.min.or(Some(-f64::MAX));
            args.max = args.max.or(Some(f64::MAX));
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Float,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateBooleanAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Boolean,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateEmailAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Email,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateEnumAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Enum,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateDatetimeAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Datetime,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateUrlAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Url,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateIpAttribute(args) => {
            let body = update_body(&args, &args.default_value)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Ip,
                &args.key,
                body,
            )
            .await
        }
        DatabaseCall::UpdateRelationshipAttribute(args) => {
            let body = to_body(&args)?;
            update(
                databases,
                &args.database_id,
                &args.collection_id,
                AttributeKind::Relationship,
                &args.key,
                body,
            )
            .await
        }

        // Indexes
        DatabaseCall::CreateIndex(args) => {
            databases
                .create_index(&args.database_id, &args.collection_id, to_body(&args)?)
                .await
        }
        DatabaseCall::ListIndexes(args) => {
            databases
                .list_indexes(&args.database_id, &args.collection_id, args.queries.as_deref())
                .await
        }
        DatabaseCall::GetIndex(args) => {
            databases
                .get_index(&args.database_id, &args.collection_id, &args.key)
                .await
        }
        DatabaseCall::DeleteIndex(args) => {
            databases
                .delete_index(&args.database_id, &args.collection_id, &args.key)
                .await?;
            Ok(deleted("Index", &args.key))
        }

        // Composites
        DatabaseCall::CreateDocuments(args) => create_documents(databases, args).await,
        DatabaseCall::UpdateDocuments(args) => update_documents(databases, args).await,
        DatabaseCall::DeleteDocuments(args) => delete_documents(databases, args).await,
        DatabaseCall::UpsertDocument(args) => upsert_document(databases, args).await,
        DatabaseCall::IncrementDocumentAttribute(args) => {
            increment_attribute(databases, args).await
        }
    }
}

async fn create<T: Serialize>(
    databases: &Databases,
    database_id: &str,
    collection_id: &str,
    kind: AttributeKind,
    args: &T,
) -> Result<JsonValue> {
    databases
        .create_attribute(database_id, collection_id, kind, to_body(args)?)
        .await
}

async fn update(
    databases: &Databases,
    database_id: &str,
    collection_id: &str,
    kind: AttributeKind,
    key: &str,
    body: JsonValue,
) -> Result<JsonValue> {
    databases
        .update_attribute(database_id, collection_id, kind, key, body)
        .await
}

/// Attribute updates always carry `default`, even when it is null.
fn update_body<T: Serialize, D: Serialize>(
    args: &T,
    default_value: &Option<D>,
) -> Result<JsonValue> {
    let mut body = to_body(args)?;
    body["default"] = json!(default_value);
    Ok(body)
}

/// `$id` of every document in a list response.
fn document_ids(list: &JsonValue) -> Vec<String> {
    list.get("documents")
        .and_then(|docs| docs.as_array())
        .map(|docs| {
            docs.iter()
                .filter_map(|doc| doc.get("$id").and_then(|id| id.as_str()))
                .map(|id| id.to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Create each document in order with a fresh ID. The first failure aborts;
/// documents already created stay created.
async fn create_documents(databases: &Databases, args: CreateDocumentsArgs) -> Result<JsonValue> {
    let mut created = Vec::with_capacity(args.documents.len());
    for data in args.documents {
        let document = databases
            .create_document(
                &args.database_id,
                &args.collection_id,
                &unique_id(),
                &JsonValue::Object(data),
                None,
            )
            .await?;
        created.push(document);
    }
    Ok(json!({
        "success": true,
        "created": created.len(),
        "documents": created,
    }))
}

/// Apply `data` to every document on the first page matching `queries`.
async fn update_documents(databases: &Databases, args: UpdateDocumentsArgs) -> Result<JsonValue> {
    let list = databases
        .list_documents(&args.database_id, &args.collection_id, args.queries.as_deref())
        .await?;
    let data = JsonValue::Object(args.data);

    let mut updated = 0;
    for id in document_ids(&list) {
        databases
            .update_document(&args.database_id, &args.collection_id, &id, Some(&data), None)
            .await?;
        updated += 1;
    }
    Ok(json!({ "success": true, "updated": updated }))
}

async fn delete_documents(databases: &Databases, args: DeleteDocumentsArgs) -> Result<JsonValue> {
    let list = databases
        .list_documents(&args.database_id, &args.collection_id, Some(&args.queries))
        .await?;

    let mut removed = 0;
    for id in document_ids(&list) {
        databases
            .delete_document(&args.database_id, &args.collection_id, &id)
            .await?;
        removed += 1;
    }
    Ok(json!({ "success": true, "deleted": removed }))
}

/// Update when the document can be fetched, create otherwise. Any fetch
/// failure counts as absent.
async fn upsert_document(databases: &Databases, args: UpsertDocumentArgs) -> Result<JsonValue> {
    let data = JsonValue::Object(args.data);
    let permissions = args.permissions.as_deref();

    match databases
        .get_document(&args.database_id, &args.collection_id, &args.document_id, None)
        .await
    {
        Ok(_) => {
            databases
                .update_document(
                    &args.database_id,
                    &args.collection_id,
                    &args.document_id,
                    Some(&data),
                    permissions,
                )
                .await
        }
        Err(e) => {
            debug!(document = %args.document_id, error = %e, "upsert falling back to create");
            databases
                .create_document(
                    &args.database_id,
                    &args.collection_id,
                    &args.document_id,
                    &data,
                    permissions,
                )
                .await
        }
    }
}

/// Read-modify-write; not atomic against concurrent writers.
async fn increment_attribute(databases: &Databases, args: IncrementArgs) -> Result<JsonValue> {
    let document = databases
        .get_document(&args.database_id, &args.collection_id, &args.document_id, None)
        .await?;

    let current = number_or_zero(&document, &args.attribute);
    let delta = args.value.unwrap_or_else(|| Number::from(1));
    let next = add_numbers(&current, &delta);

    let mut data = Map::new();
    data.insert(args.attribute, next);
    databases
        .update_document(
            &args.database_id,
            &args.collection_id,
            &args.document_id,
            Some(&JsonValue::Object(data)),
            None,
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: JsonValue) -> Map<String, JsonValue> {
        match value {
            JsonValue::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[test]
    fn test_tool_count() {
        assert_eq!(tools().len(), 49);
    }

    #[test]
    fn test_rejects_unknown_relationship_type() {
        let err = parse_call::<DatabaseCall>(
            "create_relationship_attribute",
            args(json!({
                "databaseId": "db",
                "collectionId": "c",
                "relatedCollectionId": "r",
                "type": "sideways"
            })),
        )
        .unwrap_err();
        assert!(err.to_string().contains("create_relationship_attribute"));
    }

    #[test]
    fn test_relationship_body() {
        let call = parse_call::<DatabaseCall>(
            "create_relationship_attribute",
            args(json!({
                "databaseId": "db",
                "collectionId": "c",
                "relatedCollectionId": "r",
                "type": "manyToMany",
                "onDelete": "setNull"
            })),
        )
        .unwrap();
        match call {
            DatabaseCall::CreateRelationshipAttribute(a) => assert_eq!(
                to_body(&a).unwrap(),
                json!({"relatedCollectionId": "r", "type": "manyToMany", "onDelete": "setNull"})
            ),
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_update_body_keeps_null_default() {
        let call = parse_call::<DatabaseCall>(
            "update_email_attribute",
            args(json!({
                "databaseId": "db",
                "collectionId": "c",
                "key": "email",
                "required": true
            })),
        )
        .unwrap();
        match call {
            DatabaseCall::UpdateEmailAttribute(a) => assert_eq!(
                update_body(&a, &a.default_value).unwrap(),
                json!({"required": true, "default": null})
            ),
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[test]
    fn test_document_ids() {
        let list = json!({"total": 2, "documents": [{"$id": "a"}, {"$id": "b"}, {"x": 1}]});
        assert_eq!(document_ids(&list), vec!["a", "b"]);
        assert!(document_ids(&json!({})).is_empty());
    }
}
