//! Storage tools: buckets, files, uploads and file URLs.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value as JsonValue};

use super::ToolDef;
use crate::clients::ClientRegistry;
use crate::convert::{
    decode_base64, deleted, ensure_id, id_or_unique, parse_call, to_body, ListArgs,
};
use crate::error::Result;
use crate::schema;

/// Get all storage tool definitions.
pub fn tools() -> Vec<ToolDef> {
    vec![
        ToolDef::new(
            "create_bucket",
            "Create a new storage bucket",
            schema!(object {
                required: { "name": string => "Bucket name" },
                optional: {
                    "bucketId": string => "Unique bucket ID. Use 'unique()' for auto-generation",
                    "permissions": array_string => "Array of permission strings",
                    "fileSecurity": boolean => "Enable file-level security",
                    "enabled": boolean => "Enable bucket",
                    "maximumFileSize": integer => "Maximum file size in bytes",
                    "allowedFileExtensions": array_string => "Allowed file extensions",
                    "compression": (one_of "none", "gzip", "zstd") => "Compression algorithm",
                    "encryption": boolean => "Enable encryption",
                    "antivirus": boolean => "Enable antivirus scanning"
                }
            }),
        ),
        ToolDef::new(
            "get_bucket",
            "Get bucket by ID",
            schema!(object {
                required: { "bucketId": string => "Bucket ID" }
            }),
        ),
        ToolDef::new(
            "list_buckets",
            "List all storage buckets",
            schema!(object {
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_bucket",
            "Update bucket by ID",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "name": string => "Bucket name"
                },
                optional: {
                    "permissions": array_string => "Array of permission strings",
                    "fileSecurity": boolean => "Enable file-level security",
                    "enabled": boolean => "Enable bucket",
                    "maximumFileSize": integer => "Maximum file size in bytes",
                    "allowedFileExtensions": array_string => "Allowed file extensions",
                    "compression": (one_of "none", "gzip", "zstd") => "Compression algorithm",
                    "encryption": boolean => "Enable encryption",
                    "antivirus": boolean => "Enable antivirus scanning"
                }
            }),
        ),
        ToolDef::new(
            "delete_bucket",
            "Delete bucket by ID",
            schema!(object {
                required: { "bucketId": string => "Bucket ID" }
            }),
        ),
        ToolDef::new(
            "get_file",
            "Get file metadata by ID",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "fileId": string => "File ID"
                }
            }),
        ),
        ToolDef::new(
            "list_files",
            "List all files in a bucket",
            schema!(object {
                required: { "bucketId": string => "Bucket ID" },
                optional: {
                    "queries": array_string => "Query strings for filtering",
                    "search": string => "Search term"
                }
            }),
        ),
        ToolDef::new(
            "update_file",
            "Update file metadata (name and permissions)",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "fileId": string => "File ID"
                },
                optional: {
                    "name": string => "New file name",
                    "permissions": array_string => "Array of permission strings"
                }
            }),
        ),
        ToolDef::new(
            "delete_file",
            "Delete file by ID",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "fileId": string => "File ID"
                }
            }),
        ),
        ToolDef::new(
            "get_file_url",
            "Get file URL (download or view)",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "fileId": string => "File ID"
                },
                optional: {
                    "type": (one_of "download", "view") => "URL type: 'download' or 'view' (default: download)"
                }
            }),
        ),
        ToolDef::new(
            "create_file",
            "Upload a file to a bucket (provide base64 encoded content)",
            schema!(object {
                required: {
                    "bucketId": string => "Bucket ID",
                    "fileName": string => "File name with extension",
                    "fileContent": string => "Base64 encoded file content"
                },
                optional: {
                    "fileId": string => "Unique file ID",
                    "permissions": array_string => "File permissions"
                }
            }),
        ),
    ]
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
enum Compression {
    None,
    Gzip,
    Zstd,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum UrlKind {
    #[default]
    Download,
    View,
}

impl UrlKind {
    fn as_str(self) -> &'static str {
        match self {
            UrlKind::Download => "download",
            UrlKind::View => "view",
        }
    }
}

/// Settings shared by bucket create and update.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BucketArgs {
    bucket_id: Option<String>,
    name: String,
    permissions: Option<Vec<String>>,
    file_security: Option<bool>,
    enabled: Option<bool>,
    maximum_file_size: Option<u64>,
    allowed_file_extensions: Option<Vec<String>>,
    compression: Option<Compression>,
    encryption: Option<bool>,
    antivirus: Option<bool>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBucketArgs {
    #[serde(skip_serializing)]
    bucket_id: String,
    name: String,
    permissions: Option<Vec<String>>,
    file_security: Option<bool>,
    enabled: Option<bool>,
    maximum_file_size: Option<u64>,
    allowed_file_extensions: Option<Vec<String>>,
    compression: Option<Compression>,
    encryption: Option<bool>,
    antivirus: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BucketRef {
    bucket_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFilesArgs {
    bucket_id: String,
    #[serde(flatten)]
    list: ListArgs,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileRef {
    bucket_id: String,
    file_id: String,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateFileArgs {
    #[serde(skip_serializing)]
    bucket_id: String,
    #[serde(skip_serializing)]
    file_id: String,
    name: Option<String>,
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileUrlArgs {
    bucket_id: String,
    file_id: String,
    #[serde(rename = "type", default)]
    kind: UrlKind,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFileArgs {
    bucket_id: String,
    file_id: Option<String>,
    file_name: String,
    file_content: String,
    permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "name", content = "arguments", rename_all = "snake_case")]
enum StorageCall {
    CreateBucket(BucketArgs),
    GetBucket(BucketRef),
    ListBuckets(ListArgs),
    UpdateBucket(UpdateBucketArgs),
    DeleteBucket(BucketRef),
    GetFile(FileRef),
    ListFiles(ListFilesArgs),
    UpdateFile(UpdateFileArgs),
    DeleteFile(FileRef),
    GetFileUrl(FileUrlArgs),
    CreateFile(CreateFileArgs),
}

/// Dispatch a storage tool call.
pub async fn dispatch(
    clients: &ClientRegistry,
    name: &str,
    args: Map<String, JsonValue>,
) -> Result<JsonValue> {
    let storage = clients.storage()?;

    match parse_call::<StorageCall>(name, args)? {
        StorageCall::CreateBucket(mut args) => {
            ensure_id(&mut args.bucket_id);
            storage.create_bucket(to_body(&args)?).await
        }
        StorageCall::GetBucket(args) => storage.get_bucket(&args.bucket_id).await,
        StorageCall::ListBuckets(args) => storage.list_buckets(args.queries(), args.search()).await,
        StorageCall::UpdateBucket(args) => {
            storage
                .update_bucket(&args.bucket_id, to_body(&args)?)
                .await
        }
        StorageCall::DeleteBucket(args) => {
            storage.delete_bucket(&args.bucket_id).await?;
            Ok(deleted("Bucket", &args.bucket_id))
        }
        StorageCall::GetFile(args) => storage.get_file(&args.bucket_id, &args.file_id).await,
        StorageCall::ListFiles(args) => {
            storage
                .list_files(&args.bucket_id, args.list.queries(), args.list.search())
                .await
        }
        StorageCall::UpdateFile(args) => {
            storage
                .update_file(&args.bucket_id, &args.file_id, to_body(&args)?)
                .await
        }
        StorageCall::DeleteFile(args) => {
            storage.delete_file(&args.bucket_id, &args.file_id).await?;
            Ok(deleted("File", &args.file_id))
        }
        StorageCall::GetFileUrl(args) => {
            let url = storage.file_url(&args.bucket_id, &args.file_id, args.kind == UrlKind::View);
            Ok(json!({ "url": url, "type": args.kind.as_str() }))
        }
        StorageCall::CreateFile(args) => {
            let bytes = decode_base64("fileContent", &args.file_content)?;
            let file_id = id_or_unique(args.file_id);
            storage
                .create_file(
                    &args.bucket_id,
                    &file_id,
                    &args.file_name,
                    bytes,
                    args.permissions.as_deref(),
                )
                .await
        }
    }
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
        assert_eq!(tools().len(), 11);
    }

    #[test]
    fn test_url_kind_defaults_to_download() {
        let call = parse_call::<StorageCall>(
            "get_file_url",
            args(json!({"bucketId": "b", "fileId": "f"})),
        );
        match call.unwrap() {
            StorageCall::GetFileUrl(a) => assert_eq!(a.kind, UrlKind::Download),
            other => panic!("unexpected call: {:?}", other),
        }
        assert!(parse_call::<StorageCall>(
            "get_file_url",
            args(json!({"bucketId": "b", "fileId": "f", "type": "preview"}))
        )
        .is_err());
    }

    #[test]
    fn test_bucket_body() {
        match parse_call::<StorageCall>(
            "update_bucket",
            args(json!({"bucketId": "b", "name": "Photos", "compression": "zstd"})),
        )
        .unwrap()
        {
            StorageCall::UpdateBucket(a) => assert_eq!(
                to_body(&a).unwrap(),
                json!({"name": "Photos", "compression": "zstd"})
            ),
            other => panic!("unexpected call: {:?}", other),
        }
    }
}
