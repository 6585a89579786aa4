//! Wire-format translation for ByteBucket responses.
//!
//! Server revisions disagree on field spelling (snake_case vs camelCase, `name` vs
//! `filename`), on scalar types (ids and sizes as numbers or as quoted strings) and on
//! listing shape (separate `subfolders`/`files` arrays vs one flat `items` list).
//! Everything is read loosely here and converted into the canonical records in
//! [`crate::api::model`]; nothing above this module sees a wire type.

use crate::api::model::{
    CreatedFolder, FileItem, FolderContents, FolderInfo, Health, SubfolderItem, UploadedFile,
};
use crate::error::ApiError;
use crate::types::{FileId, FolderId};
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct WireFolder {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "parentId")]
    parent_id: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct WireFile {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default, alias = "filename")]
    name: Option<String>,
    #[serde(default, alias = "folderId")]
    folder_id: Option<Value>,
    #[serde(default, alias = "file_size")]
    size: Option<Value>,
    #[serde(default, alias = "contentType", alias = "mime_type")]
    content_type: Option<String>,
    #[serde(default, alias = "storageId")]
    storage_id: Option<Value>,
    #[serde(default, alias = "createdAt")]
    created_at: Option<String>,
    #[serde(default, alias = "updatedAt")]
    updated_at: Option<String>,
    #[serde(default)]
    tags: Option<Vec<Value>>,
    #[serde(default)]
    metadata: Option<Value>,
}

/// Entry of the legacy flat listing: a folder or a file told apart by `type`.
#[derive(Debug, Deserialize)]
struct WireItem {
    #[serde(default, rename = "type", alias = "kind")]
    kind: Option<String>,
    #[serde(default, alias = "isFolder")]
    is_folder: Option<bool>,
    #[serde(default, alias = "parentId")]
    parent_id: Option<Value>,
    #[serde(flatten)]
    file: WireFile,
}

#[derive(Debug, Deserialize)]
struct WireFolderContents {
    #[serde(default)]
    folder: Option<WireFolder>,
    #[serde(default)]
    subfolders: Option<Vec<WireFolder>>,
    #[serde(default)]
    files: Option<Vec<WireFile>>,
    #[serde(default)]
    items: Option<Vec<WireItem>>,
}

#[derive(Debug, Deserialize)]
struct WireUploadResponse {
    #[serde(default)]
    files: Option<Vec<WireFile>>,
}

#[derive(Debug, Deserialize)]
struct WireHealth {
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorBody {
    #[serde(default, alias = "message")]
    error: Option<String>,
}

/// Numeric value from a JSON number or a numeric string.
fn value_to_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0 && f.fract() == 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Textual value from a JSON string or number; `null` and empty strings yield `None`.
fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn folder_id(value: &Option<Value>) -> Option<FolderId> {
    value.as_ref().and_then(value_to_u64).map(FolderId)
}

fn tag_name(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map.get("name").and_then(value_to_string),
        _ => None,
    }
}

/// Metadata arrives either as an object or as `[{key, value}, ...]`.
fn metadata_map(value: &Option<Value>) -> BTreeMap<String, String> {
    let mut out = BTreeMap::new();
    match value {
        Some(Value::Object(map)) => {
            for (k, v) in map {
                if let Some(v) = value_to_string(v) {
                    out.insert(k.clone(), v);
                }
            }
        }
        Some(Value::Array(entries)) => {
            for entry in entries {
                let key = entry.get("key").and_then(value_to_string);
                let val = entry.get("value").and_then(value_to_string);
                if let (Some(k), Some(v)) = (key, val) {
                    out.insert(k, v);
                }
            }
        }
        _ => {}
    }
    out
}

impl WireFolder {
    fn into_info(self) -> FolderInfo {
        FolderInfo {
            id: folder_id(&self.id),
            name: self.name.unwrap_or_else(|| "Root".to_string()),
            parent_id: folder_id(&self.parent_id),
        }
    }

    fn into_subfolder(self) -> Option<SubfolderItem> {
        let id = match folder_id(&self.id) {
            Some(id) => id,
            None => {
                warn!(name = ?self.name, "Dropping subfolder entry without a usable id");
                return None;
            }
        };
        Some(SubfolderItem {
            id,
            name: self.name.unwrap_or_else(|| format!("folder_{}", id)),
            parent_id: folder_id(&self.parent_id),
        })
    }
}

impl WireFile {
    fn into_file_item(self) -> Option<FileItem> {
        let id = match self.id.as_ref().and_then(value_to_u64) {
            Some(id) => FileId(id),
            None => {
                warn!(name = ?self.name, "Dropping file entry without a numeric id");
                return None;
            }
        };
        Some(FileItem {
            id,
            name: self.name.unwrap_or_else(|| format!("file_{}", id)),
            folder_id: folder_id(&self.folder_id),
            size: self.size.as_ref().and_then(value_to_u64).unwrap_or(0),
            content_type: self
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            storage_id: self
                .storage_id
                .as_ref()
                .and_then(value_to_string)
                .unwrap_or_default(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags: self
                .tags
                .unwrap_or_default()
                .iter()
                .filter_map(tag_name)
                .collect(),
            metadata: metadata_map(&self.metadata),
        })
    }

    fn into_uploaded(self) -> Result<UploadedFile, ApiError> {
        let id = self
            .id
            .as_ref()
            .and_then(value_to_string)
            .ok_or_else(|| ApiError::DecodeError("Upload entry without id".to_string()))?;
        Ok(UploadedFile {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            folder_id: folder_id(&self.folder_id),
            size: self.size.as_ref().and_then(value_to_u64).unwrap_or(0),
            content_type: self
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            storage_id: self.storage_id.as_ref().and_then(value_to_string),
        })
    }
}

impl WireItem {
    fn is_folder(&self) -> bool {
        if let Some(flag) = self.is_folder {
            return flag;
        }
        matches!(
            self.kind.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("folder") | Some("directory") | Some("dir")
        )
    }
}

fn parse<'a, T: Deserialize<'a>>(body: &'a [u8], what: &str) -> Result<T, ApiError> {
    serde_json::from_slice(body)
        .map_err(|e| ApiError::DecodeError(format!("Failed to parse {}: {}", what, e)))
}

/// Decode a folder listing in any known shape.
///
/// `requested` fills in the folder id when the server omits the `folder` object.
pub fn decode_folder_contents(
    body: &[u8],
    requested: Option<FolderId>,
) -> Result<FolderContents, ApiError> {
    let wire: WireFolderContents = parse(body, "folder contents")?;

    let folder = match wire.folder {
        Some(folder) => folder.into_info(),
        None => FolderInfo {
            id: requested,
            name: if requested.is_none() {
                "Root".to_string()
            } else {
                String::new()
            },
            parent_id: None,
        },
    };

    let mut subfolders: Vec<SubfolderItem> = wire
        .subfolders
        .unwrap_or_default()
        .into_iter()
        .filter_map(WireFolder::into_subfolder)
        .collect();
    let mut files: Vec<FileItem> = wire
        .files
        .unwrap_or_default()
        .into_iter()
        .filter_map(WireFile::into_file_item)
        .collect();

    for item in wire.items.unwrap_or_default() {
        if item.is_folder() {
            let parent_id = item.parent_id.or(item.file.folder_id);
            let entry = WireFolder {
                id: item.file.id,
                name: item.file.name,
                parent_id,
            };
            subfolders.extend(entry.into_subfolder());
        } else {
            files.extend(item.file.into_file_item());
        }
    }

    Ok(FolderContents {
        folder,
        subfolders,
        files,
    })
}

pub fn decode_created_folder(body: &[u8]) -> Result<CreatedFolder, ApiError> {
    let wire: WireFolder = parse(body, "created folder")?;
    let id = folder_id(&wire.id)
        .ok_or_else(|| ApiError::DecodeError("Created folder without id".to_string()))?;
    Ok(CreatedFolder {
        id,
        name: wire.name.unwrap_or_default(),
        parent_id: folder_id(&wire.parent_id),
    })
}

pub fn decode_uploaded_files(body: &[u8]) -> Result<Vec<UploadedFile>, ApiError> {
    let wire: WireUploadResponse = parse(body, "upload response")?;
    wire.files
        .unwrap_or_default()
        .into_iter()
        .map(WireFile::into_uploaded)
        .collect()
}

pub fn decode_health(body: &[u8]) -> Result<Health, ApiError> {
    let wire: WireHealth = parse(body, "health response")?;
    let status = wire
        .status
        .ok_or_else(|| ApiError::DecodeError("Health response without status".to_string()))?;
    Ok(Health { status })
}

/// Error message for a non-2xx response: the body's `error` field when it is JSON,
/// otherwise `HTTP <code>: <reason>`.
pub fn error_message(status: u16, reason: &str, body: &[u8]) -> String {
    serde_json::from_slice::<WireErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("HTTP {}: {}", status, reason))
}
