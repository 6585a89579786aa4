//! Canonical folder/file records used everywhere above the wire boundary.

use crate::types::{FileId, FolderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Metadata of the folder a listing describes. `id` is `None` when the server
/// does not report an id for its root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderInfo {
    pub id: Option<FolderId>,
    pub name: String,
    pub parent_id: Option<FolderId>,
}

/// Immediate child folder in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubfolderItem {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
}

/// Stored file in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileItem {
    pub id: FileId,
    pub name: String,
    pub folder_id: Option<FolderId>,
    pub size: u64,
    pub content_type: String,
    pub storage_id: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

/// One listing: folder metadata plus immediate subfolders and files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderContents {
    pub folder: FolderInfo,
    pub subfolders: Vec<SubfolderItem>,
    pub files: Vec<FileItem>,
}

impl FolderContents {
    /// Empty listing for a folder, used before anything has been fetched.
    pub fn empty(folder: FolderInfo) -> Self {
        Self {
            folder,
            subfolders: Vec::new(),
            files: Vec::new(),
        }
    }

    pub fn find_file(&self, id: FileId) -> Option<&FileItem> {
        self.files.iter().find(|f| f.id == id)
    }

    pub fn find_subfolder(&self, id: FolderId) -> Option<&SubfolderItem> {
        self.subfolders.iter().find(|f| f.id == id)
    }
}

/// Request body for folder creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFolder {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<FolderId>,
}

/// Folder returned by a successful create
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedFolder {
    pub id: FolderId,
    pub name: String,
    pub parent_id: Option<FolderId>,
}

/// File record returned by an upload. The server's id may be a storage key rather
/// than a numeric file id, so it is kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    pub folder_id: Option<FolderId>,
    pub size: u64,
    pub content_type: String,
    pub storage_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

impl Health {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}

/// Local file staged for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let name = name.into();
        let content_type = content_type_for(&name).to_string();
        Self {
            name,
            content_type,
            bytes,
        }
    }

    /// Read a local file, naming the upload after the file's final path component.
    pub fn from_path(path: &std::path::Path) -> Result<Self, crate::error::ApiError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                crate::error::ApiError::InvalidInput(format!(
                    "Not a file path: {}",
                    path.display()
                ))
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        Ok(Self::new(name, bytes))
    }
}

/// Content type inferred from a file name's extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "csv" => "text/csv",
        "html" | "htm" => "text/html",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "rar" => "application/vnd.rar",
        "gz" | "tgz" => "application/gzip",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        _ => "application/octet-stream",
    }
}
