//! In-memory storage backend for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use bytebucket::api::{
    CreatedFolder, FileItem, FolderContents, FolderInfo, Health, NewFolder, StorageApi,
    SubfolderItem, UploadFile, UploadedFile,
};
use bytebucket::error::ApiError;
use bytebucket::types::{FileId, FolderId};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

pub const ROOT_ID: u64 = 1;

struct FolderRecord {
    name: String,
    parent: Option<u64>,
}

struct FileRecord {
    name: String,
    folder: u64,
    content_type: String,
    bytes: Vec<u8>,
}

struct FakeState {
    folders: BTreeMap<u64, FolderRecord>,
    files: BTreeMap<u64, FileRecord>,
    next_id: u64,
    listing_calls: HashMap<Option<FolderId>, u32>,
    failing_listings: u32,
    created: Vec<NewFolder>,
}

/// Behaves like a ByteBucket server whose root folder is a real row (id 1) that
/// also shows up among the root listing's subfolders.
pub struct FakeStorage {
    state: Mutex<FakeState>,
}

impl FakeStorage {
    pub fn new() -> Self {
        let mut folders = BTreeMap::new();
        folders.insert(
            ROOT_ID,
            FolderRecord {
                name: "Root".to_string(),
                parent: None,
            },
        );
        Self {
            state: Mutex::new(FakeState {
                folders,
                files: BTreeMap::new(),
                next_id: 100,
                listing_calls: HashMap::new(),
                failing_listings: 0,
                created: Vec::new(),
            }),
        }
    }

    /// Add a folder under `parent` (the root when `None`).
    pub fn add_folder(&self, name: &str, parent: Option<FolderId>) -> FolderId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.folders.insert(
            id,
            FolderRecord {
                name: name.to_string(),
                parent: Some(parent.map(|p| p.0).unwrap_or(ROOT_ID)),
            },
        );
        FolderId(id)
    }

    pub fn add_file(&self, name: &str, folder: Option<FolderId>, bytes: &[u8]) -> FileId {
        let mut state = self.state.lock();
        let id = state.next_id;
        state.next_id += 1;
        state.files.insert(
            id,
            FileRecord {
                name: name.to_string(),
                folder: folder.map(|f| f.0).unwrap_or(ROOT_ID),
                content_type: bytebucket::api::content_type_for(name).to_string(),
                bytes: bytes.to_vec(),
            },
        );
        FileId(id)
    }

    pub fn listing_calls(&self, key: Option<FolderId>) -> u32 {
        self.state
            .lock()
            .listing_calls
            .get(&key)
            .copied()
            .unwrap_or(0)
    }

    /// Make the next `count` listing requests fail with a 503.
    pub fn fail_listings(&self, count: u32) {
        self.state.lock().failing_listings = count;
    }

    pub fn created_requests(&self) -> Vec<NewFolder> {
        self.state.lock().created.clone()
    }
}

#[async_trait]
impl StorageApi for FakeStorage {
    async fn folder_contents(
        &self,
        folder_id: Option<FolderId>,
    ) -> Result<FolderContents, ApiError> {
        let mut state = self.state.lock();
        *state.listing_calls.entry(folder_id).or_insert(0) += 1;
        if state.failing_listings > 0 {
            state.failing_listings -= 1;
            return Err(ApiError::StatusError {
                status: 503,
                message: "Service unavailable".to_string(),
            });
        }

        let id = folder_id.map(|f| f.0).unwrap_or(ROOT_ID);
        let folder = state.folders.get(&id).ok_or_else(|| ApiError::StatusError {
            status: 404,
            message: "Folder not found".to_string(),
        })?;
        let info = FolderInfo {
            id: Some(FolderId(id)),
            name: folder.name.clone(),
            parent_id: folder.parent.map(FolderId),
        };

        // Root listings also return every parentless folder, the root row included.
        let subfolders = state
            .folders
            .iter()
            .filter(|(_, f)| f.parent == Some(id) || (folder_id.is_none() && f.parent.is_none()))
            .map(|(fid, f)| SubfolderItem {
                id: FolderId(*fid),
                name: f.name.clone(),
                parent_id: f.parent.map(FolderId),
            })
            .collect();
        let files = state
            .files
            .iter()
            .filter(|(_, f)| f.folder == id)
            .map(|(fid, f)| FileItem {
                id: FileId(*fid),
                name: f.name.clone(),
                folder_id: Some(FolderId(f.folder)),
                size: f.bytes.len() as u64,
                content_type: f.content_type.clone(),
                storage_id: format!("blob-{}", fid),
                created_at: Some("2024-03-01T10:15:00Z".to_string()),
                updated_at: None,
                tags: Vec::new(),
                metadata: Default::default(),
            })
            .collect();

        Ok(FolderContents {
            folder: info,
            subfolders,
            files,
        })
    }

    async fn create_folder(&self, request: &NewFolder) -> Result<CreatedFolder, ApiError> {
        self.state.lock().created.push(request.clone());
        let id = self.add_folder(&request.name, request.parent_id);
        Ok(CreatedFolder {
            id,
            name: request.name.clone(),
            parent_id: Some(request.parent_id.unwrap_or(FolderId(ROOT_ID))),
        })
    }

    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        folder_id: Option<FolderId>,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        let mut uploaded = Vec::new();
        for file in files {
            let id = self.add_file(&file.name, folder_id, &file.bytes);
            uploaded.push(UploadedFile {
                id: id.to_string(),
                name: file.name,
                folder_id: Some(folder_id.unwrap_or(FolderId(ROOT_ID))),
                size: file.bytes.len() as u64,
                content_type: file.content_type,
                storage_id: Some(format!("blob-{}", id)),
            });
        }
        Ok(uploaded)
    }

    async fn download_file(&self, file_id: FileId) -> Result<Vec<u8>, ApiError> {
        self.state
            .lock()
            .files
            .get(&file_id.0)
            .map(|f| f.bytes.clone())
            .ok_or_else(|| ApiError::StatusError {
                status: 404,
                message: "File not found".to_string(),
            })
    }

    async fn health(&self) -> Result<Health, ApiError> {
        Ok(Health {
            status: "ok".to_string(),
        })
    }

    async fn banner(&self) -> Result<String, ApiError> {
        Ok("ByteBucket fake server".to_string())
    }
}
