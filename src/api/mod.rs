//! Storage API boundary
//!
//! The session and the rendering layer only talk to [`StorageApi`]; the HTTP
//! implementation and all wire-format handling live below this module.

pub mod http;
pub mod model;
pub mod wire;

use crate::error::ApiError;
use crate::types::{FileId, FolderId};
use async_trait::async_trait;

pub use http::{HttpStorageClient, RetryPolicy};
pub use model::{
    content_type_for, CreatedFolder, FileItem, FolderContents, FolderInfo, Health, NewFolder,
    SubfolderItem, UploadFile, UploadedFile,
};

/// Remote storage operations consumed by an explorer session.
#[async_trait]
pub trait StorageApi: Send + Sync {
    /// Listing of a folder; `None` asks for the root.
    async fn folder_contents(&self, folder_id: Option<FolderId>)
        -> Result<FolderContents, ApiError>;

    async fn create_folder(&self, request: &NewFolder) -> Result<CreatedFolder, ApiError>;

    /// Store files, optionally inside a folder (root otherwise).
    async fn upload_files(
        &self,
        files: Vec<UploadFile>,
        folder_id: Option<FolderId>,
    ) -> Result<Vec<UploadedFile>, ApiError>;

    /// Raw bytes of a stored file.
    async fn download_file(&self, file_id: FileId) -> Result<Vec<u8>, ApiError>;

    async fn health(&self) -> Result<Health, ApiError>;

    /// Plain-text server banner.
    async fn banner(&self) -> Result<String, ApiError>;
}
