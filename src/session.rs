//! Explorer session
//!
//! Ties a [`NavigationTracker`] to a storage backend and a listing cache. The
//! tracker stays free of I/O; the session fetches listings for the tracker's
//! current key and hands them back for acceptance.

use crate::api::model::{CreatedFolder, Health, NewFolder, UploadFile, UploadedFile};
use crate::api::StorageApi;
use crate::cache::ListingCache;
use crate::error::ApiError;
use crate::navigation::NavigationTracker;
use crate::types::{FileId, FolderId};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest folder name accepted, in characters.
pub const MAX_FOLDER_NAME_LEN: usize = 255;

/// Where a session starts and how it recognizes the server's root folder.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub initial_folder: Option<FolderId>,
    pub root_folder_id: Option<FolderId>,
}

/// Result for one file of a [`ExplorerSession::download_many`] batch.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub file_id: FileId,
    pub result: Result<PathBuf, ApiError>,
}

pub struct ExplorerSession {
    api: Arc<dyn StorageApi>,
    cache: Arc<ListingCache>,
    tracker: NavigationTracker,
    last_error: Option<String>,
}

impl ExplorerSession {
    pub fn new(api: Arc<dyn StorageApi>, cache: Arc<ListingCache>, options: SessionOptions) -> Self {
        let tracker = NavigationTracker::new(options.initial_folder)
            .with_root_backing_id(options.root_folder_id);
        Self {
            api,
            cache,
            tracker,
            last_error: None,
        }
    }

    pub fn tracker(&self) -> &NavigationTracker {
        &self.tracker
    }

    pub fn cache(&self) -> &Arc<ListingCache> {
        &self.cache
    }

    /// Message of the most recent failed operation, cleared by the next successful fetch.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn descend(&mut self, folder_id: FolderId, folder_name: &str) {
        self.tracker.descend(folder_id, folder_name);
    }

    pub fn jump_to_index(&mut self, index: usize) -> bool {
        self.tracker.jump_to_index(index)
    }

    pub fn ascend(&mut self) -> bool {
        self.tracker.ascend()
    }

    pub fn reset(&mut self) {
        self.tracker.reset();
    }

    /// Load the listing for the current folder, from the cache when fresh.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        let key = self.tracker.query_key();
        if let Some(contents) = self.cache.get(key) {
            self.tracker.accept_listing(key, contents);
            self.last_error = None;
            return Ok(());
        }

        debug!(key = ?key, "Fetching folder contents");
        match self.api.folder_contents(key).await {
            Ok(contents) => {
                self.cache.insert(key, contents.clone());
                self.tracker.accept_listing(key, contents);
                self.last_error = None;
                Ok(())
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Drop the cached listing for the current folder and fetch it again.
    pub async fn reload(&mut self) -> Result<(), ApiError> {
        self.cache.invalidate(self.tracker.query_key());
        self.refresh().await
    }

    /// Create a folder inside the current one.
    pub async fn create_folder(&mut self, name: &str) -> Result<CreatedFolder, ApiError> {
        let name = match validate_folder_name(name) {
            Ok(name) => name,
            Err(e) => return Err(self.record(e)),
        };
        let parent = self.tracker.current_folder_id();
        let request = NewFolder {
            name: name.to_string(),
            parent_id: parent,
        };

        match self.api.create_folder(&request).await {
            Ok(created) => {
                info!(folder_id = %created.id, name = %created.name, parent = ?parent, "Folder created");
                self.cache.invalidate(parent);
                Ok(created)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Read local files and upload them into the current folder.
    pub async fn upload_paths(&mut self, paths: &[PathBuf]) -> Result<Vec<UploadedFile>, ApiError> {
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            match UploadFile::from_path(path) {
                Ok(file) => files.push(file),
                Err(e) => return Err(self.record(e)),
            }
        }
        self.upload_files(files).await
    }

    pub async fn upload_files(
        &mut self,
        files: Vec<UploadFile>,
    ) -> Result<Vec<UploadedFile>, ApiError> {
        if files.is_empty() {
            return Err(self.record(ApiError::InvalidInput(
                "No files selected for upload".to_string(),
            )));
        }
        let target = self.tracker.current_folder_id();
        let count = files.len();

        match self.api.upload_files(files, target).await {
            Ok(uploaded) => {
                info!(count, folder = ?target, "Files uploaded");
                self.cache.invalidate(target);
                Ok(uploaded)
            }
            Err(e) => Err(self.record(e)),
        }
    }

    /// Save a stored file locally and return the path written.
    ///
    /// Without `dest` the file lands in the working directory under its listing
    /// name (or `file_<id>` when the current listing doesn't know it). A `dest`
    /// that is an existing directory receives the file under that same name.
    pub async fn download(
        &mut self,
        file_id: FileId,
        dest: Option<&Path>,
    ) -> Result<PathBuf, ApiError> {
        let into_dir = match dest {
            Some(dest) => is_dir(dest).await,
            None => false,
        };
        let target = self.download_target(file_id, dest, into_dir);
        match fetch_to(self.api.as_ref(), file_id, target).await {
            Ok(path) => Ok(path),
            Err(e) => Err(self.record(e)),
        }
    }

    /// Download several files concurrently.
    ///
    /// With more than one id, `dest` must be an existing directory. Each file is
    /// named as in [`download`](Self::download); a name already taken in the batch
    /// gets an `<id>_` prefix. Repeated ids are fetched once. Per-file failures are
    /// returned in the outcomes and the first one is kept as the session's last error.
    pub async fn download_many(
        &mut self,
        file_ids: &[FileId],
        dest: Option<&Path>,
    ) -> Result<Vec<DownloadOutcome>, ApiError> {
        let mut seen = HashSet::new();
        let ids: Vec<FileId> = file_ids.iter().copied().filter(|id| seen.insert(*id)).collect();
        if ids.is_empty() {
            return Err(self.record(ApiError::InvalidInput(
                "No files selected for download".to_string(),
            )));
        }
        let into_dir = match dest {
            Some(dest) => is_dir(dest).await,
            None => false,
        };
        if let Some(dest) = dest.filter(|_| ids.len() > 1 && !into_dir) {
            return Err(self.record(ApiError::InvalidInput(format!(
                "{} is not a directory; several files need a directory destination",
                dest.display()
            ))));
        }

        let mut taken = HashSet::new();
        let mut targets = Vec::with_capacity(ids.len());
        for id in ids {
            let mut target = self.download_target(id, dest, into_dir);
            if !taken.insert(target.clone()) {
                let renamed = format!("{}_{}", id, self.download_name(id));
                target.set_file_name(renamed);
                taken.insert(target.clone());
            }
            targets.push((id, target));
        }

        let total = targets.len();
        let api = self.api.as_ref();
        let outcomes = join_all(targets.into_iter().map(|(file_id, target)| async move {
            DownloadOutcome {
                file_id,
                result: fetch_to(api, file_id, target).await,
            }
        }))
        .await;

        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        if let Some(error) = outcomes.iter().find_map(|o| o.result.as_ref().err()) {
            warn!(failed, total, error = %error, "Some downloads failed");
            self.last_error = Some(error.to_string());
        } else {
            info!(total, "Batch download finished");
        }
        Ok(outcomes)
    }

    fn download_target(&self, file_id: FileId, dest: Option<&Path>, into_dir: bool) -> PathBuf {
        let name = self.download_name(file_id);
        match dest {
            Some(dest) if into_dir => dest.join(name),
            Some(dest) => dest.to_path_buf(),
            None => PathBuf::from(name),
        }
    }

    fn download_name(&self, file_id: FileId) -> String {
        self.tracker
            .listing()
            .and_then(|l| l.find_file(file_id))
            .and_then(|f| Path::new(&f.name).file_name())
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("file_{}", file_id))
    }

    pub async fn health(&mut self) -> Result<Health, ApiError> {
        match self.api.health().await {
            Ok(health) => Ok(health),
            Err(e) => Err(self.record(e)),
        }
    }

    fn record(&mut self, error: ApiError) -> ApiError {
        warn!(error = %error, "Session operation failed");
        self.last_error = Some(error.to_string());
        error
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn fetch_to(
    api: &dyn StorageApi,
    file_id: FileId,
    target: PathBuf,
) -> Result<PathBuf, ApiError> {
    let bytes = api.download_file(file_id).await?;
    tokio::fs::write(&target, &bytes).await?;
    info!(file_id = %file_id, bytes = bytes.len(), path = %target.display(), "File downloaded");
    Ok(target)
}

/// Trim a folder name and check it is non-empty and short enough.
pub fn validate_folder_name(name: &str) -> Result<&str, ApiError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput(
            "Folder name cannot be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_FOLDER_NAME_LEN {
        return Err(ApiError::InvalidInput(format!(
            "Folder name is longer than {} characters",
            MAX_FOLDER_NAME_LEN
        )));
    }
    Ok(trimmed)
}
