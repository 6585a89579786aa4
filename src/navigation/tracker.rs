// Navigation state - current folder, breadcrumb trail and the latest listing
use super::path::{NavigationItem, NavigationPath};
use crate::api::model::{FileItem, FolderContents, FolderInfo, SubfolderItem};
use crate::types::{FolderId, QueryKey};
use tracing::{debug, warn};

/// Tracks where a session is in the folder hierarchy.
///
/// Transitions are synchronous and never perform I/O. The tracker holds exactly one
/// query key (the current folder); whoever fetches listings hands results back through
/// [`NavigationTracker::accept_listing`], which drops anything fetched for a key that is
/// no longer current.
#[derive(Debug, Clone)]
pub struct NavigationTracker {
    current_folder_id: Option<FolderId>,
    path: NavigationPath,
    listing: Option<FolderContents>,
    root_backing_id: Option<FolderId>,
    root_backing_pinned: bool,
}

impl Default for NavigationTracker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl NavigationTracker {
    /// Start at `initial_folder_id` (root when `None`) with a root-only breadcrumb trail.
    pub fn new(initial_folder_id: Option<FolderId>) -> Self {
        Self {
            current_folder_id: initial_folder_id,
            path: NavigationPath::new(),
            listing: None,
            root_backing_id: None,
            root_backing_pinned: false,
        }
    }

    /// Fix the server's real root id instead of learning it from root listings.
    pub fn with_root_backing_id(mut self, id: Option<FolderId>) -> Self {
        if id.is_some() {
            self.root_backing_id = id;
            self.root_backing_pinned = true;
        }
        self
    }

    /// Enter a child folder.
    pub fn descend(&mut self, folder_id: FolderId, folder_name: &str) {
        let pushed = self.path.push(folder_id, folder_name);
        debug!(folder_id = %folder_id, name = folder_name, pushed, "Descend");
        self.set_current(Some(folder_id));
    }

    /// Return to breadcrumb `index`, dropping everything after it.
    ///
    /// Out-of-range indices are ignored. Returns whether the path or key changed.
    pub fn jump_to_index(&mut self, index: usize) -> bool {
        let target = match self.path.get(index) {
            Some(item) => item.id,
            None => {
                warn!(
                    index,
                    path_len = self.path.len(),
                    "Ignoring out-of-range breadcrumb jump"
                );
                return false;
            }
        };
        let before_len = self.path.len();
        let before_key = self.current_folder_id;
        self.path.truncate_to(index);
        self.set_current(target);
        debug!(index, folder_id = ?target, "Jump to breadcrumb");
        before_len != self.path.len() || before_key != self.current_folder_id
    }

    /// Go to the parent breadcrumb; no-op at the root.
    pub fn ascend(&mut self) -> bool {
        if self.path.is_at_root() {
            return false;
        }
        self.jump_to_index(self.path.len() - 2)
    }

    /// Back to the root with a single-entry path.
    pub fn reset(&mut self) {
        debug!("Reset navigation to root");
        self.path = NavigationPath::new();
        self.set_current(None);
    }

    fn set_current(&mut self, folder_id: Option<FolderId>) {
        if self.current_folder_id != folder_id {
            self.listing = None;
        }
        self.current_folder_id = folder_id;
    }

    /// Store a fetched listing if it belongs to the current key.
    pub fn accept_listing(&mut self, key: QueryKey, contents: FolderContents) -> bool {
        if key != self.current_folder_id {
            debug!(
                fetched = ?key,
                current = ?self.current_folder_id,
                "Discarding listing for superseded folder"
            );
            return false;
        }
        if key.is_none() && !self.root_backing_pinned {
            if let Some(root_id) = contents.folder.id {
                self.root_backing_id = Some(root_id);
            }
        }
        self.listing = Some(contents);
        true
    }

    pub fn current_folder_id(&self) -> Option<FolderId> {
        self.current_folder_id
    }

    /// Key the next listing fetch must use.
    pub fn query_key(&self) -> QueryKey {
        self.current_folder_id
    }

    pub fn path(&self) -> &NavigationPath {
        &self.path
    }

    pub fn breadcrumbs(&self) -> &[NavigationItem] {
        self.path.items()
    }

    pub fn can_navigate_back(&self) -> bool {
        self.path.len() > 1
    }

    /// True when the session started inside a folder that is not on the breadcrumb trail.
    pub fn is_detached(&self) -> bool {
        self.current_folder_id != self.path.last().id
    }

    /// Breadcrumbs for display. A detached current folder is appended after the trail,
    /// named from its listing once loaded.
    pub fn view_breadcrumbs(&self) -> Vec<NavigationItem> {
        let mut items = self.path.items().to_vec();
        if let (true, Some(id)) = (self.is_detached(), self.current_folder_id) {
            let name = self
                .current_folder()
                .map(|f| f.name.clone())
                .unwrap_or_else(|| format!("Folder {}", id));
            items.push(NavigationItem::folder(id, name));
        }
        items
    }

    pub fn root_backing_id(&self) -> Option<FolderId> {
        self.root_backing_id
    }

    pub fn is_loaded(&self) -> bool {
        self.listing.is_some()
    }

    pub fn listing(&self) -> Option<&FolderContents> {
        self.listing.as_ref()
    }

    pub fn current_folder(&self) -> Option<&FolderInfo> {
        self.listing.as_ref().map(|l| &l.folder)
    }

    /// Subfolders of the latest listing, minus any echo of the root folder itself.
    pub fn subfolders(&self) -> Vec<&SubfolderItem> {
        let root = self.root_backing_id;
        self.listing
            .iter()
            .flat_map(|l| l.subfolders.iter())
            .filter(|f| Some(f.id) != root)
            .collect()
    }

    pub fn files(&self) -> &[FileItem] {
        self.listing
            .as_ref()
            .map(|l| l.files.as_slice())
            .unwrap_or(&[])
    }
}
