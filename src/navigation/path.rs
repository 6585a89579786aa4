// Breadcrumb trail from the root to the current folder
use crate::types::FolderId;
use serde::{Deserialize, Serialize};

pub const ROOT_NAME: &str = "Root";

/// One breadcrumb entry. `id == None` is the root sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    pub id: Option<FolderId>,
    pub name: String,
}

impl NavigationItem {
    pub fn root() -> Self {
        Self {
            id: None,
            name: ROOT_NAME.to_string(),
        }
    }

    pub fn folder(id: FolderId, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: name.into(),
        }
    }

    pub fn is_root(&self) -> bool {
        self.id.is_none()
    }
}

/// Non-empty stack of breadcrumbs; index 0 is always the root sentinel and is the
/// only entry without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationPath {
    items: Vec<NavigationItem>,
}

impl Default for NavigationPath {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationPath {
    pub fn new() -> Self {
        Self {
            items: vec![NavigationItem::root()],
        }
    }

    pub fn items(&self) -> &[NavigationItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NavigationItem> {
        self.items.get(index)
    }

    pub fn last(&self) -> &NavigationItem {
        // Never empty: constructed with the root and truncated to at least one entry.
        &self.items[self.items.len() - 1]
    }

    pub fn is_at_root(&self) -> bool {
        self.items.len() == 1
    }

    /// Push a folder unless it is already the last entry. Returns whether it was pushed.
    pub fn push(&mut self, id: FolderId, name: impl Into<String>) -> bool {
        if self.last().id == Some(id) {
            return false;
        }
        self.items.push(NavigationItem::folder(id, name));
        true
    }

    /// Keep entries `0..=index`. Out-of-range indices leave the path alone.
    pub fn truncate_to(&mut self, index: usize) -> bool {
        if index >= self.items.len() {
            return false;
        }
        self.items.truncate(index + 1);
        true
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }
}
