//! Core identifier types for the ByteBucket client.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FolderId: server-assigned numeric key of a folder. The root folder has no FolderId
/// on the client side; it is represented as `None` wherever an id is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub u64);

/// FileId: server-assigned numeric key of a stored file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(pub u64);

/// QueryKey: the folder a listing belongs to (`None` = root). Keys fetches and the cache.
pub type QueryKey = Option<FolderId>;

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for FolderId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FolderId)
    }
}

impl FromStr for FileId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(FileId)
    }
}

impl From<u64> for FolderId {
    fn from(id: u64) -> Self {
        FolderId(id)
    }
}

impl From<u64> for FileId {
    fn from(id: u64) -> Self {
        FileId(id)
    }
}
