//! Client-side folder navigation: the breadcrumb path and the tracker that owns it.

mod path;
mod tracker;

pub use path::{NavigationItem, NavigationPath, ROOT_NAME};
pub use tracker::NavigationTracker;
