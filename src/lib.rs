//! ByteBucket: folder navigation client for a ByteBucket storage server
//!
//! Tracks where a user is in the folder hierarchy (current folder plus breadcrumb
//! trail), fetches listings through a pluggable storage API with a staleness cache,
//! and exposes the whole thing as a CLI and an interactive browser.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;
pub mod navigation;
pub mod session;
pub mod tooling;
pub mod types;
