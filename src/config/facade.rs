//! ConfigLoader facade delegating to merge service.

use super::merge::MergeService;
use super::{paths, BucketConfig};
use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file, an optional explicit file and environment.
    pub fn load(explicit: Option<&Path>) -> Result<BucketConfig, ApiError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ApiError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        MergeService::load(explicit).map_err(ApiError::from)
    }

    /// Load configuration from a specific file only (plus environment).
    pub fn load_from_file(path: &Path) -> Result<BucketConfig, ApiError> {
        MergeService::load_from_file(path).map_err(ApiError::from)
    }

    /// Write the default configuration as TOML. Refuses to overwrite unless `force`.
    pub fn write_default(path: &Path, force: bool) -> Result<PathBuf, ApiError> {
        if path.exists() && !force {
            return Err(ApiError::ConfigError(format!(
                "Config file already exists: {} (use --force to overwrite)",
                path.display()
            )));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(&BucketConfig::default()).map_err(|e| {
            ApiError::ConfigError(format!("Failed to serialize default config: {}", e))
        })?;
        std::fs::write(path, contents)?;
        Ok(path.to_path_buf())
    }

    pub fn global_config_path() -> Result<PathBuf, ApiError> {
        paths::global_config_path()
    }
}
