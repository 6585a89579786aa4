//! Platform directories for configuration and state.

use crate::error::ApiError;
use std::path::PathBuf;

fn project_dirs() -> Result<directories::ProjectDirs, ApiError> {
    directories::ProjectDirs::from("", "bytebucket", "bytebucket").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform directories (HOME not set)".to_string(),
        )
    })
}

/// Global config file: `$XDG_CONFIG_HOME/bytebucket/config.toml` on Linux.
pub fn global_config_path() -> Result<PathBuf, ApiError> {
    Ok(project_dirs()?.config_dir().join("config.toml"))
}

/// Directory for runtime state such as the default log file.
pub fn state_dir() -> Result<PathBuf, ApiError> {
    let dirs = project_dirs()?;
    // macOS and Windows have no state dir; fall back to the data dir there.
    Ok(dirs
        .state_dir()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| dirs.data_local_dir().to_path_buf()))
}
