//! CLI Tooling
//!
//! Command-line interface for browsing and managing a ByteBucket server.

use crate::api::{HttpStorageClient, StorageApi};
use crate::cache::ListingCache;
use crate::config::{BucketConfig, ConfigLoader};
use crate::error::ApiError;
use crate::session::{ExplorerSession, SessionOptions};
use crate::tooling::format::{
    format_downloads_text, format_health_json, format_health_text, format_listing_json,
    format_listing_text, format_uploaded_text,
};
use crate::tooling::shell;
use crate::types::{FileId, FolderId};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// ByteBucket CLI - browse folders and files on a ByteBucket server
#[derive(Parser, Debug)]
#[command(name = "bytebucket")]
#[command(version, about = "Browse and manage files on a ByteBucket server")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL (overrides config and environment)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check that the server is reachable and healthy
    Health {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// List a folder's subfolders and files
    Ls {
        /// Folder id (root when omitted)
        #[arg(long)]
        folder: Option<FolderId>,
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Create a folder
    Mkdir {
        /// Folder name
        name: String,
        /// Parent folder id (root when omitted)
        #[arg(long)]
        parent: Option<FolderId>,
    },
    /// Upload one or more local files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Target folder id (root when omitted)
        #[arg(long)]
        folder: Option<FolderId>,
    },
    /// Download one or more stored files
    Download {
        /// File ids
        #[arg(required = true)]
        file_ids: Vec<FileId>,
        /// Folder holding the files, used to name them (root when omitted)
        #[arg(long)]
        folder: Option<FolderId>,
        /// Destination file, or directory (required to be a directory for several files)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Browse folders interactively
    Browse {
        /// Folder id to start in (root when omitted)
        #[arg(long)]
        folder: Option<FolderId>,
    },
    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn check_format(format: &str) -> Result<(), ApiError> {
    match format {
        "text" | "json" => Ok(()),
        other => Err(ApiError::InvalidInput(format!(
            "Invalid format: {} (must be 'text' or 'json')",
            other
        ))),
    }
}

/// CLI context holding the resolved configuration, storage client and runtime
pub struct CliContext {
    config: BucketConfig,
    config_path: Option<PathBuf>,
    api: Arc<dyn StorageApi>,
    cache: Arc<ListingCache>,
    runtime: Runtime,
}

impl CliContext {
    /// Load configuration, apply a `--base-url` override and build the HTTP client.
    pub fn new(config_path: Option<PathBuf>, base_url: Option<String>) -> Result<Self, ApiError> {
        let mut config = ConfigLoader::load(config_path.as_deref())?;
        if let Some(url) = base_url {
            config.api.base_url = url;
        }
        let client = HttpStorageClient::from_config(&config.api)?;
        Self::with_api(config, config_path, Arc::new(client))
    }

    /// Build a context around an existing storage backend.
    pub fn with_api(
        config: BucketConfig,
        config_path: Option<PathBuf>,
        api: Arc<dyn StorageApi>,
    ) -> Result<Self, ApiError> {
        let cache = Arc::new(ListingCache::new(Duration::from_secs(
            config.cache.stale_secs,
        )));
        let runtime = Runtime::new()?;
        Ok(Self {
            config,
            config_path,
            api,
            cache,
            runtime,
        })
    }

    pub fn config(&self) -> &BucketConfig {
        &self.config
    }

    fn session(&self, initial_folder: Option<FolderId>) -> ExplorerSession {
        ExplorerSession::new(
            Arc::clone(&self.api),
            Arc::clone(&self.cache),
            SessionOptions {
                initial_folder,
                root_folder_id: self.config.api.root_folder_id.map(FolderId),
            },
        )
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Health { format } => self.handle_health(format),
            Commands::Ls { folder, format } => self.handle_ls(*folder, format),
            Commands::Mkdir { name, parent } => self.handle_mkdir(name, *parent),
            Commands::Upload { files, folder } => self.handle_upload(files, *folder),
            Commands::Download {
                file_ids,
                folder,
                output,
            } => self.handle_download(file_ids, *folder, output.as_deref()),
            Commands::Browse { folder } => {
                let mut session = self.session(*folder);
                shell::run_browser(&self.runtime, &mut session)
            }
            Commands::Config { command } => self.handle_config_command(command),
        }
    }

    fn handle_health(&self, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let mut session = self.session(None);
        let health = self.runtime.block_on(session.health())?;
        if format == "json" {
            return format_health_json(&self.config.api.base_url, &health);
        }
        let banner = self.runtime.block_on(self.api.banner()).ok();
        Ok(format_health_text(
            &self.config.api.base_url,
            &health,
            banner.as_deref(),
        ))
    }

    fn handle_ls(&self, folder: Option<FolderId>, format: &str) -> Result<String, ApiError> {
        check_format(format)?;
        let mut session = self.session(folder);
        self.runtime.block_on(session.refresh())?;
        let tracker = session.tracker();
        let mut contents = match tracker.listing() {
            Some(listing) => listing.clone(),
            None => return Err(ApiError::DecodeError("No listing received".to_string())),
        };
        contents.subfolders = tracker.subfolders().into_iter().cloned().collect();

        let breadcrumb = tracker.view_breadcrumbs();

        if format == "json" {
            format_listing_json(&breadcrumb, &contents)
        } else {
            Ok(format_listing_text(&breadcrumb, &contents))
        }
    }

    fn handle_mkdir(&self, name: &str, parent: Option<FolderId>) -> Result<String, ApiError> {
        let mut session = self.session(parent);
        let created = self.runtime.block_on(session.create_folder(name))?;
        Ok(format!(
            "Created folder: {} (id {})",
            created.name, created.id
        ))
    }

    fn handle_upload(
        &self,
        files: &[PathBuf],
        folder: Option<FolderId>,
    ) -> Result<String, ApiError> {
        let mut session = self.session(folder);
        let uploaded = self.runtime.block_on(session.upload_paths(files))?;
        Ok(format_uploaded_text(&uploaded))
    }

    /// Fails only when every requested file failed.
    fn handle_download(
        &self,
        file_ids: &[FileId],
        folder: Option<FolderId>,
        output: Option<&Path>,
    ) -> Result<String, ApiError> {
        let mut session = self.session(folder);
        // The listing supplies file names; without it files are saved as file_<id>
        if let Err(e) = self.runtime.block_on(session.refresh()) {
            warn!(error = %e, folder = ?folder, "Could not load folder listing for download names");
        }
        let outcomes = self
            .runtime
            .block_on(session.download_many(file_ids, output))?;
        if outcomes.iter().all(|o| o.result.is_err()) {
            if let Some(error) = outcomes.into_iter().find_map(|o| o.result.err()) {
                return Err(error);
            }
            return Err(ApiError::InvalidInput("No files downloaded".to_string()));
        }
        Ok(format_downloads_text(&outcomes))
    }

    fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, ApiError> {
        match command {
            ConfigCommands::Show => toml::to_string_pretty(&self.config).map_err(|e| {
                ApiError::ConfigError(format!("Failed to serialize config: {}", e))
            }),
            ConfigCommands::Init { force } => init_config(self.config_path.as_deref(), *force),
        }
    }
}

/// Write the default configuration to `config_path`, or the global config file.
///
/// Runs without a [`CliContext`] since the target file may not exist yet.
pub fn init_config(config_path: Option<&Path>, force: bool) -> Result<String, ApiError> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => ConfigLoader::global_config_path()?,
    };
    let written = ConfigLoader::write_default(&path, force)?;
    info!(path = %written.display(), "Wrote default configuration");
    Ok(format!("Wrote default configuration to {}", written.display()))
}
