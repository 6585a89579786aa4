//! Tooling Layer
//!
//! Command-line interface, interactive browser and text/JSON rendering on top of
//! [`crate::session::ExplorerSession`].

pub mod cli;
pub mod format;
pub mod shell;

pub use cli::{Cli, CliContext, Commands, ConfigCommands};
