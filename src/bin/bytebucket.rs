//! ByteBucket CLI Binary
//!
//! Command-line interface for browsing and managing a ByteBucket server.

use bytebucket::logging::init_logging;
use bytebucket::tooling::cli::{init_config, Cli, CliContext, Commands, ConfigCommands};
use clap::Parser;
use std::process;

fn main() {
    let cli = Cli::parse();

    // The config file named by --config may not exist before init
    if let Commands::Config {
        command: ConfigCommands::Init { force },
    } = &cli.command
    {
        match init_config(cli.config.as_deref(), *force) {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    // Create CLI context
    let context = match CliContext::new(cli.config.clone(), cli.base_url.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            process::exit(1);
        }
    };

    let logging = context
        .config()
        .logging
        .clone()
        .with_env_overrides()
        .with_overrides(
            cli.verbose,
            cli.log_level.as_deref(),
            cli.log_format.as_deref(),
            cli.log_output.as_deref(),
            cli.log_file.as_deref(),
        );
    if let Err(e) = init_logging(Some(&logging)) {
        eprintln!("Error initializing logging: {}", e);
        process::exit(1);
    }

    // Execute command
    match context.execute(&cli.command) {
        Ok(output) => {
            println!("{}", output);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}
