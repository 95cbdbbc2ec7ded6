// SPDX-FileCopyrightText: 2026 Courier Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Courier - a webhook message relay.
//!
//! This is the binary entry point for the Courier service.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod serve;

/// Courier - a webhook message relay.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (otherwise the XDG hierarchy is used).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay server.
    Serve,
    /// Load and validate the configuration, then exit.
    CheckConfig,
}

fn load_config(path: Option<&PathBuf>) -> courier_config::CourierConfig {
    let result = match path {
        Some(path) => courier_config::load_and_validate_path(path),
        None => courier_config::load_and_validate(),
    };
    match result {
        Ok(config) => config,
        Err(errors) => {
            for error in &errors {
                eprintln!("courier: config error: {error}");
            }
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("courier: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::CheckConfig) => {
            println!(
                "courier: config ok (server {}:{}, db {})",
                config.server.host, config.server.port, config.storage.database_path
            );
        }
    }
}
