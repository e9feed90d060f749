// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hearth - terminal client for a household-management backend.
//!
//! This is the binary entry point. The SDK crates do the actual work; this
//! crate only loads config, sets up logging, and maps subcommands onto them.

use clap::{Parser, Subcommand};
use hearth_client::ListsClient;
use hearth_client::lists::Item;
use hearth_mutation::MutationCoordinator;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

/// Hearth - terminal client for a household-management backend.
#[derive(Parser, Debug)]
#[command(name = "hearth", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check configuration and backend reachability.
    Doctor,
    /// Show the active group's lists.
    Lists,
    /// Work with list items.
    Items {
        #[command(subcommand)]
        command: ItemsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ItemsCommand {
    /// Add an item to a list.
    Add { list_id: i64, name: String },
    /// Toggle an item checked/unchecked.
    Check { list_id: i64, item_id: i64 },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match config::load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("hearth: config error: {error}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log.level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    let gateway = match commands::build_gateway(&config) {
        Ok(gateway) => gateway,
        Err(error) => {
            eprintln!("hearth: {error}");
            std::process::exit(1);
        }
    };
    let lists = ListsClient::new(gateway.clone());
    let items_coord: MutationCoordinator<Item> = MutationCoordinator::new();

    let result = match cli.command {
        Commands::Doctor => commands::doctor(&config, &gateway).await,
        Commands::Lists => commands::show_lists(&lists).await,
        Commands::Items { command } => match command {
            ItemsCommand::Add { list_id, name } => {
                commands::add_item(&lists, &items_coord, list_id, name).await
            }
            ItemsCommand::Check { list_id, item_id } => {
                commands::check_item(&lists, &items_coord, list_id, item_id).await
            }
        },
    };

    if let Err(error) = result {
        eprintln!("hearth: {error}");
        std::process::exit(1);
    }
}
