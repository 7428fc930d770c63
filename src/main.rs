use anyhow::Result;
use clap::Parser;

use upkeep::cli::{Cli, Commands};
use upkeep::dispatcher;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Init => dispatcher::dispatch_init(cli.json),

        Commands::Assets { action } => dispatcher::assets::dispatch_assets(action, cli.json),

        Commands::Categories { action } => {
            dispatcher::categories::dispatch_categories(action, cli.json)
        }

        Commands::Expenses { action } => dispatcher::expenses::dispatch_expenses(action, cli.json),

        Commands::Stats { asset, at } => {
            dispatcher::stats::dispatch_stats(asset, at.as_deref(), cli.json)
        }

        Commands::Export { path } => dispatcher::transfer::dispatch_export(&path, cli.json),

        Commands::Import { path } => dispatcher::transfer::dispatch_import(&path, cli.json),

        Commands::Backup { action } => dispatcher::backup::dispatch_backup(action, cli.json).await,
    }
}
