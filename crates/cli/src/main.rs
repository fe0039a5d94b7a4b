//! Cartkeeper CLI - Database migrations and catalogue tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (products + session store)
//! ck-cli migrate
//!
//! # Load or update the product catalogue
//! ck-cli seed products catalogue.yaml
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ck-cli")]
#[command(author, version, about = "Cartkeeper CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Upsert products from a YAML catalogue
    Products {
        /// Path to the catalogue file
        file: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Products { file } => commands::seed::products(&file).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_seed_products() {
        let cli = Cli::try_parse_from(["ck-cli", "seed", "products", "catalogue.yaml"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed {
                target: SeedTarget::Products { ref file }
            }) if file == "catalogue.yaml"
        ));
    }
}
