//! Storehub CLI - database migrations and store management.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sh-cli migrate
//!
//! # Create a store for a user
//! sh-cli stores create -u user_2abc -n "Summer Shop"
//!
//! # List a user's stores
//! sh-cli stores list -u user_2abc
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `stores create` - Create a store for a user
//! - `stores list` - List a user's stores
//! - `stores default` - Show the store a user's dashboard opens first

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sh-cli")]
#[command(author, version, about = "Storehub CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage stores
    Stores {
        #[command(subcommand)]
        action: StoreAction,
    },
}

#[derive(Subcommand)]
enum StoreAction {
    /// Create a store owned by a user
    Create {
        /// Owner's user id (identity provider subject)
        #[arg(short, long)]
        user: String,

        /// Store name
        #[arg(short, long)]
        name: String,
    },
    /// List a user's stores
    List {
        /// Owner's user id (identity provider subject)
        #[arg(short, long)]
        user: String,
    },
    /// Show the store a user's dashboard opens first
    Default {
        /// Owner's user id (identity provider subject)
        #[arg(short, long)]
        user: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Stores { action } => match action {
            StoreAction::Create { user, name } => {
                commands::stores::create(&user, &name).await?;
            }
            StoreAction::List { user } => commands::stores::list(&user).await?,
            StoreAction::Default { user } => commands::stores::default_store(&user).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_store_create() {
        let cli = Cli::try_parse_from(["sh-cli", "stores", "create", "-u", "user_1", "-n", "Shop"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Stores {
                action: StoreAction::Create { .. }
            })
        ));
    }
}
