use clap::{Parser, Subcommand};
use std::path::Path;

use crate::adapters::PostgresStore;
use crate::config::Config;
use crate::services::AccountService;
use crate::startup::{mask_password, validate_environment};

#[derive(Parser)]
#[command(name = "bank-core")]
#[command(about = "Bank Core - accounts, deposits, withdrawals and transfers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Account inspection commands
    #[command(subcommand)]
    Account(AccountCommands),

    /// Configuration validation
    Config,
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

#[derive(Subcommand)]
pub enum AccountCommands {
    /// List every account
    List,

    /// Show one account by number
    Show {
        /// Account number
        #[arg(value_name = "NUMBER")]
        number: i64,
    },
}

pub async fn handle_db_migrate(config: &Config, migrations: &Path) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool, migrations).await?;
    println!("Database migrations completed");

    Ok(())
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Max Connections: {}", config.database_max_connections);
    println!(
        "  CORS Origins: {}",
        config.cors_allowed_origins.as_deref().unwrap_or("*")
    );

    let pool = match crate::db::create_pool(config).await {
        Ok(pool) => Some(pool),
        Err(e) => {
            tracing::warn!(error = %e, "Database connection failed");
            None
        }
    };

    let report = validate_environment(config, pool.as_ref()).await;
    report.print();

    if !report.is_valid() {
        anyhow::bail!("Configuration is invalid");
    }

    tracing::info!("Configuration is valid");
    Ok(())
}

pub async fn handle_account_command(config: &Config, command: AccountCommands) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;
    let service = AccountService::new(std::sync::Arc::new(PostgresStore::new(pool)));

    match command {
        AccountCommands::List => {
            let accounts = service.list_all().await?;
            if accounts.is_empty() {
                println!("No accounts found");
                return Ok(());
            }

            println!("{:<12} {:<30} {:>16} {:>16}", "Number", "Name", "Balance", "Limit");
            println!("{}", "-".repeat(77));
            for account in accounts {
                println!(
                    "{:<12} {:<30} {:>16} {:>16}",
                    account.number, account.name, account.balance, account.special_limit
                );
            }
        }
        AccountCommands::Show { number } => match service.get_by_number(number).await? {
            Some(account) => println!("{}", serde_json::to_string_pretty(&account)?),
            None => anyhow::bail!("Account {} not found", number),
        },
    }

    Ok(())
}
