//! CLI command definitions and dispatch.

pub mod migrate;
pub mod roles;
pub mod sessions;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use dirguard_core::config::AppConfig;
use dirguard_core::error::AppError;
use dirguard_database::DatabasePool;

/// Dirguard: path-scoped permissions and device session administration
#[derive(Debug, Parser)]
#[command(name = "dirguard", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Log progress to stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Role management
    Roles(roles::RoleArgs),
    /// Device session management
    Sessions(sessions::SessionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        let config = AppConfig::load(&self.config)?;
        let pool = DatabasePool::connect(&config.database).await?.into_pool();

        match &self.command {
            Commands::Migrate => migrate::execute(&pool).await,
            Commands::Roles(args) => roles::execute(args, pool, self.format).await,
            Commands::Sessions(args) => sessions::execute(args, &config, pool, self.format).await,
        }
    }
}
