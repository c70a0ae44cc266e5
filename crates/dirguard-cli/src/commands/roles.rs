//! Role management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use dirguard_auth::rbac::ensure_default_roles;
use dirguard_core::error::AppError;
use dirguard_database::repositories::{PgRoleRepository, RoleRepository};
use dirguard_entity::Role;

/// Arguments for role commands
#[derive(Debug, Args)]
pub struct RoleArgs {
    /// Role subcommand
    #[command(subcommand)]
    pub command: RoleCommand,
}

/// Role subcommands
#[derive(Debug, Subcommand)]
pub enum RoleCommand {
    /// Create the built-in admin and guest roles if missing
    Seed,
    /// List all roles
    List,
}

/// Role display row
#[derive(Debug, Serialize, Tabled)]
struct RoleRow {
    /// Role ID
    id: String,
    /// Name
    name: String,
    /// Permission bits
    permission: String,
    /// Path limited
    path_limit: String,
    /// Base paths
    base_paths: String,
    /// Description
    description: String,
}

impl From<&Role> for RoleRow {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.to_string(),
            name: role.name.clone(),
            permission: format!("{:#06x}", role.permission.bits()),
            path_limit: if role.check_path_limit() { "✓" } else { "✗" }.to_string(),
            base_paths: role.base_paths.join(", "),
            description: role.description.clone(),
        }
    }
}

/// Execute role commands
pub async fn execute(args: &RoleArgs, pool: PgPool, format: OutputFormat) -> Result<(), AppError> {
    let repo = PgRoleRepository::new(pool);

    match &args.command {
        RoleCommand::Seed => {
            let created = ensure_default_roles(&repo).await?;
            if created.is_empty() {
                output::print_success("Default roles already present.");
            } else {
                let rows: Vec<RoleRow> = created.iter().map(RoleRow::from).collect();
                output::print_list(&rows, format);
            }
        }
        RoleCommand::List => {
            let roles = repo.list_roles().await?;
            let rows: Vec<RoleRow> = roles.iter().map(RoleRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
