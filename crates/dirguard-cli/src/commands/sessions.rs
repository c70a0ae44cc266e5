//! Device session CLI commands.

use std::sync::Arc;

use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;
use sqlx::PgPool;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use dirguard_auth::session::{SessionCleanup, SessionEvictor, SessionStore};
use dirguard_core::config::AppConfig;
use dirguard_core::error::AppError;
use dirguard_core::types::UserId;
use dirguard_database::repositories::PgSessionRepository;
use dirguard_entity::{DeviceKey, Session};

/// Arguments for session commands
#[derive(Debug, Args)]
pub struct SessionArgs {
    /// Session subcommand
    #[command(subcommand)]
    pub command: SessionCommand,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List Active sessions
    List {
        /// Only sessions of this user
        #[arg(long)]
        user: Option<UserId>,
    },
    /// Mark a device's session Inactive
    Evict {
        /// Device key
        device_key: String,
    },
    /// Delete sessions idle longer than the configured threshold
    Sweep,
    /// Delete Inactive sessions
    Purge {
        /// Only sessions of this user
        #[arg(long)]
        user: Option<UserId>,
    },
}

/// Session display row
#[derive(Debug, Serialize, Tabled)]
struct SessionRow {
    /// User ID
    user_id: String,
    /// Device
    device_key: String,
    /// Last Active
    last_active: String,
    /// IP Address
    ip: String,
    /// User Agent
    user_agent: String,
}

impl From<&Session> for SessionRow {
    fn from(s: &Session) -> Self {
        Self {
            user_id: s.user_id.to_string(),
            device_key: s.device_key.to_string(),
            last_active: s.last_active.format("%Y-%m-%d %H:%M:%S").to_string(),
            ip: s.ip.clone(),
            user_agent: s.user_agent.clone(),
        }
    }
}

/// Execute session commands
pub async fn execute(
    args: &SessionArgs,
    config: &AppConfig,
    pool: PgPool,
    format: OutputFormat,
) -> Result<(), AppError> {
    let store = Arc::new(SessionStore::new(Arc::new(PgSessionRepository::new(pool))));

    match &args.command {
        SessionCommand::List { user } => {
            let sessions = match user {
                Some(user_id) => store.list_sessions_by_user(*user_id).await?,
                None => store.list_sessions().await?,
            };
            let rows: Vec<SessionRow> = sessions.iter().map(SessionRow::from).collect();
            output::print_list(&rows, format);
        }
        SessionCommand::Evict { device_key } => {
            let evictor = SessionEvictor::new(store, config.session.clone());
            evictor.evict_any(&DeviceKey::new(device_key.as_str())).await?;
            output::print_success(&format!("Session {device_key} evicted"));
        }
        SessionCommand::Sweep => {
            let cleanup = SessionCleanup::new(store, config.session.clone());
            let removed = cleanup.sweep(Utc::now()).await?;
            output::print_count("Stale sessions removed", removed, format);
        }
        SessionCommand::Purge { user } => {
            let cleanup = SessionCleanup::new(store, config.session.clone());
            let removed = cleanup.purge_inactive(*user).await?;
            output::print_count("Inactive sessions removed", removed, format);
        }
    }

    Ok(())
}
