//! Dirguard server
//!
//! Wires the crates together: applies migrations, seeds the built-in roles,
//! and runs the stale-session sweep until shutdown.

use std::sync::Arc;

use chrono::Utc;
use tracing_subscriber::{EnvFilter, fmt};

use dirguard_auth::rbac::ensure_default_roles;
use dirguard_auth::session::{SessionCleanup, SessionStore};
use dirguard_core::config::AppConfig;
use dirguard_core::error::AppError;
use dirguard_database::DatabasePool;
use dirguard_database::repositories::{PgRoleRepository, PgSessionRepository};
use dirguard_worker::SweepScheduler;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("DIRGUARD_CONFIG").unwrap_or_else(|_| "config/default".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Dirguard v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    let pool = db.pool().clone();
    dirguard_database::migration::run_migrations(&pool).await?;

    let roles = PgRoleRepository::new(pool.clone());
    let created = ensure_default_roles(&roles).await?;
    tracing::info!(created = created.len(), "Default roles ensured");

    let store = Arc::new(SessionStore::new(Arc::new(PgSessionRepository::new(
        pool.clone(),
    ))));
    let cleanup = Arc::new(SessionCleanup::new(store, config.session.clone()));

    // Catch up on anything that went stale while the server was down.
    cleanup.sweep(Utc::now()).await?;

    let mut scheduler = SweepScheduler::new(cleanup).await?;
    scheduler.register(&config.session.sweep_cron).await?;
    scheduler.start().await?;

    tracing::info!(
        max_active_sessions = config.session.max_active_sessions,
        overflow_strategy = %config.session.overflow_strategy,
        "Dirguard ready"
    );

    shutdown_signal().await;
    tracing::info!("Shutdown signal received");

    scheduler.shutdown().await?;
    db.close().await;

    tracing::info!("Dirguard stopped");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
