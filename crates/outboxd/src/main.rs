use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use outbox_core::{OutboxConfig, Platform};
use outbox_scheduler::{ScheduleRegistry, SchedulerLoop};
use outbox_social::{DryRunPublisher, PublisherSet};
use outbox_store::JobStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "outboxd=info,outbox_scheduler=info,outbox_store=info".into()),
        )
        .init();

    // load config: explicit path > OUTBOX_CONFIG env > ~/.outbox/outbox.toml
    let config_path = std::env::var("OUTBOX_CONFIG").ok();
    let config = OutboxConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        OutboxConfig::default()
    });

    let db_path = &config.database.path;
    ensure_parent_dir(db_path);
    info!(path = %db_path, "opening SQLite database");

    let db = rusqlite::Connection::open(db_path)?;
    db.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    outbox_store::init_db(&db)?;
    info!("database migrations complete");

    let store = Arc::new(JobStore::new(db));
    let registry = Arc::new(ScheduleRegistry::new());

    // Real clients are wired in by downstream deployments; out of the box
    // every platform gets the dry-run publisher so the delivery cycle can
    // be exercised without credentials.
    let mut publishers = PublisherSet::new();
    let dry_run = Arc::new(DryRunPublisher::default());
    publishers.register(Platform::Twitter, dry_run.clone());
    publishers.register(Platform::Instagram, dry_run);

    let mut scheduler = SchedulerLoop::new(
        store,
        Arc::new(publishers),
        registry,
        Duration::from_secs(config.scheduler.poll_interval_secs),
    );
    scheduler.start();

    tokio::signal::ctrl_c().await?;
    info!("shutdown signal received");
    scheduler.stop().await;

    Ok(())
}

fn ensure_parent_dir(path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("could not create database directory: {e}");
            }
        }
    }
}
