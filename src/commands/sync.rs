//! Sync command - Catalog sync worker management.
//!
//! ## Usage
//!
//! ```bash
//! # Start the interval worker
//! cargo run -- sync work
//!
//! # Run a single pass
//! cargo run -- sync once
//! ```

use std::time::Duration;

use crate::cli::args::{SyncAction, SyncArgs};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{select_backend, Database};
use crate::jobs::SyncJob;
use crate::services::{ServiceContainer, Services};

/// Execute the sync command
pub async fn execute(args: SyncArgs, config: Config) -> AppResult<()> {
    let db = Database::connect(&config).await;

    let selection = select_backend(db.orm(), db.pool())?;
    if let Some(reason) = &selection.degraded {
        tracing::warn!(backend = %selection.backend, %reason, "Sync worker running degraded");
    }

    let services = Services::from_selection(&selection);
    let category_service = services.categories();

    match args.action {
        SyncAction::Once => {
            let job = SyncJob::new(
                category_service,
                Duration::from_secs(config.sync_interval_secs),
            );
            job.run_once().await
        }
        SyncAction::Work { interval } => {
            let secs = interval.unwrap_or(config.sync_interval_secs);
            let job = SyncJob::new(category_service, Duration::from_secs(secs));

            tracing::info!("Sync worker started. Press Ctrl+C to stop.");

            // Run with graceful shutdown on Ctrl+C
            tokio::select! {
                result = job.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received shutdown signal, stopping sync worker...");
                    Ok(())
                }
            }
        }
    }
}
