//! Catalog sync background job.
//!
//! Periodically pulls the assembled category tree so downstream
//! consumers always have a fresh snapshot to compare against. Runs on a
//! fixed interval; one failed pass is logged and the next tick retries.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::CategoryNode;
use crate::errors::AppResult;
use crate::services::CategoryService;

/// Interval worker around the category tree
pub struct SyncJob {
    category_service: Arc<dyn CategoryService>,
    interval: Duration,
}

impl SyncJob {
    /// Create a new sync job
    pub fn new(category_service: Arc<dyn CategoryService>, interval: Duration) -> Self {
        Self {
            category_service,
            interval,
        }
    }

    /// Execute a single sync pass
    pub async fn run_once(&self) -> AppResult<()> {
        let forest = self.category_service.get_tree().await?;

        tracing::info!(
            roots = forest.len(),
            categories = CategoryNode::count(&forest),
            "Catalog tree synchronized"
        );

        Ok(())
    }

    /// Run sync passes on the configured interval until cancelled
    pub async fn run(&self) -> AppResult<()> {
        tracing::info!(interval_secs = self.interval.as_secs(), "Sync worker started");

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;

            if let Err(e) = self.run_once().await {
                tracing::error!("Catalog sync pass failed: {}", e);
            }
        }
    }
}
