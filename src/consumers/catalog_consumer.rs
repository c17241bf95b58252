//! Catalog change-event consumer.
//!
//! Decodes externally-produced catalog events and dispatches them by
//! type. The queue wiring itself lives outside this crate; this module
//! only owns the payload contract and the dispatch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};
use crate::services::CategoryService;

/// Kind of catalog change carried by an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogEventType {
    Created,
    Updated,
    Deleted,
    /// Producer sent a type this consumer does not know yet
    #[serde(other)]
    Unknown,
}

/// Externally-produced catalog change event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEvent {
    pub event_type: CatalogEventType,
    pub data: serde_json::Value,
    pub timestamp: i64,
}

/// Consumer applying catalog events to the local catalog
pub struct CatalogConsumer {
    /// Note: unused while the handlers below are logging no-ops.
    #[allow(dead_code)]
    category_service: Arc<dyn CategoryService>,
}

impl CatalogConsumer {
    /// Create a new catalog consumer
    pub fn new(category_service: Arc<dyn CategoryService>) -> Self {
        Self { category_service }
    }

    /// Decode a raw message payload and dispatch it by event type.
    ///
    /// A malformed payload is the producer's fault and surfaces as
    /// `BadRequest`; an unknown event type is skipped with a warning.
    pub async fn handle(&self, payload: &[u8]) -> AppResult<()> {
        let event: CatalogEvent = serde_json::from_slice(payload)
            .map_err(|e| AppError::BadRequest(format!("Malformed catalog event: {}", e)))?;

        match event.event_type {
            CatalogEventType::Created => self.on_created(event).await,
            CatalogEventType::Updated => self.on_updated(event).await,
            CatalogEventType::Deleted => self.on_deleted(event).await,
            CatalogEventType::Unknown => {
                tracing::warn!(timestamp = event.timestamp, "Skipping unknown catalog event type");
                Ok(())
            }
        }
    }

    async fn on_created(&self, event: CatalogEvent) -> AppResult<()> {
        tracing::info!(timestamp = event.timestamp, "Handling catalog created event");
        Ok(())
    }

    async fn on_updated(&self, event: CatalogEvent) -> AppResult<()> {
        tracing::info!(timestamp = event.timestamp, "Handling catalog updated event");
        Ok(())
    }

    async fn on_deleted(&self, event: CatalogEvent) -> AppResult<()> {
        tracing::info!(timestamp = event.timestamp, "Handling catalog deleted event");
        Ok(())
    }
}
