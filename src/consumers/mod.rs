//! Message consumers for externally-produced events.

pub mod catalog_consumer;

pub use catalog_consumer::{CatalogConsumer, CatalogEvent, CatalogEventType};
