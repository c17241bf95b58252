//! Resource Catalog - Hierarchical category catalog service
//!
//! A catalog of named, coded categories backed by PostgreSQL, reachable
//! through a thin HTTP surface. The persistence layer is pluggable: a
//! single repository contract served by either a SeaORM backend or a
//! direct-sqlx backend, selected once at startup with a degradation
//! fallback.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Category entity, status, tree assembly
//! - **services**: Business rules above the repository contract
//! - **infra**: Database connections, repository backends, selector
//! - **api**: HTTP handlers, extractors, and routes
//! - **jobs**: Interval catalog sync worker
//! - **consumers**: Catalog change-event handling
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Run the catalog sync worker
//! cargo run -- sync work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod consumers;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Category, CategoryNode, CategoryStatus};
pub use errors::{AppError, AppResult};
