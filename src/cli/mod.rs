//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `sync` - Catalog sync worker

pub mod args;

pub use args::{Cli, Commands};
