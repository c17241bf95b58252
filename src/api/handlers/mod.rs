//! HTTP request handlers.

pub mod category_handler;

pub use category_handler::category_routes;
