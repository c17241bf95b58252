//! Application configuration module

pub mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
