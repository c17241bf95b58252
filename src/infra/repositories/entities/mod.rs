//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod category;

// Re-exports for public API convenience
#[allow(unused_imports)]
pub use category::{ActiveModel as CategoryActiveModel, Entity as CategoryEntity, Model as CategoryModel};
