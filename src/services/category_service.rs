//! Category service - business rules above the repository contract.
//!
//! Owns validation, uniqueness probing, the dependents check guarding
//! deletes, and tree assembly. The repository underneath stays purely
//! mechanical.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Category, CategoryNode};
use crate::errors::{AppError, AppResult};
use crate::infra::CategoryRepository;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Category service trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CategoryService: Send + Sync {
    /// Create a category after validating it and probing for a code collision
    async fn create(&self, category: Category) -> AppResult<Category>;

    /// Replace the business fields of an existing category
    async fn update(&self, category: Category) -> AppResult<Category>;

    /// Delete a category, refused while it still has children
    async fn delete(&self, id: i64) -> AppResult<()>;

    /// Get a category by id
    async fn get(&self, id: i64) -> AppResult<Category>;

    /// Get a category by code; a missing code is not an error
    async fn get_by_code(&self, code: &str) -> AppResult<Option<Category>>;

    /// Page through all categories with the unfiltered total
    async fn list(&self, page: u64, page_size: u64) -> AppResult<(Vec<Category>, u64)>;

    /// Assemble the forest of enabled categories
    async fn get_tree(&self) -> AppResult<Vec<CategoryNode>>;
}

/// Concrete implementation of CategoryService over the repository contract.
///
/// Unaware of which backend serves it; the selector decided that at
/// startup.
pub struct CategoryManager {
    repo: Arc<dyn CategoryRepository>,
}

impl CategoryManager {
    /// Create new category service instance
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl CategoryService for CategoryManager {
    async fn create(&self, category: Category) -> AppResult<Category> {
        category.validate()?;

        // Existence probe; the unique index backstops concurrent inserts
        if self.repo.find_by_code(&category.code).await?.is_some() {
            return Err(AppError::already_exists("Category code"));
        }

        self.repo.insert(category).await
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        category.validate()?;

        // NotFound surfaces here when the id is unknown
        self.repo.find_one(category.id).await?;

        self.repo.update(category.clone()).await?;
        Ok(category)
    }

    async fn delete(&self, id: i64) -> AppResult<()> {
        self.repo.find_one(id).await?;

        let children = self.repo.find_by_parent_id(id).await?;
        if !children.is_empty() {
            return Err(AppError::HasDependents);
        }

        self.repo.delete(id).await
    }

    async fn get(&self, id: i64) -> AppResult<Category> {
        self.repo.find_one(id).await
    }

    async fn get_by_code(&self, code: &str) -> AppResult<Option<Category>> {
        self.repo.find_by_code(code).await
    }

    async fn list(&self, page: u64, page_size: u64) -> AppResult<(Vec<Category>, u64)> {
        self.repo.list(page, page_size).await
    }

    async fn get_tree(&self) -> AppResult<Vec<CategoryNode>> {
        let categories = self.repo.find_all().await?;
        Ok(CategoryNode::build_forest(categories))
    }
}
