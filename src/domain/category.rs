//! Category domain entity and related types.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ROOT_PARENT_ID;
use crate::errors::{AppError, AppResult};

/// Category activation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", from = "i16")]
pub enum CategoryStatus {
    Enabled,
    Disabled,
}

impl From<i16> for CategoryStatus {
    fn from(value: i16) -> Self {
        match value {
            1 => CategoryStatus::Enabled,
            _ => CategoryStatus::Disabled,
        }
    }
}

impl From<CategoryStatus> for i16 {
    fn from(status: CategoryStatus) -> Self {
        match status {
            CategoryStatus::Enabled => 1,
            CategoryStatus::Disabled => 0,
        }
    }
}

impl std::fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryStatus::Enabled => write!(f, "enabled"),
            CategoryStatus::Disabled => write!(f, "disabled"),
        }
    }
}

/// Category domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Store-assigned identifier, immutable once set
    pub id: i64,
    pub name: String,
    /// Unique business code across all categories
    pub code: String,
    /// Parent category id, 0 for root categories
    pub parent_id: i64,
    /// Depth hint supplied by the caller (1 = root), not recomputed by the store
    pub level: i32,
    /// Display ordering among siblings
    pub sort: i32,
    pub description: Option<String>,
    pub status: CategoryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Check required fields before the record reaches storage
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Category name cannot be empty"));
        }
        if self.code.trim().is_empty() {
            return Err(AppError::validation("Category code cannot be empty"));
        }
        Ok(())
    }

    /// Check if the category is enabled
    pub fn is_active(&self) -> bool {
        self.status == CategoryStatus::Enabled
    }

    /// Check if the category sits at the top of the hierarchy
    pub fn is_root(&self) -> bool {
        self.parent_id == ROOT_PARENT_ID
    }
}

/// A category with its resolved children, as returned by tree assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Assemble a forest from a flat category list.
    ///
    /// Each category is linked under its `parent_id`. A category whose parent
    /// is not part of the input becomes an additional root rather than an
    /// error. Input order is preserved among siblings, so a `sort`-ordered
    /// input yields a `sort`-ordered forest. Categories trapped in a parent
    /// cycle are unreachable from any root and are omitted.
    pub fn build_forest(categories: Vec<Category>) -> Vec<CategoryNode> {
        let known: HashSet<i64> = categories.iter().map(|c| c.id).collect();

        let mut roots: Vec<Category> = Vec::new();
        let mut children_of: HashMap<i64, Vec<Category>> = HashMap::new();
        for category in categories {
            if category.is_root() || !known.contains(&category.parent_id) {
                roots.push(category);
            } else {
                children_of.entry(category.parent_id).or_default().push(category);
            }
        }

        roots
            .into_iter()
            .map(|root| Self::attach(root, &mut children_of))
            .collect()
    }

    fn attach(category: Category, children_of: &mut HashMap<i64, Vec<Category>>) -> CategoryNode {
        let children = children_of
            .remove(&category.id)
            .unwrap_or_default()
            .into_iter()
            .map(|child| Self::attach(child, children_of))
            .collect();

        CategoryNode { category, children }
    }

    /// Total number of categories reachable in the forest
    pub fn count(forest: &[CategoryNode]) -> usize {
        forest
            .iter()
            .map(|node| 1 + Self::count(&node.children))
            .sum()
    }
}

/// Category response (shape returned to clients)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    /// Unique category identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Category display name
    #[schema(example = "Documentation")]
    pub name: String,
    /// Unique category code
    #[schema(example = "DOC")]
    pub code: String,
    /// Parent category id (0 = root)
    #[schema(example = 0)]
    pub parent_id: i64,
    /// Hierarchy depth hint (1 = root)
    #[schema(example = 1)]
    pub level: i32,
    /// Display order among siblings
    pub sort: i32,
    /// Optional free-form description
    pub description: Option<String>,
    /// Status: 1 = enabled, 0 = disabled
    #[schema(value_type = i16, example = 1)]
    pub status: CategoryStatus,
    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            code: category.code,
            parent_id: category.parent_id,
            level: category.level,
            sort: category.sort,
            description: category.description,
            status: category.status,
            created_at: category.created_at,
            updated_at: category.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: i64, parent_id: i64, code: &str) -> Category {
        Category {
            id,
            name: format!("Category {}", id),
            code: code.to_string(),
            parent_id,
            level: 1,
            sort: 0,
            description: None,
            status: CategoryStatus::Enabled,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn validate_rejects_empty_name() {
        let mut c = category(1, 0, "DOC");
        c.name = "  ".to_string();
        assert!(matches!(c.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn validate_rejects_empty_code() {
        let mut c = category(1, 0, "");
        assert!(matches!(c.validate(), Err(AppError::Validation(_))));
        c.code = "DOC".to_string();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn status_converts_from_storage_values() {
        assert_eq!(CategoryStatus::from(1), CategoryStatus::Enabled);
        assert_eq!(CategoryStatus::from(0), CategoryStatus::Disabled);
        assert_eq!(CategoryStatus::from(7), CategoryStatus::Disabled);
        assert_eq!(i16::from(CategoryStatus::Enabled), 1);
        assert_eq!(i16::from(CategoryStatus::Disabled), 0);
    }

    #[test]
    fn forest_links_children_under_parents() {
        let forest = CategoryNode::build_forest(vec![
            category(1, 0, "A"),
            category(2, 1, "B"),
            category(3, 2, "C"),
            category(4, 0, "D"),
        ]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].category.id, 1);
        assert_eq!(forest[0].children.len(), 1);
        assert_eq!(forest[0].children[0].category.id, 2);
        assert_eq!(forest[0].children[0].children[0].category.id, 3);
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn dangling_parent_becomes_extra_root() {
        let forest = CategoryNode::build_forest(vec![
            category(1, 0, "A"),
            category(2, 99, "B"),
        ]);

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[1].category.id, 2);
    }

    #[test]
    fn cycle_members_are_omitted() {
        let forest = CategoryNode::build_forest(vec![
            category(1, 0, "A"),
            category(2, 3, "B"),
            category(3, 2, "C"),
        ]);

        assert_eq!(forest.len(), 1);
        assert_eq!(CategoryNode::count(&forest), 1);
    }

    #[test]
    fn forest_preserves_sibling_order() {
        let forest = CategoryNode::build_forest(vec![
            category(3, 0, "C"),
            category(1, 0, "A"),
            category(2, 0, "B"),
        ]);

        let ids: Vec<i64> = forest.iter().map(|n| n.category.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }
}
