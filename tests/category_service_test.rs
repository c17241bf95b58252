//! Category service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;

use resource_catalog::domain::{Category, CategoryStatus};
use resource_catalog::errors::AppError;
use resource_catalog::infra::MockCategoryRepository;
use resource_catalog::services::{CategoryManager, CategoryService};

fn create_test_category(id: i64, parent_id: i64, code: &str) -> Category {
    Category {
        id,
        name: format!("Category {}", code),
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

#[tokio::test]
async fn test_create_category_success() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_code()
        .withf(|code| code == "DOC")
        .returning(|_| Ok(None));
    repo.expect_insert().returning(|mut category| {
        category.id = 1;
        Ok(category)
    });

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.create(create_test_category(0, 0, "DOC")).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().id, 1);
}

#[tokio::test]
async fn test_create_category_duplicate_code() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_code()
        .withf(|code| code == "DOC")
        .returning(|code| Ok(Some(create_test_category(7, 0, code))));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.create(create_test_category(0, 0, "DOC")).await;

    assert!(matches!(result.unwrap_err(), AppError::AlreadyExists(_)));
}

#[tokio::test]
async fn test_create_category_rejects_empty_name() {
    // Validation fails before the repository is touched
    let repo = MockCategoryRepository::new();
    let service = CategoryManager::new(Arc::new(repo));

    let mut category = create_test_category(0, 0, "DOC");
    category.name = String::new();

    let result = service.create(category).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_category_success() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_one()
        .with(eq(3i64))
        .returning(|id| Ok(create_test_category(id, 0, "OLD")));
    repo.expect_update().returning(|_| Ok(()));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.update(create_test_category(3, 0, "NEW")).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().code, "NEW");
}

#[tokio::test]
async fn test_update_category_not_found() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_one().returning(|_| Err(AppError::NotFound));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.update(create_test_category(99, 0, "DOC")).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_update_category_rejects_empty_code() {
    let repo = MockCategoryRepository::new();
    let service = CategoryManager::new(Arc::new(repo));

    let mut category = create_test_category(3, 0, "DOC");
    category.code = "  ".to_string();

    let result = service.update(category).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_delete_category_success() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_one()
        .with(eq(2i64))
        .returning(|id| Ok(create_test_category(id, 0, "DOC")));
    repo.expect_find_by_parent_id()
        .with(eq(2i64))
        .returning(|_| Ok(vec![]));
    repo.expect_delete().with(eq(2i64)).returning(|_| Ok(()));

    let service = CategoryManager::new(Arc::new(repo));
    assert!(service.delete(2).await.is_ok());
}

#[tokio::test]
async fn test_delete_category_with_children_fails() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_one()
        .with(eq(1i64))
        .returning(|id| Ok(create_test_category(id, 0, "DOC")));
    repo.expect_find_by_parent_id()
        .with(eq(1i64))
        .returning(|parent_id| Ok(vec![create_test_category(2, parent_id, "GUIDE")]));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.delete(1).await;

    assert!(matches!(result.unwrap_err(), AppError::HasDependents));
}

#[tokio::test]
async fn test_delete_category_not_found() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_one().returning(|_| Err(AppError::NotFound));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.delete(42).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_get_by_code_missing_is_not_an_error() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_by_code().returning(|_| Ok(None));

    let service = CategoryManager::new(Arc::new(repo));
    let result = service.get_by_code("NOPE").await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_none());
}

#[tokio::test]
async fn test_list_returns_rows_and_total() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_list()
        .with(eq(1u64), eq(2u64))
        .returning(|_, _| {
            Ok((
                vec![
                    create_test_category(1, 0, "A"),
                    create_test_category(2, 0, "B"),
                ],
                5,
            ))
        });

    let service = CategoryManager::new(Arc::new(repo));
    let (rows, total) = service.list(1, 2).await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(total, 5);
}

#[tokio::test]
async fn test_get_tree_assembles_forest() {
    let mut repo = MockCategoryRepository::new();
    repo.expect_find_all().returning(|| {
        Ok(vec![
            create_test_category(1, 0, "DOC"),
            create_test_category(2, 1, "GUIDE"),
            create_test_category(3, 99, "ORPHAN"),
        ])
    });

    let service = CategoryManager::new(Arc::new(repo));
    let forest = service.get_tree().await.unwrap();

    // Root plus orphaned-parent root
    assert_eq!(forest.len(), 2);
    assert_eq!(forest[0].category.id, 1);
    assert_eq!(forest[0].children.len(), 1);
    assert_eq!(forest[0].children[0].category.id, 2);
    assert_eq!(forest[1].category.id, 3);
}
