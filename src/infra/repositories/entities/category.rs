//! Category database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::{Category, CategoryStatus};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    /// 0 marks a root category
    pub parent_id: i64,
    pub level: i32,
    pub sort: i32,
    pub description: Option<String>,
    /// 1 = enabled, 0 = disabled
    pub status: i16,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Category {
    fn from(model: Model) -> Self {
        Category {
            id: model.id,
            name: model.name,
            code: model.code,
            parent_id: model.parent_id,
            level: model.level,
            sort: model.sort,
            description: model.description,
            status: CategoryStatus::from(model.status),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
