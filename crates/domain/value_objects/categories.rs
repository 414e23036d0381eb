use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::categories::{CategoryEntity, InsertCategoryEntity},
    value_objects::validation::non_blank,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryModel {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryEntity> for CategoryModel {
    fn from(entity: CategoryEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            icon: entity.icon,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCategoryModel {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

impl UpsertCategoryModel {
    pub fn to_entity(&self) -> InsertCategoryEntity {
        InsertCategoryEntity {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.clone()),
            icon: non_blank(self.icon.clone()),
        }
    }
}
