use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::categories::{CategoryEntity, InsertCategoryEntity};

#[automock]
#[async_trait]
pub trait CategoryRepository {
    async fn list(&self) -> Result<Vec<CategoryEntity>>;
    async fn find_by_id(&self, category_id: i32) -> Result<Option<CategoryEntity>>;
    async fn create(&self, category: InsertCategoryEntity) -> Result<CategoryEntity>;
    async fn update(
        &self,
        category_id: i32,
        category: InsertCategoryEntity,
    ) -> Result<Option<CategoryEntity>>;
    async fn delete(&self, category_id: i32) -> Result<bool>;
}
