use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{postgres_connection::PgPoolSquad, schema::categories},
    repositories::map_write_error,
};
use domain::{
    entities::categories::{CategoryEntity, InsertCategoryEntity},
    repositories::categories::CategoryRepository,
};

pub struct CategoryPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CategoryPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CategoryRepository for CategoryPostgres {
    async fn list(&self) -> Result<Vec<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = categories::table
            .select(CategoryEntity::as_select())
            .order(categories::name.asc())
            .load::<CategoryEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, category_id: i32) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = categories::table
            .filter(categories::id.eq(category_id))
            .select(CategoryEntity::as_select())
            .first::<CategoryEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(&self, category: InsertCategoryEntity) -> Result<CategoryEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(categories::table)
            .values(&category)
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        category_id: i32,
        category: InsertCategoryEntity,
    ) -> Result<Option<CategoryEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(categories::table)
            .filter(categories::id.eq(category_id))
            .set((&category, categories::updated_at.eq(Utc::now())))
            .returning(CategoryEntity::as_returning())
            .get_result::<CategoryEntity>(&mut conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, category_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(categories::table.filter(categories::id.eq(category_id)))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
