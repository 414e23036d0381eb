use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{postgres_connection::PgPoolSquad, schema::roles},
    repositories::map_write_error,
};
use domain::{
    entities::roles::{RoleEntity, InsertRoleEntity},
    repositories::roles::RoleRepository,
};

pub struct RolePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl RolePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoleRepository for RolePostgres {
    async fn list(&self) -> Result<Vec<RoleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = roles::table
            .select(RoleEntity::as_select())
            .order(roles::name.asc())
            .load::<RoleEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, role_id: i32) -> Result<Option<RoleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = roles::table
            .filter(roles::id.eq(role_id))
            .select(RoleEntity::as_select())
            .first::<RoleEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(&self, role: InsertRoleEntity) -> Result<RoleEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(roles::table)
            .values(&role)
            .returning(RoleEntity::as_returning())
            .get_result::<RoleEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn update(&self, role_id: i32, role: InsertRoleEntity) -> Result<Option<RoleEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(roles::table)
            .filter(roles::id.eq(role_id))
            .set((&role, roles::updated_at.eq(Utc::now())))
            .returning(RoleEntity::as_returning())
            .get_result::<RoleEntity>(&mut conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, role_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(roles::table.filter(roles::id.eq(role_id))).execute(&mut conn)?;

        Ok(affected > 0)
    }
}
