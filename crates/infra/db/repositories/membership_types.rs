use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{postgres_connection::PgPoolSquad, schema::membership_types},
    repositories::map_write_error,
};
use domain::{
    entities::membership_types::{MembershipTypeEntity, InsertMembershipTypeEntity},
    repositories::membership_types::MembershipTypeRepository,
};

pub struct MembershipTypePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MembershipTypePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MembershipTypeRepository for MembershipTypePostgres {
    async fn list(&self) -> Result<Vec<MembershipTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = membership_types::table
            .select(MembershipTypeEntity::as_select())
            .order(membership_types::id.asc())
            .load::<MembershipTypeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, membership_type_id: i32) -> Result<Option<MembershipTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = membership_types::table
            .filter(membership_types::id.eq(membership_type_id))
            .select(MembershipTypeEntity::as_select())
            .first::<MembershipTypeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(
        &self,
        membership_type: InsertMembershipTypeEntity,
    ) -> Result<MembershipTypeEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(membership_types::table)
            .values(&membership_type)
            .returning(MembershipTypeEntity::as_returning())
            .get_result::<MembershipTypeEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        membership_type_id: i32,
        membership_type: InsertMembershipTypeEntity,
    ) -> Result<Option<MembershipTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(membership_types::table)
            .filter(membership_types::id.eq(membership_type_id))
            .set((&membership_type, membership_types::updated_at.eq(Utc::now())))
            .returning(MembershipTypeEntity::as_returning())
            .get_result::<MembershipTypeEntity>(&mut conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, membership_type_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(membership_types::table.filter(membership_types::id.eq(membership_type_id)))
            .execute(&mut conn)
            .map_err(map_write_error)?;

        Ok(affected > 0)
    }
}
