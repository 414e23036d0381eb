use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{postgres_connection::PgPoolSquad, schema::companies},
    repositories::map_write_error,
};
use domain::{
    entities::companies::{CompanyEntity, InsertCompanyEntity, UpdateCompanyMembershipEntity},
    repositories::companies::CompanyRepository,
};

pub struct CompanyPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CompanyPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CompanyRepository for CompanyPostgres {
    async fn list(&self) -> Result<Vec<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = companies::table
            .select(CompanyEntity::as_select())
            .order(companies::name.asc())
            .load::<CompanyEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_owner(&self, user_id: i32) -> Result<Vec<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = companies::table
            .filter(companies::user_id.eq(user_id))
            .select(CompanyEntity::as_select())
            .order(companies::name.asc())
            .load::<CompanyEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, company_id: i32) -> Result<Option<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = companies::table
            .filter(companies::id.eq(company_id))
            .select(CompanyEntity::as_select())
            .first::<CompanyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(&self, company: InsertCompanyEntity) -> Result<CompanyEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(companies::table)
            .values(&company)
            .returning(CompanyEntity::as_returning())
            .get_result::<CompanyEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        company_id: i32,
        company: InsertCompanyEntity,
    ) -> Result<Option<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(companies::table)
            .filter(companies::id.eq(company_id))
            .set((&company, companies::updated_at.eq(Utc::now())))
            .returning(CompanyEntity::as_returning())
            .get_result::<CompanyEntity>(&mut conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn update_membership(
        &self,
        company_id: i32,
        membership: UpdateCompanyMembershipEntity,
    ) -> Result<Option<CompanyEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(companies::table)
            .filter(companies::id.eq(company_id))
            .set(&membership)
            .returning(CompanyEntity::as_returning())
            .get_result::<CompanyEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, company_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(companies::table.filter(companies::id.eq(company_id)))
            .execute(&mut conn)
            .map_err(map_write_error)?;

        Ok(affected > 0)
    }
}
