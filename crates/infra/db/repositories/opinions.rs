use anyhow::Result;
use async_trait::async_trait;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::opinions};
use domain::{
    entities::opinions::{InsertOpinionEntity, OpinionDecisionEntity, OpinionEntity},
    repositories::opinions::OpinionRepository,
};

pub struct OpinionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl OpinionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl OpinionRepository for OpinionPostgres {
    async fn create(&self, opinion: InsertOpinionEntity) -> Result<OpinionEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(opinions::table)
            .values(&opinion)
            .returning(OpinionEntity::as_returning())
            .get_result::<OpinionEntity>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_id(&self, opinion_id: i32) -> Result<Option<OpinionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = opinions::table
            .filter(opinions::id.eq(opinion_id))
            .select(OpinionEntity::as_select())
            .first::<OpinionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self, status: Option<String>) -> Result<Vec<OpinionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = opinions::table
            .select(OpinionEntity::as_select())
            .order(opinions::created_at.desc())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(opinions::status.eq(status));
        }

        let results = query.load::<OpinionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_companies(
        &self,
        company_ids: Vec<i32>,
        status: Option<String>,
    ) -> Result<Vec<OpinionEntity>> {
        if company_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = Arc::clone(&self.db_pool).get()?;
        let mut query = opinions::table
            .select(OpinionEntity::as_select())
            .filter(opinions::company_id.eq_any(company_ids))
            .order(opinions::created_at.desc())
            .into_boxed();

        if let Some(status) = status {
            query = query.filter(opinions::status.eq(status));
        }

        let results = query.load::<OpinionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn decide(
        &self,
        opinion_id: i32,
        decision: OpinionDecisionEntity,
    ) -> Result<Option<OpinionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(opinions::table)
            .filter(opinions::id.eq(opinion_id))
            .set(&decision)
            .returning(OpinionEntity::as_returning())
            .get_result::<OpinionEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn delete(&self, opinion_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected =
            delete(opinions::table.filter(opinions::id.eq(opinion_id))).execute(&mut conn)?;

        Ok(affected > 0)
    }
}
