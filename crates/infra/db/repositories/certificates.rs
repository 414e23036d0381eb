use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{RunQueryDsl, delete, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{postgres_connection::PgPoolSquad, schema::certificates},
    repositories::map_write_error,
};
use domain::{
    entities::certificates::{CertificateEntity, InsertCertificateEntity},
    repositories::certificates::CertificateRepository,
};

pub struct CertificatePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl CertificatePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl CertificateRepository for CertificatePostgres {
    async fn list(&self) -> Result<Vec<CertificateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = certificates::table
            .select(CertificateEntity::as_select())
            .order(certificates::name.asc())
            .load::<CertificateEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_by_id(&self, certificate_id: i32) -> Result<Option<CertificateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = certificates::table
            .filter(certificates::id.eq(certificate_id))
            .select(CertificateEntity::as_select())
            .first::<CertificateEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn create(&self, certificate: InsertCertificateEntity) -> Result<CertificateEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(certificates::table)
            .values(&certificate)
            .returning(CertificateEntity::as_returning())
            .get_result::<CertificateEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn update(
        &self,
        certificate_id: i32,
        certificate: InsertCertificateEntity,
    ) -> Result<Option<CertificateEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(certificates::table)
            .filter(certificates::id.eq(certificate_id))
            .set((&certificate, certificates::updated_at.eq(Utc::now())))
            .returning(CertificateEntity::as_returning())
            .get_result::<CertificateEntity>(&mut conn)
            .optional()
            .map_err(map_write_error)
    }

    async fn delete(&self, certificate_id: i32) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = delete(certificates::table.filter(certificates::id.eq(certificate_id)))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
