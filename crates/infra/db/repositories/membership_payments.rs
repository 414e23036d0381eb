use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{Connection, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::{
    postgres::{
        postgres_connection::PgPoolSquad,
        schema::{companies, membership_payments},
    },
    repositories::map_write_error,
};
use domain::{
    entities::{
        companies::UpdateCompanyMembershipEntity,
        membership_payments::{InsertMembershipPaymentEntity, MembershipPaymentEntity},
    },
    repositories::membership_payments::MembershipPaymentRepository,
    value_objects::enums::payment_statuses::PaymentStatus,
};

pub struct MembershipPaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl MembershipPaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl MembershipPaymentRepository for MembershipPaymentPostgres {
    async fn create(
        &self,
        payment: InsertMembershipPaymentEntity,
    ) -> Result<MembershipPaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        insert_into(membership_payments::table)
            .values(&payment)
            .returning(MembershipPaymentEntity::as_returning())
            .get_result::<MembershipPaymentEntity>(&mut conn)
            .map_err(map_write_error)
    }

    async fn find_by_id(&self, payment_id: i32) -> Result<Option<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = membership_payments::table
            .filter(membership_payments::id.eq(payment_id))
            .select(MembershipPaymentEntity::as_select())
            .first::<MembershipPaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_by_intent_id(
        &self,
        payment_intent_id: String,
    ) -> Result<Option<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = membership_payments::table
            .filter(membership_payments::stripe_payment_intent_id.eq(payment_intent_id))
            .select(MembershipPaymentEntity::as_select())
            .first::<MembershipPaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list(&self) -> Result<Vec<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = membership_payments::table
            .select(MembershipPaymentEntity::as_select())
            .order(membership_payments::created_at.desc())
            .load::<MembershipPaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = membership_payments::table
            .filter(membership_payments::user_id.eq(user_id))
            .select(MembershipPaymentEntity::as_select())
            .order(membership_payments::created_at.desc())
            .load::<MembershipPaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn update_status(
        &self,
        payment_id: i32,
        status: String,
    ) -> Result<Option<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = update(membership_payments::table)
            .filter(membership_payments::id.eq(payment_id))
            .filter(membership_payments::status.eq_any(PaymentStatus::open_statuses()))
            .set((
                membership_payments::status.eq(status),
                membership_payments::updated_at.eq(Utc::now()),
            ))
            .returning(MembershipPaymentEntity::as_returning())
            .get_result::<MembershipPaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn settle_succeeded(
        &self,
        payment_id: i32,
        company_id: i32,
        membership: UpdateCompanyMembershipEntity,
    ) -> Result<Option<MembershipPaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = conn.transaction::<Option<MembershipPaymentEntity>, diesel::result::Error, _>(|tx| {
            // The status guard makes a concurrent second settlement a no-op.
            let Some(payment) = update(membership_payments::table)
                .filter(membership_payments::id.eq(payment_id))
                .filter(membership_payments::status.eq_any(PaymentStatus::open_statuses()))
                .set((
                    membership_payments::status.eq(PaymentStatus::Succeeded.to_string()),
                    membership_payments::updated_at.eq(membership.updated_at),
                ))
                .returning(MembershipPaymentEntity::as_returning())
                .get_result::<MembershipPaymentEntity>(tx)
                .optional()?
            else {
                return Ok(None);
            };

            update(companies::table)
                .filter(companies::id.eq(company_id))
                .set(&membership)
                .execute(tx)?;

            Ok(Some(payment))
        })?;

        Ok(result)
    }
}
