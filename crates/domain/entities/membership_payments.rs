use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::membership_payments;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = membership_payments)]
pub struct MembershipPaymentEntity {
    pub id: i32,
    pub user_id: i32,
    pub company_id: i32,
    pub membership_type_id: i32,
    pub stripe_payment_intent_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub periodicity: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = membership_payments)]
pub struct InsertMembershipPaymentEntity {
    pub user_id: i32,
    pub company_id: i32,
    pub membership_type_id: i32,
    pub stripe_payment_intent_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub periodicity: String,
    pub status: String,
}
