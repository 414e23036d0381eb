use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::opinions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = opinions)]
pub struct OpinionEntity {
    pub id: i32,
    pub company_id: i32,
    pub user_id: Option<i32>,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub status: String,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = opinions)]
pub struct InsertOpinionEntity {
    pub company_id: i32,
    pub user_id: Option<i32>,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub status: String,
}

/// Moderation write. Status, approver and timestamp always change together.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = opinions)]
pub struct OpinionDecisionEntity {
    pub status: String,
    pub approved_at: DateTime<Utc>,
    pub approved_by: i32,
    pub updated_at: DateTime<Utc>,
}
