use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::membership_types;

/// Raw plan row. `pricing` and `benefits` stay as JSON here and are parsed by
/// `MembershipTypeModel`.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = membership_types)]
pub struct MembershipTypeEntity {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub pricing: serde_json::Value,
    pub benefits: serde_json::Value,
    pub visibility: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = membership_types, treat_none_as_null = true)]
pub struct InsertMembershipTypeEntity {
    pub name: String,
    pub description: Option<String>,
    pub pricing: serde_json::Value,
    pub benefits: serde_json::Value,
    pub visibility: String,
}
