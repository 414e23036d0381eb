use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::roles;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = roles)]
pub struct RoleEntity {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub permissions: serde_json::Value,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = roles, treat_none_as_null = true)]
pub struct InsertRoleEntity {
    pub name: String,
    pub description: Option<String>,
    pub permissions: serde_json::Value,
    pub status: String,
}
