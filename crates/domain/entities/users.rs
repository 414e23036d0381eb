use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::users;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = users)]
pub struct UserEntity {
    pub id: i32,
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub struct InsertUserEntity {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = users)]
pub struct UpdateUserEntity {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<String>,
    pub stripe_customer_id: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
