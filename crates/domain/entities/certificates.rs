use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::certificates;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = certificates)]
pub struct CertificateEntity {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub issuing_entity: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = certificates, treat_none_as_null = true)]
pub struct InsertCertificateEntity {
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub issuing_entity: Option<String>,
    pub status: String,
}
