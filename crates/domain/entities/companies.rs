use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::companies;

/// Raw company row. List-valued columns are JSONB and are parsed into typed
/// fields by `CompanyModel`.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = companies)]
pub struct CompanyEntity {
    pub id: i32,
    pub name: String,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email1: String,
    pub email2: Option<String>,
    pub countries: serde_json::Value,
    pub states: serde_json::Value,
    pub cities: serde_json::Value,
    pub address: Option<String>,
    pub location: Option<serde_json::Value>,
    pub sales_representatives: serde_json::Value,
    pub description: Option<String>,
    pub product_gallery: serde_json::Value,
    pub category_ids: serde_json::Value,
    pub social_media: serde_json::Value,
    pub catalog_url: Option<String>,
    pub video_urls: serde_json::Value,
    pub membership_type_id: Option<i32>,
    pub website: Option<String>,
    pub certificate_ids: serde_json::Value,
    pub membership_payment_method: Option<String>,
    pub membership_start_date: Option<NaiveDate>,
    pub membership_end_date: Option<NaiveDate>,
    pub membership_notes: Option<String>,
    pub user_id: Option<i32>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = companies, treat_none_as_null = true)]
pub struct InsertCompanyEntity {
    pub name: String,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email1: String,
    pub email2: Option<String>,
    pub countries: serde_json::Value,
    pub states: serde_json::Value,
    pub cities: serde_json::Value,
    pub address: Option<String>,
    pub location: Option<serde_json::Value>,
    pub sales_representatives: serde_json::Value,
    pub description: Option<String>,
    pub product_gallery: serde_json::Value,
    pub category_ids: serde_json::Value,
    pub social_media: serde_json::Value,
    pub catalog_url: Option<String>,
    pub video_urls: serde_json::Value,
    pub membership_type_id: Option<i32>,
    pub website: Option<String>,
    pub certificate_ids: serde_json::Value,
    pub membership_payment_method: Option<String>,
    pub membership_start_date: Option<NaiveDate>,
    pub membership_end_date: Option<NaiveDate>,
    pub membership_notes: Option<String>,
    pub user_id: Option<i32>,
    pub status: String,
}

/// Membership columns written when a payment settles.
#[derive(Debug, Clone, PartialEq, AsChangeset)]
#[diesel(table_name = companies)]
pub struct UpdateCompanyMembershipEntity {
    pub membership_type_id: i32,
    pub membership_payment_method: String,
    pub membership_start_date: NaiveDate,
    pub membership_end_date: NaiveDate,
    pub membership_notes: Option<String>,
    pub updated_at: DateTime<Utc>,
}
