use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::system_settings;

/// Primary key of the single settings row.
pub const SYSTEM_SETTINGS_ID: i32 = 1;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = system_settings)]
pub struct SystemSettingsEntity {
    pub id: i32,
    pub site_name: String,
    pub site_description: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub locale: String,
    pub currency: String,
    pub timezone: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub social_links: serde_json::Value,
    pub seo_config: serde_json::Value,
    pub email_config: serde_json::Value,
    pub payment_config: serde_json::Value,
    pub maintenance_mode: bool,
    pub registration_enabled: bool,
    pub max_upload_size_mb: i32,
    pub allowed_file_types: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Insertable, AsChangeset)]
#[diesel(table_name = system_settings, treat_none_as_null = true)]
pub struct UpsertSystemSettingsEntity {
    pub id: i32,
    pub site_name: String,
    pub site_description: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub accent_color: String,
    pub locale: String,
    pub currency: String,
    pub timezone: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub social_links: serde_json::Value,
    pub seo_config: serde_json::Value,
    pub email_config: serde_json::Value,
    pub payment_config: serde_json::Value,
    pub maintenance_mode: bool,
    pub registration_enabled: bool,
    pub max_upload_size_mb: i32,
    pub allowed_file_types: serde_json::Value,
}
