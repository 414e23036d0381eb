use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::system_settings::{
        SYSTEM_SETTINGS_ID, SystemSettingsEntity, UpsertSystemSettingsEntity,
    },
    value_objects::validation::non_blank,
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColorPalette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SystemSettingsModel {
    pub site_name: String,
    pub site_description: Option<String>,
    pub logo_url: Option<String>,
    pub favicon_url: Option<String>,
    pub colors: ColorPalette,
    pub locale: String,
    pub currency: String,
    pub timezone: String,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    pub social_links: BTreeMap<String, String>,
    pub seo_config: serde_json::Value,
    pub email_config: serde_json::Value,
    pub payment_config: serde_json::Value,
    pub maintenance_mode: bool,
    pub registration_enabled: bool,
    pub max_upload_size_mb: i32,
    pub allowed_file_types: Vec<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for SystemSettingsModel {
    fn default() -> Self {
        Self {
            site_name: "Directorio Empresarial".to_string(),
            site_description: None,
            logo_url: None,
            favicon_url: None,
            colors: ColorPalette {
                primary: "#1e40af".to_string(),
                secondary: "#64748b".to_string(),
                accent: "#f59e0b".to_string(),
            },
            locale: "es-MX".to_string(),
            currency: "MXN".to_string(),
            timezone: "America/Mexico_City".to_string(),
            contact_email: None,
            contact_phone: None,
            contact_address: None,
            social_links: BTreeMap::new(),
            seo_config: serde_json::json!({}),
            email_config: serde_json::json!({}),
            payment_config: serde_json::json!({}),
            maintenance_mode: false,
            registration_enabled: true,
            max_upload_size_mb: 5,
            allowed_file_types: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/webp".to_string(),
            ],
            updated_at: None,
        }
    }
}

impl From<SystemSettingsEntity> for SystemSettingsModel {
    fn from(entity: SystemSettingsEntity) -> Self {
        Self {
            site_name: entity.site_name,
            site_description: entity.site_description,
            logo_url: entity.logo_url,
            favicon_url: entity.favicon_url,
            colors: ColorPalette {
                primary: entity.primary_color,
                secondary: entity.secondary_color,
                accent: entity.accent_color,
            },
            locale: entity.locale,
            currency: entity.currency,
            timezone: entity.timezone,
            contact_email: entity.contact_email,
            contact_phone: entity.contact_phone,
            contact_address: entity.contact_address,
            social_links: serde_json::from_value(entity.social_links).unwrap_or_default(),
            seo_config: entity.seo_config,
            email_config: entity.email_config,
            payment_config: entity.payment_config,
            maintenance_mode: entity.maintenance_mode,
            registration_enabled: entity.registration_enabled,
            max_upload_size_mb: entity.max_upload_size_mb,
            allowed_file_types: serde_json::from_value(entity.allowed_file_types)
                .unwrap_or_default(),
            updated_at: Some(entity.updated_at),
        }
    }
}

impl SystemSettingsModel {
    /// Email and payment sub-configuration may hold credentials; only admins
    /// see them.
    pub fn public_view(mut self) -> Self {
        self.email_config = serde_json::json!({});
        self.payment_config = serde_json::json!({});
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSystemSettingsModel {
    #[validate(length(min = 1, max = 120, message = "siteName is required"))]
    pub site_name: String,
    pub site_description: Option<String>,
    #[validate(url(message = "logoUrl must be a valid URL"))]
    pub logo_url: Option<String>,
    #[validate(url(message = "faviconUrl must be a valid URL"))]
    pub favicon_url: Option<String>,
    pub colors: ColorPalette,
    #[validate(length(min = 2, max = 16, message = "locale is required"))]
    pub locale: String,
    #[validate(length(equal = 3, message = "currency must be an ISO 4217 code"))]
    pub currency: String,
    #[validate(length(min = 1, message = "timezone is required"))]
    pub timezone: String,
    #[validate(email(message = "contactEmail must be a valid email"))]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub contact_address: Option<String>,
    #[serde(default)]
    pub social_links: BTreeMap<String, String>,
    #[serde(default)]
    pub seo_config: serde_json::Value,
    #[serde(default)]
    pub email_config: serde_json::Value,
    #[serde(default)]
    pub payment_config: serde_json::Value,
    #[serde(default)]
    pub maintenance_mode: bool,
    #[serde(default = "default_registration_enabled")]
    pub registration_enabled: bool,
    #[validate(range(min = 1, max = 100, message = "maxUploadSizeMb must be between 1 and 100"))]
    pub max_upload_size_mb: i32,
    #[serde(default)]
    pub allowed_file_types: Vec<String>,
}

fn default_registration_enabled() -> bool {
    true
}

fn object_or_empty(value: &serde_json::Value) -> serde_json::Value {
    if value.is_object() {
        value.clone()
    } else {
        serde_json::json!({})
    }
}

impl UpdateSystemSettingsModel {
    pub fn to_entity(&self) -> anyhow::Result<UpsertSystemSettingsEntity> {
        Ok(UpsertSystemSettingsEntity {
            id: SYSTEM_SETTINGS_ID,
            site_name: self.site_name.trim().to_string(),
            site_description: non_blank(self.site_description.clone()),
            logo_url: non_blank(self.logo_url.clone()),
            favicon_url: non_blank(self.favicon_url.clone()),
            primary_color: self.colors.primary.trim().to_string(),
            secondary_color: self.colors.secondary.trim().to_string(),
            accent_color: self.colors.accent.trim().to_string(),
            locale: self.locale.trim().to_string(),
            currency: self.currency.trim().to_uppercase(),
            timezone: self.timezone.trim().to_string(),
            contact_email: non_blank(self.contact_email.clone()),
            contact_phone: non_blank(self.contact_phone.clone()),
            contact_address: non_blank(self.contact_address.clone()),
            social_links: serde_json::to_value(&self.social_links)?,
            seo_config: object_or_empty(&self.seo_config),
            email_config: object_or_empty(&self.email_config),
            payment_config: object_or_empty(&self.payment_config),
            maintenance_mode: self.maintenance_mode,
            registration_enabled: self.registration_enabled,
            max_upload_size_mb: self.max_upload_size_mb,
            allowed_file_types: serde_json::Value::from(self.allowed_file_types.clone()),
        })
    }
}
