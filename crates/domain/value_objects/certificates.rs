use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::certificates::{CertificateEntity, InsertCertificateEntity},
    value_objects::{enums::record_statuses::RecordStatus, validation::non_blank},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateModel {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub issuing_entity: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CertificateEntity> for CertificateModel {
    fn from(entity: CertificateEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            image: entity.image,
            description: entity.description,
            issue_date: entity.issue_date,
            expiry_date: entity.expiry_date,
            issuing_entity: entity.issuing_entity,
            status: RecordStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Issue and expiry dates are free text ("2024", "marzo 2025", ...).
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertCertificateModel {
    #[validate(length(min = 1, max = 160, message = "name is required"))]
    pub name: String,
    #[validate(url(message = "image must be a valid URL"))]
    pub image: Option<String>,
    pub description: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub issuing_entity: Option<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

impl UpsertCertificateModel {
    pub fn to_entity(&self) -> InsertCertificateEntity {
        InsertCertificateEntity {
            name: self.name.trim().to_string(),
            image: non_blank(self.image.clone()),
            description: non_blank(self.description.clone()),
            issue_date: non_blank(self.issue_date.clone()),
            expiry_date: non_blank(self.expiry_date.clone()),
            issuing_entity: non_blank(self.issuing_entity.clone()),
            status: self.status.to_string(),
        }
    }
}
