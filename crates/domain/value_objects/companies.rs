use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{
    entities::companies::{CompanyEntity, InsertCompanyEntity},
    value_objects::{
        enums::company_statuses::CompanyStatus,
        validation::{non_blank, schema_error},
    },
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesRepresentative {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompanyModel {
    pub id: i32,
    pub name: String,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    pub email1: String,
    pub email2: Option<String>,
    pub countries: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    pub sales_representatives: Vec<SalesRepresentative>,
    pub description: Option<String>,
    pub product_gallery: Vec<String>,
    pub category_ids: Vec<i32>,
    pub social_media: BTreeMap<String, String>,
    pub catalog_url: Option<String>,
    pub video_urls: Vec<String>,
    pub membership_type_id: Option<i32>,
    pub website: Option<String>,
    pub certificate_ids: Vec<i32>,
    pub membership_payment_method: Option<String>,
    pub membership_start_date: Option<NaiveDate>,
    pub membership_end_date: Option<NaiveDate>,
    pub membership_notes: Option<String>,
    pub user_id: Option<i32>,
    pub status: CompanyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CompanyEntity> for CompanyModel {
    fn from(entity: CompanyEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            phone1: entity.phone1,
            phone2: entity.phone2,
            email1: entity.email1,
            email2: entity.email2,
            countries: serde_json::from_value(entity.countries).unwrap_or_default(),
            states: serde_json::from_value(entity.states).unwrap_or_default(),
            cities: serde_json::from_value(entity.cities).unwrap_or_default(),
            address: entity.address,
            location: entity
                .location
                .and_then(|value| serde_json::from_value(value).ok()),
            sales_representatives: serde_json::from_value(entity.sales_representatives)
                .unwrap_or_default(),
            description: entity.description,
            product_gallery: serde_json::from_value(entity.product_gallery).unwrap_or_default(),
            category_ids: serde_json::from_value(entity.category_ids).unwrap_or_default(),
            social_media: serde_json::from_value(entity.social_media).unwrap_or_default(),
            catalog_url: entity.catalog_url,
            video_urls: serde_json::from_value(entity.video_urls).unwrap_or_default(),
            membership_type_id: entity.membership_type_id,
            website: entity.website,
            certificate_ids: serde_json::from_value(entity.certificate_ids).unwrap_or_default(),
            membership_payment_method: entity.membership_payment_method,
            membership_start_date: entity.membership_start_date,
            membership_end_date: entity.membership_end_date,
            membership_notes: entity.membership_notes,
            user_id: entity.user_id,
            status: CompanyStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Body of `POST /api/companies` and `PUT /api/companies/{id}`.
///
/// `email1` is optional at the serde level so a missing value is reported as
/// a field validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_company_shape"))]
pub struct UpsertCompanyModel {
    #[validate(length(min = 1, max = 200, message = "name is required"))]
    pub name: String,
    pub phone1: Option<String>,
    pub phone2: Option<String>,
    #[validate(
        required(message = "email1 is required"),
        email(message = "email1 must be a valid email")
    )]
    pub email1: Option<String>,
    #[validate(email(message = "email2 must be a valid email"))]
    pub email2: Option<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub states: Vec<String>,
    #[serde(default)]
    pub cities: Vec<String>,
    pub address: Option<String>,
    pub location: Option<GeoPoint>,
    #[serde(default)]
    pub sales_representatives: Vec<SalesRepresentative>,
    pub description: Option<String>,
    #[serde(default)]
    pub product_gallery: Vec<String>,
    #[serde(default)]
    pub category_ids: Vec<i32>,
    #[serde(default)]
    pub social_media: BTreeMap<String, String>,
    #[validate(url(message = "catalogUrl must be a valid URL"))]
    pub catalog_url: Option<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
    pub membership_type_id: Option<i32>,
    #[validate(url(message = "website must be a valid URL"))]
    pub website: Option<String>,
    #[serde(default)]
    pub certificate_ids: Vec<i32>,
    pub membership_payment_method: Option<String>,
    pub membership_start_date: Option<NaiveDate>,
    pub membership_end_date: Option<NaiveDate>,
    pub membership_notes: Option<String>,
    pub user_id: Option<i32>,
    pub status: Option<CompanyStatus>,
}

fn validate_company_shape(model: &UpsertCompanyModel) -> Result<(), ValidationError> {
    if let Some(location) = model.location.as_ref() {
        if !location.is_valid() {
            return Err(schema_error(
                "location",
                "location must have lat in [-90, 90] and lng in [-180, 180]",
            ));
        }
    }

    if let (Some(start), Some(end)) = (model.membership_start_date, model.membership_end_date) {
        if end < start {
            return Err(schema_error(
                "membership_dates",
                "membershipEndDate must not be before membershipStartDate",
            ));
        }
    }

    if model
        .sales_representatives
        .iter()
        .any(|rep| rep.name.trim().is_empty())
    {
        return Err(schema_error(
            "sales_representatives",
            "every sales representative needs a name",
        ));
    }

    Ok(())
}

fn clean_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect()
}

fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut out: Vec<i32> = Vec::with_capacity(ids.len());
    for id in ids {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

impl UpsertCompanyModel {
    pub fn to_entity(&self) -> anyhow::Result<InsertCompanyEntity> {
        let location = self
            .location
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        Ok(InsertCompanyEntity {
            name: self.name.trim().to_string(),
            phone1: non_blank(self.phone1.clone()),
            phone2: non_blank(self.phone2.clone()),
            email1: self
                .email1
                .as_deref()
                .map(|email| email.trim().to_string())
                .unwrap_or_default(),
            email2: non_blank(self.email2.clone()),
            countries: serde_json::Value::from(clean_list(&self.countries)),
            states: serde_json::Value::from(clean_list(&self.states)),
            cities: serde_json::Value::from(clean_list(&self.cities)),
            address: non_blank(self.address.clone()),
            location,
            sales_representatives: serde_json::to_value(&self.sales_representatives)?,
            description: non_blank(self.description.clone()),
            product_gallery: serde_json::Value::from(clean_list(&self.product_gallery)),
            category_ids: serde_json::Value::from(unique_ids(&self.category_ids)),
            social_media: serde_json::to_value(&self.social_media)?,
            catalog_url: non_blank(self.catalog_url.clone()),
            video_urls: serde_json::Value::from(clean_list(&self.video_urls)),
            membership_type_id: self.membership_type_id,
            website: non_blank(self.website.clone()),
            certificate_ids: serde_json::Value::from(unique_ids(&self.certificate_ids)),
            membership_payment_method: non_blank(self.membership_payment_method.clone()),
            membership_start_date: self.membership_start_date,
            membership_end_date: self.membership_end_date,
            membership_notes: non_blank(self.membership_notes.clone()),
            user_id: self.user_id,
            status: self.status.unwrap_or_default().to_string(),
        })
    }
}

/// Query string of `GET /api/companies`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyFilter {
    pub category_id: Option<i32>,
    pub membership_type_id: Option<i32>,
    pub country: Option<String>,
    pub q: Option<String>,
    pub status: Option<CompanyStatus>,
}

impl CompanyFilter {
    pub fn matches(&self, company: &CompanyModel) -> bool {
        if let Some(category_id) = self.category_id {
            if !company.category_ids.contains(&category_id) {
                return false;
            }
        }

        if let Some(membership_type_id) = self.membership_type_id {
            if company.membership_type_id != Some(membership_type_id) {
                return false;
            }
        }

        if let Some(country) = self.country.as_deref() {
            if !company
                .countries
                .iter()
                .any(|c| c.eq_ignore_ascii_case(country.trim()))
            {
                return false;
            }
        }

        if let Some(q) = self.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            if !company.name.to_lowercase().contains(&q.to_lowercase()) {
                return false;
            }
        }

        if let Some(status) = self.status {
            if company.status != status {
                return false;
            }
        }

        true
    }
}
