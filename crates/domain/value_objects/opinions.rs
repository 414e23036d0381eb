use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::opinions::{InsertOpinionEntity, OpinionDecisionEntity, OpinionEntity},
    value_objects::{enums::opinion_statuses::OpinionStatus, validation::non_blank},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpinionModel {
    pub id: i32,
    pub company_id: i32,
    pub user_id: Option<i32>,
    pub reviewer_name: String,
    pub reviewer_email: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    #[serde(rename = "estado")]
    pub status: OpinionStatus,
    #[serde(rename = "fechaAprobacion")]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(rename = "aprobadoPor")]
    pub approved_by: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OpinionEntity> for OpinionModel {
    fn from(entity: OpinionEntity) -> Self {
        Self {
            id: entity.id,
            company_id: entity.company_id,
            user_id: entity.user_id,
            reviewer_name: entity.reviewer_name,
            reviewer_email: entity.reviewer_email,
            rating: entity.rating,
            comment: entity.comment,
            status: OpinionStatus::from_str(&entity.status).unwrap_or_default(),
            approved_at: entity.approved_at,
            approved_by: entity.approved_by,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl OpinionModel {
    /// Public view: the reviewer email is only shown to moderators.
    pub fn redacted(mut self) -> Self {
        self.reviewer_email = None;
        self
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InsertOpinionModel {
    pub company_id: i32,
    #[validate(length(min = 1, max = 120, message = "reviewerName is required"))]
    pub reviewer_name: String,
    #[validate(email(message = "reviewerEmail must be a valid email"))]
    pub reviewer_email: Option<String>,
    #[validate(range(min = 1, max = 5, message = "rating must be between 1 and 5"))]
    pub rating: i32,
    #[validate(length(max = 2000, message = "comment must be at most 2000 characters"))]
    pub comment: Option<String>,
}

impl InsertOpinionModel {
    /// New opinions always start as `pendiente`, whatever the client sent.
    pub fn to_entity(&self, user_id: Option<i32>) -> InsertOpinionEntity {
        InsertOpinionEntity {
            company_id: self.company_id,
            user_id,
            reviewer_name: self.reviewer_name.trim().to_string(),
            reviewer_email: non_blank(self.reviewer_email.clone()),
            rating: self.rating,
            comment: non_blank(self.comment.clone()),
            status: OpinionStatus::Pending.to_string(),
        }
    }
}

/// Moderation outcome chosen by an admin or the owning representative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpinionDecision {
    Approve,
    Reject,
}

impl OpinionDecision {
    pub fn status(&self) -> OpinionStatus {
        match self {
            OpinionDecision::Approve => OpinionStatus::Approved,
            OpinionDecision::Reject => OpinionStatus::Rejected,
        }
    }

    pub fn to_entity(&self, approver_id: i32, now: DateTime<Utc>) -> OpinionDecisionEntity {
        OpinionDecisionEntity {
            status: self.status().to_string(),
            approved_at: now,
            approved_by: approver_id,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpinionQuery {
    pub company_id: Option<i32>,
    #[serde(rename = "estado")]
    pub status: Option<OpinionStatus>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OpinionSummaryDto {
    pub company_id: i32,
    pub count: usize,
    pub average_rating: Option<f64>,
}

impl OpinionSummaryDto {
    /// Aggregates approved opinions only.
    pub fn from_opinions(company_id: i32, opinions: &[OpinionModel]) -> Self {
        let ratings: Vec<i32> = opinions
            .iter()
            .filter(|opinion| opinion.status == OpinionStatus::Approved)
            .map(|opinion| opinion.rating)
            .collect();

        let average_rating = if ratings.is_empty() {
            None
        } else {
            let total: i32 = ratings.iter().sum();
            Some((f64::from(total) / ratings.len() as f64 * 100.0).round() / 100.0)
        };

        Self {
            company_id,
            count: ratings.len(),
            average_rating,
        }
    }
}
