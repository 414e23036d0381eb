use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        companies::UpdateCompanyMembershipEntity, membership_payments::MembershipPaymentEntity,
    },
    value_objects::enums::{payment_statuses::PaymentStatus, periodicities::Periodicity},
};

/// Payment method written on the company once a processor payment settles.
pub const STRIPE_PAYMENT_METHOD: &str = "stripe";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipPaymentModel {
    pub id: i32,
    pub user_id: i32,
    pub company_id: i32,
    pub membership_type_id: i32,
    pub stripe_payment_intent_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub periodicity: Option<Periodicity>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipPaymentEntity> for MembershipPaymentModel {
    fn from(entity: MembershipPaymentEntity) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            company_id: entity.company_id,
            membership_type_id: entity.membership_type_id,
            stripe_payment_intent_id: entity.stripe_payment_intent_id,
            amount_minor: entity.amount_minor,
            currency: entity.currency,
            periodicity: Periodicity::from_str(&entity.periodicity),
            status: PaymentStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentIntentModel {
    pub company_id: i32,
    pub membership_type_id: i32,
    pub periodicity: Periodicity,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentCreatedDto {
    pub payment_id: i32,
    pub payment_intent_id: String,
    pub client_secret: String,
    /// Minor currency units.
    pub amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentModel {
    pub payment_intent_id: String,
}

/// Company membership columns for a settled purchase: starts on `start`,
/// ends one billing period later.
pub fn membership_for_purchase(
    membership_type_id: i32,
    periodicity: Periodicity,
    start: NaiveDate,
    payment_intent_id: &str,
    now: DateTime<Utc>,
) -> Option<UpdateCompanyMembershipEntity> {
    let end = start.checked_add_months(Months::new(periodicity.months()))?;

    Some(UpdateCompanyMembershipEntity {
        membership_type_id,
        membership_payment_method: STRIPE_PAYMENT_METHOD.to_string(),
        membership_start_date: start,
        membership_end_date: end,
        membership_notes: Some(format!(
            "Pago {} ({})",
            payment_intent_id,
            periodicity.as_str()
        )),
        updated_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annual_purchase_ends_a_year_later() {
        let start = NaiveDate::from_ymd_opt(2025, 2, 28).unwrap();
        let membership =
            membership_for_purchase(7, Periodicity::Annual, start, "pi_123", Utc::now()).unwrap();

        assert_eq!(membership.membership_type_id, 7);
        assert_eq!(membership.membership_payment_method, "stripe");
        assert_eq!(
            membership.membership_end_date,
            NaiveDate::from_ymd_opt(2026, 2, 28).unwrap()
        );
    }

    #[test]
    fn monthly_purchase_clamps_to_month_end() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        let membership =
            membership_for_purchase(1, Periodicity::Monthly, start, "pi_1", Utc::now()).unwrap();
        assert_eq!(
            membership.membership_end_date,
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
    }
}
