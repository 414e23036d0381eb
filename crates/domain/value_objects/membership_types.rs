use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::{
    entities::membership_types::{InsertMembershipTypeEntity, MembershipTypeEntity},
    value_objects::{
        enums::{periodicities::Periodicity, visibilities::Visibility},
        validation::{non_blank, schema_error},
    },
};

/// Upper bound for a plan price in major units; keeps minor amounts well
/// inside `i64` for every supported currency exponent.
pub const MAX_PLAN_COST: f64 = 99_999_999.0;

/// ISO 4217 codes Stripe charges without a fractional part.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "bif", "clp", "djf", "gnf", "jpy", "kmf", "krw", "mga", "pyg", "rwf", "ugx", "vnd", "vuv",
    "xaf", "xof", "xpf",
];

const THREE_DECIMAL_CURRENCIES: &[&str] = &["bhd", "jod", "kwd", "omr", "tnd"];

/// Number of minor-unit digits for a currency code.
pub fn currency_exponent(currency: &str) -> i32 {
    let code = currency.trim().to_ascii_lowercase();
    if ZERO_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&code.as_str()) {
        3
    } else {
        2
    }
}

/// One purchasable price of a plan. `cost` is in major currency units.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PricingOption {
    pub periodicity: Periodicity,
    pub cost: f64,
}

impl PricingOption {
    /// Amount in the currency's minor units as expected by the payment
    /// processor. `None` for costs outside `0..=MAX_PLAN_COST`.
    pub fn amount_minor(&self, currency: &str) -> Option<i64> {
        if !self.cost.is_finite() || !(0.0..=MAX_PLAN_COST).contains(&self.cost) {
            return None;
        }
        Some((self.cost * 10f64.powi(currency_exponent(currency))).round() as i64)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MembershipTypeModel {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub pricing: Vec<PricingOption>,
    pub benefits: Vec<String>,
    pub visibility: Visibility,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<MembershipTypeEntity> for MembershipTypeModel {
    fn from(entity: MembershipTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            pricing: serde_json::from_value(entity.pricing).unwrap_or_default(),
            benefits: serde_json::from_value(entity.benefits).unwrap_or_default(),
            visibility: Visibility::from_str(&entity.visibility).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl MembershipTypeModel {
    pub fn pricing_for(&self, periodicity: Periodicity) -> Option<PricingOption> {
        self.pricing
            .iter()
            .copied()
            .find(|option| option.periodicity == periodicity)
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_pricing"))]
pub struct UpsertMembershipTypeModel {
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub pricing: Vec<PricingOption>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
}

fn validate_pricing(model: &UpsertMembershipTypeModel) -> Result<(), ValidationError> {
    for (idx, option) in model.pricing.iter().enumerate() {
        if !option.cost.is_finite() || option.cost < 0.0 {
            return Err(schema_error(
                "pricing_cost",
                format!("pricing[{idx}].cost must be a non-negative number"),
            ));
        }
        if option.cost > MAX_PLAN_COST {
            return Err(schema_error(
                "pricing_cost",
                format!("pricing[{idx}].cost must not exceed {MAX_PLAN_COST}"),
            ));
        }

        if model.pricing[..idx]
            .iter()
            .any(|other| other.periodicity == option.periodicity)
        {
            return Err(schema_error(
                "pricing_periodicity",
                format!("periodicity {} is listed more than once", option.periodicity),
            ));
        }
    }

    Ok(())
}

impl UpsertMembershipTypeModel {
    pub fn to_entity(&self) -> InsertMembershipTypeEntity {
        let benefits: Vec<String> = self
            .benefits
            .iter()
            .map(|benefit| benefit.trim().to_string())
            .filter(|benefit| !benefit.is_empty())
            .collect();

        let pricing = self
            .pricing
            .iter()
            .map(|option| {
                serde_json::json!({
                    "periodicity": option.periodicity.as_str(),
                    "cost": option.cost,
                })
            })
            .collect::<Vec<_>>();

        InsertMembershipTypeEntity {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.clone()),
            pricing: serde_json::Value::from(pricing),
            benefits: serde_json::Value::from(benefits),
            visibility: self.visibility.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upsert(pricing: Vec<PricingOption>) -> UpsertMembershipTypeModel {
        UpsertMembershipTypeModel {
            name: "Oro".to_string(),
            description: None,
            pricing,
            benefits: vec!["Logo destacado".to_string(), "".to_string()],
            visibility: Visibility::Public,
        }
    }

    #[test]
    fn rejects_negative_cost() {
        let model = upsert(vec![PricingOption {
            periodicity: Periodicity::Monthly,
            cost: -1.0,
        }]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn rejects_cost_above_cap() {
        let model = upsert(vec![PricingOption {
            periodicity: Periodicity::Annual,
            cost: MAX_PLAN_COST + 1.0,
        }]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn minor_amount_follows_currency_exponent() {
        let option = PricingOption {
            periodicity: Periodicity::Monthly,
            cost: 1200.0,
        };
        assert_eq!(option.amount_minor("MXN"), Some(120_000));
        assert_eq!(option.amount_minor("jpy"), Some(1200));
        assert_eq!(option.amount_minor("clp"), Some(1200));
        assert_eq!(option.amount_minor("kwd"), Some(1_200_000));

        let huge = PricingOption {
            periodicity: Periodicity::Monthly,
            cost: 1e300,
        };
        assert_eq!(huge.amount_minor("usd"), None);
    }

    #[test]
    fn rejects_duplicate_periodicity() {
        let model = upsert(vec![
            PricingOption {
                periodicity: Periodicity::Annual,
                cost: 100.0,
            },
            PricingOption {
                periodicity: Periodicity::Annual,
                cost: 90.0,
            },
        ]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn entity_round_trips_pricing_through_json() {
        let model = upsert(vec![PricingOption {
            periodicity: Periodicity::Quarterly,
            cost: 49.99,
        }]);
        assert!(model.validate().is_ok());

        let entity = model.to_entity();
        assert_eq!(entity.benefits, serde_json::json!(["Logo destacado"]));

        let now = Utc::now();
        let parsed = MembershipTypeModel::from(MembershipTypeEntity {
            id: 7,
            name: entity.name,
            description: entity.description,
            pricing: entity.pricing,
            benefits: entity.benefits,
            visibility: entity.visibility,
            created_at: now,
            updated_at: now,
        });
        let option = parsed.pricing_for(Periodicity::Quarterly).unwrap();
        assert_eq!(option.amount_minor("mxn"), Some(4999));
        assert!(parsed.pricing_for(Periodicity::Monthly).is_none());
    }

    #[test]
    fn pricing_accepts_spanish_periodicity_names() {
        let option: PricingOption =
            serde_json::from_str(r#"{"periodicity":"semestral","cost":10}"#).unwrap();
        assert_eq!(option.periodicity, Periodicity::Semiannual);
    }
}
