use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaymentStatus {
    #[default]
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
    #[serde(rename = "canceled")]
    Canceled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Succeeded => "succeeded",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Canceled => "canceled",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(PaymentStatus::Pending),
            "succeeded" => Some(PaymentStatus::Succeeded),
            "failed" => Some(PaymentStatus::Failed),
            "canceled" => Some(PaymentStatus::Canceled),
            _ => None,
        }
    }

    /// `failed` stays open: Stripe lets the customer retry the same intent
    /// after a declined card.
    pub fn is_final(&self) -> bool {
        matches!(self, PaymentStatus::Succeeded | PaymentStatus::Canceled)
    }

    /// Statuses a row may still leave.
    pub fn open_statuses() -> [&'static str; 2] {
        [PaymentStatus::Pending.as_str(), PaymentStatus::Failed.as_str()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declined_payment_can_still_settle() {
        assert!(!PaymentStatus::Pending.is_final());
        assert!(!PaymentStatus::Failed.is_final());
        assert!(PaymentStatus::Succeeded.is_final());
        assert!(PaymentStatus::Canceled.is_final());
    }
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
