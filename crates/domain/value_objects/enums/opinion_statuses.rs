use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum OpinionStatus {
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
    #[serde(rename = "aprobada")]
    Approved,
    #[serde(rename = "rechazada")]
    Rejected,
}

impl OpinionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpinionStatus::Pending => "pendiente",
            OpinionStatus::Approved => "aprobada",
            OpinionStatus::Rejected => "rechazada",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "pendiente" => Some(OpinionStatus::Pending),
            "aprobada" => Some(OpinionStatus::Approved),
            "rechazada" => Some(OpinionStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_decided(&self) -> bool {
        matches!(self, OpinionStatus::Approved | OpinionStatus::Rejected)
    }
}

impl Display for OpinionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
