use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CompanyStatus {
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
    #[default]
    #[serde(rename = "pendiente")]
    Pending,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompanyStatus::Active => "activo",
            CompanyStatus::Inactive => "inactivo",
            CompanyStatus::Pending => "pendiente",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "activo" => Some(CompanyStatus::Active),
            "inactivo" => Some(CompanyStatus::Inactive),
            "pendiente" => Some(CompanyStatus::Pending),
            _ => None,
        }
    }
}

impl Display for CompanyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
