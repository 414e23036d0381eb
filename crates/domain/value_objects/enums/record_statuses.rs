use std::fmt::Display;

use serde::{Deserialize, Serialize};

// Shared by certificates and the roles catalog.
#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecordStatus {
    #[default]
    #[serde(rename = "activo")]
    Active,
    #[serde(rename = "inactivo")]
    Inactive,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Active => "activo",
            RecordStatus::Inactive => "inactivo",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "activo" => Some(RecordStatus::Active),
            "inactivo" => Some(RecordStatus::Inactive),
            _ => None,
        }
    }
}

impl Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
