use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Periodicity {
    #[serde(rename = "mensual")]
    Monthly,
    #[serde(rename = "trimestral")]
    Quarterly,
    #[serde(rename = "semestral")]
    Semiannual,
    #[serde(rename = "anual")]
    Annual,
}

impl Periodicity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Periodicity::Monthly => "mensual",
            Periodicity::Quarterly => "trimestral",
            Periodicity::Semiannual => "semestral",
            Periodicity::Annual => "anual",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "mensual" => Some(Periodicity::Monthly),
            "trimestral" => Some(Periodicity::Quarterly),
            "semestral" => Some(Periodicity::Semiannual),
            "anual" => Some(Periodicity::Annual),
            _ => None,
        }
    }

    /// Length of one billing period in calendar months.
    pub fn months(&self) -> u32 {
        match self {
            Periodicity::Monthly => 1,
            Periodicity::Quarterly => 3,
            Periodicity::Semiannual => 6,
            Periodicity::Annual => 12,
        }
    }
}

impl Display for Periodicity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
