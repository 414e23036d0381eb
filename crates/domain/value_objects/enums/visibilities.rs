use std::fmt::Display;

use serde::{Deserialize, Serialize};

#[derive(Default, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    #[serde(rename = "publica")]
    Public,
    #[serde(rename = "privada")]
    Private,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "publica",
            Visibility::Private => "privada",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "publica" => Some(Visibility::Public),
            "privada" => Some(Visibility::Private),
            _ => None,
        }
    }
}

impl Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
