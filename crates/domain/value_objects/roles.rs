use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::roles::{InsertRoleEntity, RoleEntity},
    value_objects::{enums::record_statuses::RecordStatus, validation::non_blank},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoleModel {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub permissions: Vec<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RoleEntity> for RoleModel {
    fn from(entity: RoleEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            permissions: serde_json::from_value(entity.permissions).unwrap_or_default(),
            status: RecordStatus::from_str(&entity.status).unwrap_or_default(),
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpsertRoleModel {
    #[validate(length(min = 1, max = 80, message = "name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default)]
    pub status: RecordStatus,
}

impl UpsertRoleModel {
    /// Permissions are trimmed, blank entries dropped and duplicates removed
    /// while keeping the submitted order.
    pub fn to_entity(&self) -> InsertRoleEntity {
        let mut permissions: Vec<String> = Vec::with_capacity(self.permissions.len());
        for permission in &self.permissions {
            let permission = permission.trim();
            if !permission.is_empty() && !permissions.iter().any(|p| p == permission) {
                permissions.push(permission.to_string());
            }
        }

        InsertRoleEntity {
            name: self.name.trim().to_string(),
            description: non_blank(self.description.clone()),
            permissions: serde_json::Value::from(permissions),
            status: self.status.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_are_deduplicated_in_order() {
        let model = UpsertRoleModel {
            name: " editor ".to_string(),
            description: None,
            permissions: vec![
                "companies:write".to_string(),
                " ".to_string(),
                "opinions:moderate".to_string(),
                "companies:write".to_string(),
            ],
            status: RecordStatus::Active,
        };

        let entity = model.to_entity();
        assert_eq!(entity.name, "editor");
        assert_eq!(
            entity.permissions,
            serde_json::json!(["companies:write", "opinions:moderate"])
        );
        assert_eq!(entity.status, "activo");
    }
}
