use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::{
    entities::users::{InsertUserEntity, UpdateUserEntity, UserEntity},
    value_objects::{enums::user_roles::UserRole, validation::non_blank},
};

/// The authenticated caller as seen by the use cases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i32,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i32, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_representative(&self) -> bool {
        self.role == UserRole::Representative
    }

    /// Admins manage every company; representatives only the ones whose
    /// `userId` is their own id.
    pub fn can_manage_company(&self, owner_id: Option<i32>) -> bool {
        match self.role {
            UserRole::Admin => true,
            UserRole::Representative => owner_id == Some(self.user_id),
            UserRole::User => false,
        }
    }
}

/// Identity asserted by the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProfile {
    pub uid: String,
    pub email: String,
    /// Email/password sign-ups stay unverified until the user follows the
    /// provider's verification link.
    pub email_verified: bool,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserModel {
    pub id: i32,
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
    pub stripe_customer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserEntity> for UserModel {
    fn from(entity: UserEntity) -> Self {
        Self {
            id: entity.id,
            uid: entity.uid,
            email: entity.email,
            display_name: entity.display_name,
            role: UserRole::from_str(&entity.role).unwrap_or_default(),
            stripe_customer_id: entity.stripe_customer_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl UserModel {
    pub fn actor(&self) -> Actor {
        Actor::new(self.id, self.role)
    }
}

impl IdentityProfile {
    pub fn to_insert_entity(&self, role: UserRole) -> InsertUserEntity {
        InsertUserEntity {
            uid: self.uid.clone(),
            email: self.email.trim().to_lowercase(),
            display_name: non_blank(self.display_name.clone()),
            role: role.to_string(),
        }
    }

    /// Refreshes the mirrored email and display name; role stays untouched.
    pub fn to_refresh_entity(&self) -> UpdateUserEntity {
        UpdateUserEntity {
            email: Some(self.email.trim().to_lowercase()),
            display_name: non_blank(self.display_name.clone()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserModel {
    #[validate(length(max = 120, message = "displayName must be at most 120 characters"))]
    pub display_name: Option<String>,
    pub role: Option<UserRole>,
}

impl UpdateUserModel {
    pub fn to_entity(&self) -> UpdateUserEntity {
        UpdateUserEntity {
            display_name: non_blank(self.display_name.clone()),
            role: self.role.map(|role| role.to_string()),
            updated_at: Some(Utc::now()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_manages_every_company() {
        let admin = Actor::new(1, UserRole::Admin);
        assert!(admin.can_manage_company(None));
        assert!(admin.can_manage_company(Some(99)));
    }

    #[test]
    fn representative_manages_only_owned_companies() {
        let representative = Actor::new(7, UserRole::Representative);
        assert!(representative.can_manage_company(Some(7)));
        assert!(!representative.can_manage_company(Some(8)));
        assert!(!representative.can_manage_company(None));
    }

    #[test]
    fn plain_user_manages_nothing_even_when_listed_as_owner() {
        let user = Actor::new(3, UserRole::User);
        assert!(!user.can_manage_company(Some(3)));
    }

    #[test]
    fn unknown_role_in_row_falls_back_to_user() {
        let now = Utc::now();
        let model = UserModel::from(UserEntity {
            id: 1,
            uid: "uid-1".to_string(),
            email: "a@b.com".to_string(),
            display_name: None,
            role: "superuser".to_string(),
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        });
        assert_eq!(model.role, UserRole::User);
    }

    #[test]
    fn identity_email_is_normalized_on_insert() {
        let profile = IdentityProfile {
            uid: "uid-1".to_string(),
            email: " Ana@Example.COM ".to_string(),
            email_verified: true,
            display_name: Some("  ".to_string()),
        };
        let entity = profile.to_insert_entity(UserRole::Representative);
        assert_eq!(entity.email, "ana@example.com");
        assert_eq!(entity.display_name, None);
        assert_eq!(entity.role, "representante");
    }
}
