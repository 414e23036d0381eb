use std::sync::Arc;

use crates::domain::{
    repositories::{system_settings::SystemSettingsRepository, users::UserRepository},
    value_objects::{
        enums::user_roles::UserRole,
        iam::{Actor, IdentityProfile, UpdateUserModel, UserModel},
    },
};
use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    config::config_model::Access,
    usecases::errors::{UseCaseError, UseCaseResult, ensure_admin},
};

pub struct UserUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    user_repo: Arc<U>,
    settings_repo: Arc<S>,
    access: Access,
}

impl<U, S> UserUseCase<U, S>
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    pub fn new(user_repo: Arc<U>, settings_repo: Arc<S>, access: Access) -> Self {
        Self {
            user_repo,
            settings_repo,
            access,
        }
    }

    /// Mirrors the identity-provider account locally. Existing users get
    /// their email and display name refreshed; new users are created with
    /// the `user` role unless their verified email is configured as an admin
    /// email.
    pub async fn sync(&self, profile: IdentityProfile) -> UseCaseResult<UserModel> {
        let existing = self
            .user_repo
            .find_by_uid(profile.uid.clone())
            .await
            .map_err(|err| {
                error!(uid = %profile.uid, db_error = ?err, "users: failed to look up identity");
                UseCaseError::Internal(err)
            })?;

        if let Some(user) = existing {
            let refreshed = self
                .user_repo
                .update(user.id, profile.to_refresh_entity())
                .await
                .map_err(|err| {
                    error!(user_id = user.id, db_error = ?err, "users: failed to refresh user");
                    UseCaseError::from_write(err)
                })?
                .ok_or(UseCaseError::NotFound("user"))?;

            info!(user_id = refreshed.id, "users: identity refreshed");
            return Ok(refreshed.into());
        }

        let settings = self.settings_repo.get().await.map_err(|err| {
            error!(db_error = ?err, "users: failed to load system settings");
            UseCaseError::Internal(err)
        })?;
        if settings.is_some_and(|settings| !settings.registration_enabled) {
            warn!(uid = %profile.uid, "users: registration is disabled; new identity rejected");
            return Err(UseCaseError::Forbidden(
                "registration is currently disabled".to_string(),
            ));
        }

        let admin_email = self.access.is_admin_email(&profile.email);
        if admin_email && !profile.email_verified {
            warn!(uid = %profile.uid, "users: admin email is unverified; registering as user");
        }
        let role = if admin_email && profile.email_verified {
            UserRole::Admin
        } else {
            UserRole::User
        };

        let created = self
            .user_repo
            .create(profile.to_insert_entity(role))
            .await
            .map_err(|err| {
                error!(uid = %profile.uid, db_error = ?err, "users: failed to register user");
                UseCaseError::from_write(err)
            })?;

        info!(user_id = created.id, role = %role, "users: new user registered");
        Ok(created.into())
    }

    pub async fn list(&self, actor: Actor) -> UseCaseResult<Vec<UserModel>> {
        ensure_admin(&actor)?;

        let users = self.user_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "users: failed to list users");
            UseCaseError::Internal(err)
        })?;

        Ok(users.into_iter().map(UserModel::from).collect())
    }

    pub async fn get(&self, actor: Actor, user_id: i32) -> UseCaseResult<UserModel> {
        if !actor.is_admin() && actor.user_id != user_id {
            return Err(UseCaseError::Forbidden(
                "you can only view your own account".to_string(),
            ));
        }

        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to load user");
                UseCaseError::Internal(err)
            })?
            .map(UserModel::from)
            .ok_or(UseCaseError::NotFound("user"))
    }

    pub async fn update(
        &self,
        actor: Actor,
        user_id: i32,
        model: UpdateUserModel,
    ) -> UseCaseResult<UserModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let updated = self
            .user_repo
            .update(user_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "users: failed to update user");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("user"))?;

        info!(
            %user_id,
            role = %updated.role,
            admin_id = actor.user_id,
            "users: user updated"
        );
        Ok(updated.into())
    }

    pub async fn delete(&self, actor: Actor, user_id: i32) -> UseCaseResult<()> {
        ensure_admin(&actor)?;
        if actor.user_id == user_id {
            return Err(UseCaseError::BadRequest(
                "admins cannot delete their own account".to_string(),
            ));
        }

        let deleted = self.user_repo.delete(user_id).await.map_err(|err| {
            error!(%user_id, db_error = ?err, "users: failed to delete user");
            UseCaseError::from_write(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("user"));
        }

        info!(%user_id, admin_id = actor.user_id, "users: user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use crates::domain::{
        entities::{system_settings::SystemSettingsEntity, users::UserEntity},
        repositories::{
            ReferencedRow, system_settings::MockSystemSettingsRepository,
            users::MockUserRepository,
        },
    };
    use mockall::predicate::eq;

    fn profile(email: &str) -> IdentityProfile {
        IdentityProfile {
            uid: "firebase-uid-1".to_string(),
            email: email.to_string(),
            email_verified: true,
            display_name: Some("Ana López".to_string()),
        }
    }

    fn stored_user(id: i32, email: &str, role: &str) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            uid: "firebase-uid-1".to_string(),
            email: email.to_string(),
            display_name: Some("Ana López".to_string()),
            role: role.to_string(),
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn settings(registration_enabled: bool) -> SystemSettingsEntity {
        let now = Utc::now();
        SystemSettingsEntity {
            id: 1,
            site_name: "Directorio".to_string(),
            site_description: None,
            logo_url: None,
            favicon_url: None,
            primary_color: "#000000".to_string(),
            secondary_color: "#111111".to_string(),
            accent_color: "#222222".to_string(),
            locale: "es-MX".to_string(),
            currency: "MXN".to_string(),
            timezone: "America/Mexico_City".to_string(),
            contact_email: None,
            contact_phone: None,
            contact_address: None,
            social_links: serde_json::json!({}),
            seo_config: serde_json::json!({}),
            email_config: serde_json::json!({}),
            payment_config: serde_json::json!({}),
            maintenance_mode: false,
            registration_enabled,
            max_upload_size_mb: 5,
            allowed_file_types: serde_json::json!([]),
            created_at: now,
            updated_at: now,
        }
    }

    fn access() -> Access {
        Access {
            admin_emails: vec!["admin@directorio.mx".to_string()],
        }
    }

    #[tokio::test]
    async fn registration_disabled_rejects_new_identity() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_uid()
            .with(eq("firebase-uid-1".to_string()))
            .returning(|_| Ok(None));
        users.expect_create().never();
        let mut settings_repo = MockSystemSettingsRepository::new();
        settings_repo
            .expect_get()
            .returning(|| Ok(Some(settings(false))));

        let usecase = UserUseCase::new(Arc::new(users), Arc::new(settings_repo), access());
        let err = usecase.sync(profile("ana@empresa.mx")).await.unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn configured_admin_email_registers_as_admin() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_uid().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|entity| entity.role == "admin" && entity.email == "admin@directorio.mx")
            .times(1)
            .returning(|entity| Ok(stored_user(1, &entity.email, &entity.role)));
        let mut settings_repo = MockSystemSettingsRepository::new();
        settings_repo.expect_get().returning(|| Ok(None));

        let usecase = UserUseCase::new(Arc::new(users), Arc::new(settings_repo), access());
        let user = usecase.sync(profile(" Admin@Directorio.mx ")).await.unwrap();

        assert_eq!(user.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn unverified_admin_email_registers_as_user() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_uid().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|entity| entity.role == "user" && entity.email == "admin@directorio.mx")
            .times(1)
            .returning(|entity| Ok(stored_user(1, &entity.email, &entity.role)));
        let mut settings_repo = MockSystemSettingsRepository::new();
        settings_repo.expect_get().returning(|| Ok(None));

        let usecase = UserUseCase::new(Arc::new(users), Arc::new(settings_repo), access());
        let unverified = IdentityProfile {
            email_verified: false,
            ..profile("admin@directorio.mx")
        };
        let user = usecase.sync(unverified).await.unwrap();

        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn new_identity_defaults_to_user_role() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_uid().returning(|_| Ok(None));
        users
            .expect_create()
            .withf(|entity| entity.role == "user")
            .times(1)
            .returning(|entity| Ok(stored_user(2, &entity.email, &entity.role)));
        let mut settings_repo = MockSystemSettingsRepository::new();
        settings_repo
            .expect_get()
            .returning(|| Ok(Some(settings(true))));

        let usecase = UserUseCase::new(Arc::new(users), Arc::new(settings_repo), access());
        let user = usecase.sync(profile("ana@empresa.mx")).await.unwrap();

        assert_eq!(user.role, UserRole::User);
    }

    #[tokio::test]
    async fn existing_identity_is_refreshed_even_when_registration_is_closed() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_uid()
            .returning(|_| Ok(Some(stored_user(3, "old@empresa.mx", "representante"))));
        users
            .expect_update()
            .withf(|id, changes| {
                *id == 3
                    && changes.email.as_deref() == Some("ana@empresa.mx")
                    && changes.role.is_none()
            })
            .times(1)
            .returning(|id, _| Ok(Some(stored_user(id, "ana@empresa.mx", "representante"))));
        let mut settings_repo = MockSystemSettingsRepository::new();
        settings_repo.expect_get().never();

        let usecase = UserUseCase::new(Arc::new(users), Arc::new(settings_repo), access());
        let user = usecase.sync(profile("ana@empresa.mx")).await.unwrap();

        assert_eq!(user.role, UserRole::Representative);
    }

    #[tokio::test]
    async fn user_can_read_self_but_not_others() {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(4))
            .returning(|id| Ok(Some(stored_user(id, "ana@empresa.mx", "user"))));

        let usecase = UserUseCase::new(
            Arc::new(users),
            Arc::new(MockSystemSettingsRepository::new()),
            access(),
        );
        let actor = Actor::new(4, UserRole::User);

        assert_eq!(usecase.get(actor, 4).await.unwrap().id, 4);
        let err = usecase.get(actor, 5).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_cannot_delete_own_account() {
        let mut users = MockUserRepository::new();
        users.expect_delete().never();

        let usecase = UserUseCase::new(
            Arc::new(users),
            Arc::new(MockSystemSettingsRepository::new()),
            access(),
        );
        let err = usecase
            .delete(Actor::new(1, UserRole::Admin), 1)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn user_with_payment_history_cannot_be_deleted() {
        let mut users = MockUserRepository::new();
        users.expect_delete().with(eq(9)).times(1).returning(|_| {
            Err(ReferencedRow::new("membership_payments_user_id_fkey").into())
        });

        let usecase = UserUseCase::new(
            Arc::new(users),
            Arc::new(MockSystemSettingsRepository::new()),
            access(),
        );
        let err = usecase
            .delete(Actor::new(1, UserRole::Admin), 9)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }
}
