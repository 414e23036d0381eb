use std::sync::Arc;

use crates::domain::{
    repositories::system_settings::SystemSettingsRepository,
    value_objects::{
        iam::Actor,
        system_settings::{SystemSettingsModel, UpdateSystemSettingsModel},
    },
};
use tracing::{error, info};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult, ensure_admin};

pub struct SystemSettingsUseCase<S>
where
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    settings_repo: Arc<S>,
}

impl<S> SystemSettingsUseCase<S>
where
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    pub fn new(settings_repo: Arc<S>) -> Self {
        Self { settings_repo }
    }

    /// Defaults stand in until an admin saves the settings for the first time.
    pub async fn get(&self, actor: Option<Actor>) -> UseCaseResult<SystemSettingsModel> {
        let settings = self
            .settings_repo
            .get()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "system settings: failed to load settings");
                UseCaseError::Internal(err)
            })?
            .map(SystemSettingsModel::from)
            .unwrap_or_default();

        if actor.is_some_and(|actor| actor.is_admin()) {
            Ok(settings)
        } else {
            Ok(settings.public_view())
        }
    }

    pub async fn update(
        &self,
        actor: Actor,
        model: UpdateSystemSettingsModel,
    ) -> UseCaseResult<SystemSettingsModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let saved = self
            .settings_repo
            .upsert(model.to_entity()?)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "system settings: failed to save settings");
                UseCaseError::Internal(err)
            })?;

        info!(
            admin_id = actor.user_id,
            maintenance_mode = saved.maintenance_mode,
            registration_enabled = saved.registration_enabled,
            "system settings: settings saved"
        );
        Ok(saved.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crates::domain::{
        repositories::system_settings::MockSystemSettingsRepository,
        value_objects::enums::user_roles::UserRole,
    };

    #[tokio::test]
    async fn missing_row_returns_defaults() {
        let mut repo = MockSystemSettingsRepository::new();
        repo.expect_get().returning(|| Ok(None));

        let usecase = SystemSettingsUseCase::new(Arc::new(repo));
        let settings = usecase.get(None).await.unwrap();

        assert!(settings.registration_enabled);
        assert_eq!(settings.updated_at, None);
    }

    #[tokio::test]
    async fn non_admin_cannot_update_settings() {
        let mut repo = MockSystemSettingsRepository::new();
        repo.expect_upsert().never();

        let model: UpdateSystemSettingsModel = serde_json::from_value(serde_json::json!({
            "siteName": "Directorio",
            "colors": {"primary": "#000", "secondary": "#111", "accent": "#222"},
            "locale": "es-MX",
            "currency": "MXN",
            "timezone": "America/Mexico_City",
            "maxUploadSizeMb": 5
        }))
        .unwrap();

        let usecase = SystemSettingsUseCase::new(Arc::new(repo));
        let err = usecase
            .update(Actor::new(5, UserRole::Representative), model)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
