use std::sync::Arc;

use crates::domain::{
    repositories::roles::RoleRepository,
    value_objects::{
        iam::Actor,
        roles::{RoleModel, UpsertRoleModel},
    },
};
use tracing::{error, info};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult, ensure_admin};

/// The role catalog is an admin tool; every operation requires `admin`.
pub struct RoleUseCase<R>
where
    R: RoleRepository + Send + Sync + 'static,
{
    role_repo: Arc<R>,
}

impl<R> RoleUseCase<R>
where
    R: RoleRepository + Send + Sync + 'static,
{
    pub fn new(role_repo: Arc<R>) -> Self {
        Self { role_repo }
    }

    pub async fn list(&self, actor: Actor) -> UseCaseResult<Vec<RoleModel>> {
        ensure_admin(&actor)?;

        let roles = self.role_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "roles: failed to list roles");
            UseCaseError::Internal(err)
        })?;

        Ok(roles.into_iter().map(RoleModel::from).collect())
    }

    pub async fn get(&self, actor: Actor, role_id: i32) -> UseCaseResult<RoleModel> {
        ensure_admin(&actor)?;

        self.role_repo
            .find_by_id(role_id)
            .await
            .map_err(|err| {
                error!(%role_id, db_error = ?err, "roles: failed to load role");
                UseCaseError::Internal(err)
            })?
            .map(RoleModel::from)
            .ok_or(UseCaseError::NotFound("role"))
    }

    pub async fn create(&self, actor: Actor, model: UpsertRoleModel) -> UseCaseResult<RoleModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let role = self
            .role_repo
            .create(model.to_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "roles: failed to create role");
                UseCaseError::from_write(err)
            })?;

        info!(role_id = role.id, role_name = %role.name, "roles: role created");
        Ok(role.into())
    }

    pub async fn update(
        &self,
        actor: Actor,
        role_id: i32,
        model: UpsertRoleModel,
    ) -> UseCaseResult<RoleModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let role = self
            .role_repo
            .update(role_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%role_id, db_error = ?err, "roles: failed to update role");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("role"))?;

        info!(%role_id, "roles: role updated");
        Ok(role.into())
    }

    pub async fn delete(&self, actor: Actor, role_id: i32) -> UseCaseResult<()> {
        ensure_admin(&actor)?;

        let deleted = self.role_repo.delete(role_id).await.map_err(|err| {
            error!(%role_id, db_error = ?err, "roles: failed to delete role");
            UseCaseError::Internal(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("role"));
        }

        info!(%role_id, "roles: role deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crates::domain::{
        repositories::{UniqueViolation, roles::MockRoleRepository},
        value_objects::enums::{record_statuses::RecordStatus, user_roles::UserRole},
    };

    #[tokio::test]
    async fn duplicate_role_name_is_a_conflict() {
        let mut repo = MockRoleRepository::new();
        repo.expect_create()
            .times(1)
            .returning(|_| Err(UniqueViolation::new("roles_name_key").into()));

        let usecase = RoleUseCase::new(Arc::new(repo));
        let err = usecase
            .create(
                Actor::new(1, UserRole::Admin),
                UpsertRoleModel {
                    name: "editor".to_string(),
                    description: None,
                    permissions: vec!["companies:write".to_string()],
                    status: RecordStatus::Active,
                },
            )
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn representative_cannot_read_roles() {
        let mut repo = MockRoleRepository::new();
        repo.expect_list().never();

        let usecase = RoleUseCase::new(Arc::new(repo));
        let err = usecase
            .list(Actor::new(2, UserRole::Representative))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
