use std::sync::Arc;

use crates::domain::{
    repositories::membership_types::MembershipTypeRepository,
    value_objects::{
        iam::Actor,
        membership_types::{MembershipTypeModel, UpsertMembershipTypeModel},
    },
};
use tracing::{error, info};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult, ensure_admin};

pub struct MembershipTypeUseCase<M>
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    membership_type_repo: Arc<M>,
}

fn sees_private_plans(actor: Option<&Actor>) -> bool {
    actor.is_some_and(Actor::is_admin)
}

impl<M> MembershipTypeUseCase<M>
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    pub fn new(membership_type_repo: Arc<M>) -> Self {
        Self {
            membership_type_repo,
        }
    }

    /// Admins see every plan; everyone else only `publica` ones.
    pub async fn list(&self, actor: Option<Actor>) -> UseCaseResult<Vec<MembershipTypeModel>> {
        let plans = self.membership_type_repo.list().await.map_err(|err| {
            error!(db_error = ?err, "membership types: failed to list plans");
            UseCaseError::Internal(err)
        })?;

        let show_private = sees_private_plans(actor.as_ref());
        Ok(plans
            .into_iter()
            .map(MembershipTypeModel::from)
            .filter(|plan| show_private || plan.is_public())
            .collect())
    }

    /// A private plan is reported as missing to non-admins.
    pub async fn get(
        &self,
        actor: Option<Actor>,
        membership_type_id: i32,
    ) -> UseCaseResult<MembershipTypeModel> {
        let plan = self
            .membership_type_repo
            .find_by_id(membership_type_id)
            .await
            .map_err(|err| {
                error!(%membership_type_id, db_error = ?err, "membership types: failed to load plan");
                UseCaseError::Internal(err)
            })?
            .map(MembershipTypeModel::from)
            .ok_or(UseCaseError::NotFound("membership type"))?;

        if !plan.is_public() && !sees_private_plans(actor.as_ref()) {
            return Err(UseCaseError::NotFound("membership type"));
        }

        Ok(plan)
    }

    pub async fn create(
        &self,
        actor: Actor,
        model: UpsertMembershipTypeModel,
    ) -> UseCaseResult<MembershipTypeModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let plan = self
            .membership_type_repo
            .create(model.to_entity())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "membership types: failed to create plan");
                UseCaseError::from_write(err)
            })?;

        info!(membership_type_id = plan.id, "membership types: plan created");
        Ok(plan.into())
    }

    pub async fn update(
        &self,
        actor: Actor,
        membership_type_id: i32,
        model: UpsertMembershipTypeModel,
    ) -> UseCaseResult<MembershipTypeModel> {
        ensure_admin(&actor)?;
        model.validate()?;

        let plan = self
            .membership_type_repo
            .update(membership_type_id, model.to_entity())
            .await
            .map_err(|err| {
                error!(%membership_type_id, db_error = ?err, "membership types: failed to update plan");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("membership type"))?;

        info!(%membership_type_id, "membership types: plan updated");
        Ok(plan.into())
    }

    pub async fn delete(&self, actor: Actor, membership_type_id: i32) -> UseCaseResult<()> {
        ensure_admin(&actor)?;

        let deleted = self
            .membership_type_repo
            .delete(membership_type_id)
            .await
            .map_err(|err| {
                error!(%membership_type_id, db_error = ?err, "membership types: failed to delete plan");
                UseCaseError::from_write(err)
            })?;

        if !deleted {
            return Err(UseCaseError::NotFound("membership type"));
        }

        info!(%membership_type_id, "membership types: plan deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use crates::domain::{
        entities::membership_types::MembershipTypeEntity,
        repositories::membership_types::MockMembershipTypeRepository,
        value_objects::enums::user_roles::UserRole,
    };

    fn plan(id: i32, visibility: &str) -> MembershipTypeEntity {
        let now = Utc::now();
        MembershipTypeEntity {
            id,
            name: format!("Plan {id}"),
            description: None,
            pricing: serde_json::json!([{"periodicity": "anual", "cost": 1200.0}]),
            benefits: serde_json::json!([]),
            visibility: visibility.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn repo_with_plans() -> MockMembershipTypeRepository {
        let mut repo = MockMembershipTypeRepository::new();
        repo.expect_list()
            .returning(|| Ok(vec![plan(1, "publica"), plan(2, "privada")]));
        repo
    }

    #[tokio::test]
    async fn anonymous_visitors_only_see_public_plans() {
        let usecase = MembershipTypeUseCase::new(Arc::new(repo_with_plans()));

        let plans = usecase.list(None).await.unwrap();
        assert_eq!(plans.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1]);

        let plans = usecase
            .list(Some(Actor::new(4, UserRole::Representative)))
            .await
            .unwrap();
        assert_eq!(plans.len(), 1);
    }

    #[tokio::test]
    async fn admins_see_private_plans() {
        let usecase = MembershipTypeUseCase::new(Arc::new(repo_with_plans()));

        let plans = usecase
            .list(Some(Actor::new(1, UserRole::Admin)))
            .await
            .unwrap();
        assert_eq!(plans.len(), 2);
    }

    #[tokio::test]
    async fn private_plan_detail_is_hidden_from_public() {
        let mut repo = MockMembershipTypeRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(plan(id, "privada"))));

        let usecase = MembershipTypeUseCase::new(Arc::new(repo));
        let err = usecase.get(None, 2).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let found = usecase
            .get(Some(Actor::new(1, UserRole::Admin)), 2)
            .await
            .unwrap();
        assert_eq!(found.id, 2);
    }
}
