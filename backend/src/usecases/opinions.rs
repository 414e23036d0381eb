use std::sync::Arc;

use chrono::Utc;
use crates::domain::{
    entities::companies::CompanyEntity,
    repositories::{companies::CompanyRepository, opinions::OpinionRepository},
    value_objects::{
        enums::{
            company_statuses::CompanyStatus, opinion_statuses::OpinionStatus,
            user_roles::UserRole,
        },
        iam::Actor,
        opinions::{InsertOpinionModel, OpinionDecision, OpinionModel, OpinionSummaryDto},
    },
};
use tracing::{error, info, warn};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult};

pub struct OpinionUseCase<O, C>
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    opinion_repo: Arc<O>,
    company_repo: Arc<C>,
}

impl<O, C> OpinionUseCase<O, C>
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    pub fn new(opinion_repo: Arc<O>, company_repo: Arc<C>) -> Self {
        Self {
            opinion_repo,
            company_repo,
        }
    }

    /// Anyone may review a listed company; the review waits in `pendiente`
    /// until moderated. Unlisted companies answer 404 like a missing id.
    pub async fn submit(
        &self,
        actor: Option<Actor>,
        model: InsertOpinionModel,
    ) -> UseCaseResult<OpinionModel> {
        model.validate()?;
        let company = self.load_company(model.company_id).await?;
        if CompanyStatus::from_str(&company.status) != Some(CompanyStatus::Active) {
            return Err(UseCaseError::NotFound("company"));
        }

        let user_id = actor.map(|actor| actor.user_id);
        let opinion = self
            .opinion_repo
            .create(model.to_entity(user_id))
            .await
            .map_err(|err| {
                error!(company_id = model.company_id, db_error = ?err, "opinions: failed to store opinion");
                UseCaseError::Internal(err)
            })?;

        info!(
            opinion_id = opinion.id,
            company_id = opinion.company_id,
            user_id = ?user_id,
            rating = opinion.rating,
            "opinions: opinion submitted for moderation"
        );
        Ok(OpinionModel::from(opinion).redacted())
    }

    pub async fn list_approved(&self, company_id: Option<i32>) -> UseCaseResult<Vec<OpinionModel>> {
        let status = Some(OpinionStatus::Approved.to_string());
        let opinions = match company_id {
            Some(company_id) => {
                self.opinion_repo
                    .list_by_companies(vec![company_id], status)
                    .await
            }
            None => self.opinion_repo.list(status).await,
        }
        .map_err(|err| {
            error!(company_id = ?company_id, db_error = ?err, "opinions: failed to list approved opinions");
            UseCaseError::Internal(err)
        })?;

        Ok(opinions
            .into_iter()
            .map(|opinion| OpinionModel::from(opinion).redacted())
            .collect())
    }

    pub async fn summary(&self, company_id: i32) -> UseCaseResult<OpinionSummaryDto> {
        let approved = self.list_approved(Some(company_id)).await?;
        Ok(OpinionSummaryDto::from_opinions(company_id, &approved))
    }

    /// Moderation queue: every opinion for admins, owned companies' opinions
    /// for representatives.
    pub async fn list_for_moderation(
        &self,
        actor: Actor,
        status: Option<OpinionStatus>,
    ) -> UseCaseResult<Vec<OpinionModel>> {
        let status = status.map(|status| status.to_string());
        let opinions = match actor.role {
            UserRole::Admin => self.opinion_repo.list(status).await,
            UserRole::Representative => {
                let owned = self
                    .company_repo
                    .list_by_owner(actor.user_id)
                    .await
                    .map_err(|err| {
                        error!(user_id = actor.user_id, db_error = ?err, "opinions: failed to list owned companies");
                        UseCaseError::Internal(err)
                    })?;
                let company_ids = owned.into_iter().map(|company| company.id).collect();
                self.opinion_repo.list_by_companies(company_ids, status).await
            }
            UserRole::User => {
                return Err(UseCaseError::Forbidden(
                    "only admins and representatives can moderate opinions".to_string(),
                ));
            }
        }
        .map_err(|err| {
            error!(user_id = actor.user_id, db_error = ?err, "opinions: failed to list moderation queue");
            UseCaseError::Internal(err)
        })?;

        Ok(opinions.into_iter().map(OpinionModel::from).collect())
    }

    /// Approved opinions are public; others only reach their moderators.
    pub async fn get(&self, actor: Option<Actor>, opinion_id: i32) -> UseCaseResult<OpinionModel> {
        let opinion = self.load(opinion_id).await?;

        if let Some(actor) = actor {
            if actor.is_admin() || actor.is_representative() {
                let company = self.load_company(opinion.company_id).await?;
                if actor.can_manage_company(company.user_id) {
                    return Ok(opinion);
                }
            }
        }

        if opinion.status == OpinionStatus::Approved {
            Ok(opinion.redacted())
        } else {
            Err(UseCaseError::NotFound("opinion"))
        }
    }

    pub async fn decide(
        &self,
        actor: Actor,
        opinion_id: i32,
        decision: OpinionDecision,
    ) -> UseCaseResult<OpinionModel> {
        let opinion = self.load(opinion_id).await?;
        self.ensure_moderator(&actor, opinion.company_id).await?;

        if opinion.status.is_decided() {
            warn!(
                %opinion_id,
                previous_status = %opinion.status,
                new_status = %decision.status(),
                previous_approver = ?opinion.approved_by,
                user_id = actor.user_id,
                "opinions: overwriting an earlier moderation decision"
            );
        }

        let updated = self
            .opinion_repo
            .decide(opinion_id, decision.to_entity(actor.user_id, Utc::now()))
            .await
            .map_err(|err| {
                error!(%opinion_id, db_error = ?err, "opinions: failed to store decision");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("opinion"))?;

        info!(
            %opinion_id,
            status = %decision.status(),
            user_id = actor.user_id,
            "opinions: opinion moderated"
        );
        Ok(updated.into())
    }

    pub async fn delete(&self, actor: Actor, opinion_id: i32) -> UseCaseResult<()> {
        let opinion = self.load(opinion_id).await?;
        self.ensure_moderator(&actor, opinion.company_id).await?;

        let deleted = self.opinion_repo.delete(opinion_id).await.map_err(|err| {
            error!(%opinion_id, db_error = ?err, "opinions: failed to delete opinion");
            UseCaseError::Internal(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("opinion"));
        }

        info!(%opinion_id, user_id = actor.user_id, "opinions: opinion deleted");
        Ok(())
    }

    async fn load(&self, opinion_id: i32) -> UseCaseResult<OpinionModel> {
        self.opinion_repo
            .find_by_id(opinion_id)
            .await
            .map_err(|err| {
                error!(%opinion_id, db_error = ?err, "opinions: failed to load opinion");
                UseCaseError::Internal(err)
            })?
            .map(OpinionModel::from)
            .ok_or(UseCaseError::NotFound("opinion"))
    }

    async fn load_company(&self, company_id: i32) -> UseCaseResult<CompanyEntity> {
        self.company_repo
            .find_by_id(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "opinions: failed to load company");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("company"))
    }

    async fn ensure_moderator(&self, actor: &Actor, company_id: i32) -> UseCaseResult<()> {
        if actor.is_admin() {
            return Ok(());
        }

        if actor.is_representative() {
            let company = self.load_company(company_id).await?;
            if actor.can_manage_company(company.user_id) {
                return Ok(());
            }
        }

        warn!(
            %company_id,
            user_id = actor.user_id,
            "opinions: moderation denied"
        );
        Err(UseCaseError::Forbidden(
            "only admins or the company's representative can moderate its opinions".to_string(),
        ))
    }
}
