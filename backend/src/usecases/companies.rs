use std::sync::Arc;

use crates::domain::{
    repositories::{
        companies::CompanyRepository, membership_types::MembershipTypeRepository,
        users::UserRepository,
    },
    value_objects::{
        companies::{CompanyFilter, CompanyModel, UpsertCompanyModel},
        enums::{company_statuses::CompanyStatus, user_roles::UserRole},
        iam::Actor,
    },
};
use tracing::{error, info, warn};
use validator::Validate;

use crate::usecases::errors::{UseCaseError, UseCaseResult};

pub struct CompanyUseCase<C, U, M>
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    company_repo: Arc<C>,
    user_repo: Arc<U>,
    membership_type_repo: Arc<M>,
}

impl<C, U, M> CompanyUseCase<C, U, M>
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    pub fn new(company_repo: Arc<C>, user_repo: Arc<U>, membership_type_repo: Arc<M>) -> Self {
        Self {
            company_repo,
            user_repo,
            membership_type_repo,
        }
    }

    /// Anonymous visitors and `user` accounts browse active companies only,
    /// representatives see what they own, admins see everything.
    pub async fn list(
        &self,
        actor: Option<Actor>,
        mut filter: CompanyFilter,
    ) -> UseCaseResult<Vec<CompanyModel>> {
        let role = actor.map(|actor| actor.role);
        let companies = match (actor, role) {
            (Some(actor), Some(UserRole::Representative)) => {
                self.company_repo.list_by_owner(actor.user_id).await
            }
            _ => self.company_repo.list().await,
        }
        .map_err(|err| {
            error!(db_error = ?err, "companies: failed to list companies");
            UseCaseError::Internal(err)
        })?;

        if !matches!(role, Some(UserRole::Admin) | Some(UserRole::Representative)) {
            filter.status = Some(CompanyStatus::Active);
        }

        let companies: Vec<CompanyModel> = companies
            .into_iter()
            .map(CompanyModel::from)
            .filter(|company| filter.matches(company))
            .collect();

        info!(
            company_count = companies.len(),
            role = ?role,
            "companies: companies listed"
        );
        Ok(companies)
    }

    pub async fn get(&self, actor: Option<Actor>, company_id: i32) -> UseCaseResult<CompanyModel> {
        let company = self.load(company_id).await?;

        match actor.map(|actor| actor.role) {
            Some(UserRole::Admin) => Ok(company),
            Some(UserRole::Representative) => {
                let actor = actor.ok_or(UseCaseError::NotFound("company"))?;
                if actor.can_manage_company(company.user_id) {
                    Ok(company)
                } else {
                    warn!(
                        %company_id,
                        user_id = actor.user_id,
                        "companies: representative requested a company they do not own"
                    );
                    Err(UseCaseError::Forbidden(
                        "you can only access your own companies".to_string(),
                    ))
                }
            }
            _ if company.status == CompanyStatus::Active => Ok(company),
            _ => Err(UseCaseError::NotFound("company")),
        }
    }

    pub async fn create(
        &self,
        actor: Actor,
        mut model: UpsertCompanyModel,
    ) -> UseCaseResult<CompanyModel> {
        match actor.role {
            UserRole::Admin => {}
            UserRole::Representative => {
                if model.membership_type_id.is_some() {
                    return Err(UseCaseError::Forbidden(
                        "representatives cannot assign a membership type".to_string(),
                    ));
                }
                model.user_id = Some(actor.user_id);
                model.status = Some(CompanyStatus::Pending);
                clear_billing(&mut model);
            }
            UserRole::User => {
                return Err(UseCaseError::Forbidden(
                    "only admins and representatives can register companies".to_string(),
                ));
            }
        }

        model.validate()?;
        self.ensure_references(&model).await?;

        let entity = model.to_entity()?;
        let company = self.company_repo.create(entity).await.map_err(|err| {
            error!(db_error = ?err, "companies: failed to create company");
            UseCaseError::from_write(err)
        })?;

        info!(
            company_id = company.id,
            user_id = actor.user_id,
            owner_id = ?company.user_id,
            "companies: company created"
        );
        Ok(company.into())
    }

    pub async fn update(
        &self,
        actor: Actor,
        company_id: i32,
        mut model: UpsertCompanyModel,
    ) -> UseCaseResult<CompanyModel> {
        let existing = self.load(company_id).await?;

        if !actor.can_manage_company(existing.user_id) {
            warn!(
                %company_id,
                user_id = actor.user_id,
                owner_id = ?existing.user_id,
                "companies: update denied"
            );
            return Err(UseCaseError::Forbidden(
                "you can only edit your own companies".to_string(),
            ));
        }

        if actor.is_representative() {
            restrict_representative_update(&existing, &mut model)?;
        } else if model.status.is_none() {
            model.status = Some(existing.status);
        }

        model.validate()?;
        self.ensure_references(&model).await?;

        let entity = model.to_entity()?;
        let company = self
            .company_repo
            .update(company_id, entity)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "companies: failed to update company");
                UseCaseError::from_write(err)
            })?
            .ok_or(UseCaseError::NotFound("company"))?;

        info!(%company_id, user_id = actor.user_id, "companies: company updated");
        Ok(company.into())
    }

    pub async fn delete(&self, actor: Actor, company_id: i32) -> UseCaseResult<()> {
        let existing = self.load(company_id).await?;

        if !actor.can_manage_company(existing.user_id) {
            return Err(UseCaseError::Forbidden(
                "you can only delete your own companies".to_string(),
            ));
        }

        let deleted = self.company_repo.delete(company_id).await.map_err(|err| {
            error!(%company_id, db_error = ?err, "companies: failed to delete company");
            UseCaseError::from_write(err)
        })?;

        if !deleted {
            return Err(UseCaseError::NotFound("company"));
        }

        info!(%company_id, user_id = actor.user_id, "companies: company deleted");
        Ok(())
    }

    async fn load(&self, company_id: i32) -> UseCaseResult<CompanyModel> {
        self.company_repo
            .find_by_id(company_id)
            .await
            .map_err(|err| {
                error!(%company_id, db_error = ?err, "companies: failed to load company");
                UseCaseError::Internal(err)
            })?
            .map(CompanyModel::from)
            .ok_or(UseCaseError::NotFound("company"))
    }

    async fn ensure_references(&self, model: &UpsertCompanyModel) -> UseCaseResult<()> {
        if let Some(user_id) = model.user_id {
            let owner = self.user_repo.find_by_id(user_id).await.map_err(|err| {
                error!(%user_id, db_error = ?err, "companies: failed to load owner");
                UseCaseError::Internal(err)
            })?;
            if owner.is_none() {
                return Err(UseCaseError::BadRequest(format!(
                    "userId {user_id} does not reference an existing user"
                )));
            }
        }

        if let Some(membership_type_id) = model.membership_type_id {
            let plan = self
                .membership_type_repo
                .find_by_id(membership_type_id)
                .await
                .map_err(|err| {
                    error!(%membership_type_id, db_error = ?err, "companies: failed to load plan");
                    UseCaseError::Internal(err)
                })?;
            if plan.is_none() {
                return Err(UseCaseError::BadRequest(format!(
                    "membershipTypeId {membership_type_id} does not reference an existing plan"
                )));
            }
        }

        Ok(())
    }
}

fn clear_billing(model: &mut UpsertCompanyModel) {
    model.membership_payment_method = None;
    model.membership_start_date = None;
    model.membership_end_date = None;
    model.membership_notes = None;
}

/// Representatives edit content only. Ownership, status, plan and billing
/// metadata keep their stored values; an attempt to change them is refused.
fn restrict_representative_update(
    existing: &CompanyModel,
    model: &mut UpsertCompanyModel,
) -> UseCaseResult<()> {
    if model.user_id.is_some_and(|user_id| Some(user_id) != existing.user_id) {
        return Err(UseCaseError::Forbidden(
            "representatives cannot change the company owner".to_string(),
        ));
    }
    if model.status.is_some_and(|status| status != existing.status) {
        return Err(UseCaseError::Forbidden(
            "representatives cannot change the company status".to_string(),
        ));
    }
    if model
        .membership_type_id
        .is_some_and(|plan_id| Some(plan_id) != existing.membership_type_id)
    {
        return Err(UseCaseError::Forbidden(
            "representatives cannot change the membership type".to_string(),
        ));
    }

    model.user_id = existing.user_id;
    model.status = Some(existing.status);
    model.membership_type_id = existing.membership_type_id;
    model.membership_payment_method = existing.membership_payment_method.clone();
    model.membership_start_date = existing.membership_start_date;
    model.membership_end_date = existing.membership_end_date;
    model.membership_notes = existing.membership_notes.clone();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use crates::domain::{
        entities::{companies::CompanyEntity, users::UserEntity},
        repositories::{
            companies::MockCompanyRepository, membership_types::MockMembershipTypeRepository,
            users::MockUserRepository,
        },
    };
    use mockall::predicate::eq;

    fn company(id: i32, owner: Option<i32>, status: &str) -> CompanyEntity {
        let now = Utc::now();
        CompanyEntity {
            id,
            name: format!("Empresa {id}"),
            phone1: None,
            phone2: None,
            email1: format!("contacto{id}@empresa.mx"),
            email2: None,
            countries: serde_json::json!(["México"]),
            states: serde_json::json!([]),
            cities: serde_json::json!([]),
            address: None,
            location: None,
            sales_representatives: serde_json::json!([]),
            description: None,
            product_gallery: serde_json::json!([]),
            category_ids: serde_json::json!([3]),
            social_media: serde_json::json!({}),
            catalog_url: None,
            video_urls: serde_json::json!([]),
            membership_type_id: Some(2),
            website: None,
            certificate_ids: serde_json::json!([]),
            membership_payment_method: Some("stripe".to_string()),
            membership_start_date: None,
            membership_end_date: None,
            membership_notes: None,
            user_id: owner,
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    fn user(id: i32) -> UserEntity {
        let now = Utc::now();
        UserEntity {
            id,
            uid: format!("uid-{id}"),
            email: format!("user{id}@empresa.mx"),
            display_name: None,
            role: "representante".to_string(),
            stripe_customer_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn upsert() -> UpsertCompanyModel {
        UpsertCompanyModel {
            name: "Aceros del Norte".to_string(),
            email1: Some("ventas@aceros.mx".to_string()),
            countries: vec!["México".to_string()],
            ..Default::default()
        }
    }

    fn entity_from_insert(
        id: i32,
        insert: crates::domain::entities::companies::InsertCompanyEntity,
    ) -> CompanyEntity {
        let now = Utc::now();
        CompanyEntity {
            id,
            name: insert.name,
            phone1: insert.phone1,
            phone2: insert.phone2,
            email1: insert.email1,
            email2: insert.email2,
            countries: insert.countries,
            states: insert.states,
            cities: insert.cities,
            address: insert.address,
            location: insert.location,
            sales_representatives: insert.sales_representatives,
            description: insert.description,
            product_gallery: insert.product_gallery,
            category_ids: insert.category_ids,
            social_media: insert.social_media,
            catalog_url: insert.catalog_url,
            video_urls: insert.video_urls,
            membership_type_id: insert.membership_type_id,
            website: insert.website,
            certificate_ids: insert.certificate_ids,
            membership_payment_method: insert.membership_payment_method,
            membership_start_date: insert.membership_start_date,
            membership_end_date: insert.membership_end_date,
            membership_notes: insert.membership_notes,
            user_id: insert.user_id,
            status: insert.status,
            created_at: now,
            updated_at: now,
        }
    }

    fn usecase(
        companies: MockCompanyRepository,
        users: MockUserRepository,
        plans: MockMembershipTypeRepository,
    ) -> CompanyUseCase<MockCompanyRepository, MockUserRepository, MockMembershipTypeRepository>
    {
        CompanyUseCase::new(Arc::new(companies), Arc::new(users), Arc::new(plans))
    }

    #[tokio::test]
    async fn representative_cannot_edit_another_company() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .with(eq(10))
            .returning(|id| Ok(Some(company(id, Some(9), "activo"))));
        companies.expect_update().never();

        let err = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .update(Actor::new(5, UserRole::Representative), 10, upsert())
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn representative_cannot_change_status() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5), "pendiente"))));
        companies.expect_update().never();

        let mut model = upsert();
        model.status = Some(CompanyStatus::Active);

        let err = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .update(Actor::new(5, UserRole::Representative), 10, model)
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn representative_update_keeps_owner_status_and_plan() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5), "activo"))));
        companies
            .expect_update()
            .withf(|id, entity| {
                *id == 10
                    && entity.user_id == Some(5)
                    && entity.status == "activo"
                    && entity.membership_type_id == Some(2)
                    && entity.membership_payment_method.as_deref() == Some("stripe")
            })
            .times(1)
            .returning(|id, entity| Ok(Some(entity_from_insert(id, entity))));

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().returning(|id| Ok(Some(user(id))));
        let mut plans = MockMembershipTypeRepository::new();
        plans.expect_find_by_id().returning(|id| {
            let now = Utc::now();
            Ok(Some(
                crates::domain::entities::membership_types::MembershipTypeEntity {
                    id,
                    name: "Plata".to_string(),
                    description: None,
                    pricing: serde_json::json!([]),
                    benefits: serde_json::json!([]),
                    visibility: "publica".to_string(),
                    created_at: now,
                    updated_at: now,
                },
            ))
        });

        let updated = usecase(companies, users, plans)
            .update(Actor::new(5, UserRole::Representative), 10, upsert())
            .await
            .unwrap();

        assert_eq!(updated.name, "Aceros del Norte");
        assert_eq!(updated.user_id, Some(5));
    }

    #[tokio::test]
    async fn representative_create_forces_owner_and_pending_status() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_create()
            .withf(|entity| entity.user_id == Some(5) && entity.status == "pendiente")
            .times(1)
            .returning(|entity| Ok(entity_from_insert(77, entity)));
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .with(eq(5))
            .returning(|id| Ok(Some(user(id))));

        let mut model = upsert();
        model.user_id = Some(1);
        model.status = Some(CompanyStatus::Active);

        let created = usecase(companies, users, MockMembershipTypeRepository::new())
            .create(Actor::new(5, UserRole::Representative), model)
            .await
            .unwrap();

        assert_eq!(created.id, 77);
        assert_eq!(created.status, CompanyStatus::Pending);
    }

    #[tokio::test]
    async fn company_without_email1_fails_validation() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_create().never();

        let mut model = upsert();
        model.email1 = None;

        let err = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .create(Actor::new(1, UserRole::Admin), model)
        .await
        .unwrap_err();

        match err {
            UseCaseError::Validation(fields) => assert!(fields.contains_key("email1")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_user_cannot_create_company() {
        let err = usecase(
            MockCompanyRepository::new(),
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .create(Actor::new(3, UserRole::User), upsert())
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn admin_assigning_unknown_owner_is_bad_request() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().with(eq(404)).returning(|_| Ok(None));

        let mut model = upsert();
        model.user_id = Some(404);

        let err = usecase(
            MockCompanyRepository::new(),
            users,
            MockMembershipTypeRepository::new(),
        )
        .create(Actor::new(1, UserRole::Admin), model)
        .await
        .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn anonymous_listing_only_returns_active_companies() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_list().returning(|| {
            Ok(vec![
                company(1, None, "activo"),
                company(2, None, "pendiente"),
                company(3, None, "inactivo"),
            ])
        });

        let filter = CompanyFilter {
            status: Some(CompanyStatus::Pending),
            ..Default::default()
        };
        let listed = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .list(None, filter)
        .await
        .unwrap();

        assert_eq!(listed.iter().map(|c| c.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn representative_listing_is_scoped_to_owned_companies() {
        let mut companies = MockCompanyRepository::new();
        companies.expect_list().never();
        companies
            .expect_list_by_owner()
            .with(eq(5))
            .times(1)
            .returning(|owner| Ok(vec![company(4, Some(owner), "pendiente")]));

        let listed = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        )
        .list(
            Some(Actor::new(5, UserRole::Representative)),
            CompanyFilter::default(),
        )
        .await
        .unwrap();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].status, CompanyStatus::Pending);
    }

    #[tokio::test]
    async fn inactive_company_is_hidden_from_visitors() {
        let mut companies = MockCompanyRepository::new();
        companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(9), "inactivo"))));

        let usecase = usecase(
            companies,
            MockUserRepository::new(),
            MockMembershipTypeRepository::new(),
        );

        let err = usecase.get(None, 3).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = usecase
            .get(Some(Actor::new(5, UserRole::Representative)), 3)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let found = usecase
            .get(Some(Actor::new(9, UserRole::Representative)), 3)
            .await
            .unwrap();
        assert_eq!(found.id, 3);
    }
}
