use std::{collections::HashMap, sync::Arc};

use anyhow::{Result as AnyResult, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use crates::{
    domain::{
        entities::{
            membership_payments::{InsertMembershipPaymentEntity, MembershipPaymentEntity},
            users::UpdateUserEntity,
        },
        repositories::{
            companies::CompanyRepository, membership_payments::MembershipPaymentRepository,
            membership_types::MembershipTypeRepository,
            system_settings::SystemSettingsRepository, users::UserRepository,
        },
        value_objects::{
            enums::{payment_statuses::PaymentStatus, periodicities::Periodicity},
            iam::Actor,
            membership_payments::{
                CreatePaymentIntentModel, MembershipPaymentModel, PaymentIntentCreatedDto,
                membership_for_purchase,
            },
            membership_types::MembershipTypeModel,
        },
    },
    payments::stripe_client::{StripeClient, StripeEvent, StripePaymentIntent},
};
use tracing::{debug, error, info, warn};

use crate::usecases::errors::{UseCaseError, UseCaseResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StripeGateway: Send + Sync {
    async fn create_customer(&self, email: &str, user_id: i32) -> AnyResult<String>;

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<StripePaymentIntent>;

    async fn retrieve_payment_intent(&self, payment_intent_id: &str)
    -> AnyResult<StripePaymentIntent>;

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent>;
}

#[async_trait]
impl StripeGateway for StripeClient {
    async fn create_customer(&self, email: &str, user_id: i32) -> AnyResult<String> {
        self.create_customer(email, user_id).await
    }

    async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        customer_id: &str,
        metadata: HashMap<String, String>,
    ) -> AnyResult<StripePaymentIntent> {
        self.create_payment_intent(amount_minor, currency, customer_id, metadata)
            .await
    }

    async fn retrieve_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> AnyResult<StripePaymentIntent> {
        self.retrieve_payment_intent(payment_intent_id).await
    }

    fn verify_webhook_signature(&self, payload: &[u8], signature: &str) -> AnyResult<StripeEvent> {
        self.verify_webhook_signature(payload, signature)
    }
}

pub struct PaymentUseCase<P, C, M, U, S, Stripe>
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    Stripe: StripeGateway + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    company_repo: Arc<C>,
    membership_type_repo: Arc<M>,
    user_repo: Arc<U>,
    settings_repo: Arc<S>,
    stripe_client: Arc<Stripe>,
    default_currency: String,
}

impl<P, C, M, U, S, Stripe> PaymentUseCase<P, C, M, U, S, Stripe>
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    Stripe: StripeGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<P>,
        company_repo: Arc<C>,
        membership_type_repo: Arc<M>,
        user_repo: Arc<U>,
        settings_repo: Arc<S>,
        stripe_client: Arc<Stripe>,
        default_currency: String,
    ) -> Self {
        Self {
            payment_repo,
            company_repo,
            membership_type_repo,
            user_repo,
            settings_repo,
            stripe_client,
            default_currency,
        }
    }

    pub async fn create_intent(
        &self,
        actor: Actor,
        model: CreatePaymentIntentModel,
    ) -> UseCaseResult<PaymentIntentCreatedDto> {
        let company = self
            .company_repo
            .find_by_id(model.company_id)
            .await
            .map_err(|err| {
                error!(company_id = model.company_id, db_error = ?err, "payments: failed to load company");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("company"))?;

        if !actor.can_manage_company(company.user_id) {
            warn!(
                user_id = actor.user_id,
                company_id = company.id,
                "payments: actor cannot purchase for this company"
            );
            return Err(UseCaseError::Forbidden(
                "you can only purchase memberships for your own companies".to_string(),
            ));
        }

        let membership_type: MembershipTypeModel = self
            .membership_type_repo
            .find_by_id(model.membership_type_id)
            .await
            .map_err(|err| {
                error!(
                    membership_type_id = model.membership_type_id,
                    db_error = ?err,
                    "payments: failed to load membership type"
                );
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("membership type"))?
            .into();

        if !membership_type.is_public() && !actor.is_admin() {
            return Err(UseCaseError::Forbidden(
                "this membership type can only be assigned by an admin".to_string(),
            ));
        }

        let pricing = membership_type
            .pricing_for(model.periodicity)
            .ok_or_else(|| {
                UseCaseError::BadRequest(format!(
                    "membership type {} has no {} price",
                    membership_type.id, model.periodicity
                ))
            })?;
        let currency = self.currency().await?;
        let amount_minor = pricing.amount_minor(&currency).ok_or_else(|| {
            UseCaseError::BadRequest(format!(
                "membership type {} has an out-of-range price",
                membership_type.id
            ))
        })?;
        if amount_minor <= 0 {
            return Err(UseCaseError::BadRequest(
                "free memberships do not require a payment".to_string(),
            ));
        }

        let customer_id = self.ensure_customer(actor.user_id).await?;

        let metadata = HashMap::from([
            ("user_id".to_string(), actor.user_id.to_string()),
            ("company_id".to_string(), company.id.to_string()),
            (
                "membership_type_id".to_string(),
                membership_type.id.to_string(),
            ),
            (
                "periodicity".to_string(),
                model.periodicity.as_str().to_string(),
            ),
        ]);

        let intent = self
            .stripe_client
            .create_payment_intent(amount_minor, &currency, &customer_id, metadata)
            .await
            .map_err(|err| {
                error!(error = %err, company_id = company.id, "payments: failed to create payment intent");
                UseCaseError::ExternalService(err.to_string())
            })?;

        let client_secret = intent.client_secret.clone().ok_or_else(|| {
            error!(payment_intent_id = %intent.id, "payments: intent returned without client secret");
            UseCaseError::ExternalService("payment intent has no client secret".to_string())
        })?;

        let payment = self
            .payment_repo
            .create(InsertMembershipPaymentEntity {
                user_id: actor.user_id,
                company_id: company.id,
                membership_type_id: membership_type.id,
                stripe_payment_intent_id: intent.id.clone(),
                amount_minor,
                currency: currency.clone(),
                periodicity: model.periodicity.to_string(),
                status: PaymentStatus::Pending.to_string(),
            })
            .await
            .map_err(|err| {
                error!(payment_intent_id = %intent.id, db_error = ?err, "payments: failed to record payment");
                UseCaseError::from_write(err)
            })?;

        info!(
            payment_id = payment.id,
            payment_intent_id = %intent.id,
            company_id = company.id,
            membership_type_id = membership_type.id,
            amount_minor,
            currency = %currency,
            "payments: payment intent created"
        );

        Ok(PaymentIntentCreatedDto {
            payment_id: payment.id,
            payment_intent_id: intent.id,
            client_secret,
            amount: amount_minor,
            currency,
            status: PaymentStatus::Pending,
        })
    }

    /// Client-side confirmation: re-reads the intent from Stripe and applies
    /// its authoritative status.
    pub async fn confirm(
        &self,
        actor: Actor,
        payment_intent_id: String,
    ) -> UseCaseResult<MembershipPaymentModel> {
        let payment = self
            .find_by_intent(&payment_intent_id)
            .await?
            .ok_or(UseCaseError::NotFound("payment"))?;

        if !actor.is_admin() && payment.user_id != actor.user_id {
            return Err(UseCaseError::Forbidden(
                "you can only confirm your own payments".to_string(),
            ));
        }

        let intent = self
            .stripe_client
            .retrieve_payment_intent(&payment_intent_id)
            .await
            .map_err(|err| {
                error!(error = %err, %payment_intent_id, "payments: failed to retrieve payment intent");
                UseCaseError::ExternalService(err.to_string())
            })?;

        let settled = self.apply_status(payment, intent.payment_status()).await?;
        Ok(settled.into())
    }

    pub async fn handle_webhook(&self, payload: &[u8], signature: &str) -> UseCaseResult<()> {
        let event = self
            .stripe_client
            .verify_webhook_signature(payload, signature)
            .map_err(|err| {
                warn!(error = %err, "payments: stripe webhook verification failed");
                UseCaseError::BadRequest("signature verification failed".to_string())
            })?;

        info!(event_type = %event.type_, event_id = ?event.id, "payments: stripe webhook verified");

        let status = match event.type_.as_str() {
            "payment_intent.succeeded" => PaymentStatus::Succeeded,
            "payment_intent.payment_failed" => PaymentStatus::Failed,
            "payment_intent.canceled" => PaymentStatus::Canceled,
            _ => {
                debug!("unhandled stripe event type: {:?}", event.type_);
                return Ok(());
            }
        };

        let intent = event.payment_intent().ok_or_else(|| {
            warn!(event_type = %event.type_, "payments: webhook carries no payment intent");
            UseCaseError::BadRequest("invalid payment intent payload".to_string())
        })?;

        let Some(payment) = self.find_by_intent(&intent.id).await? else {
            warn!(
                payment_intent_id = %intent.id,
                "payments: webhook for unknown payment intent; acknowledging"
            );
            return Ok(());
        };

        self.apply_status(payment, status).await?;
        Ok(())
    }

    pub async fn list(&self, actor: Actor) -> UseCaseResult<Vec<MembershipPaymentModel>> {
        let payments = if actor.is_admin() {
            self.payment_repo.list().await
        } else {
            self.payment_repo.list_by_user(actor.user_id).await
        }
        .map_err(|err| {
            error!(user_id = actor.user_id, db_error = ?err, "payments: failed to list payments");
            UseCaseError::Internal(err)
        })?;

        Ok(payments
            .into_iter()
            .map(MembershipPaymentModel::from)
            .collect())
    }

    pub async fn get(&self, actor: Actor, payment_id: i32) -> UseCaseResult<MembershipPaymentModel> {
        let payment = self
            .payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("payment"))?;

        if !actor.is_admin() && payment.user_id != actor.user_id {
            return Err(UseCaseError::Forbidden(
                "you can only view your own payments".to_string(),
            ));
        }

        Ok(payment.into())
    }

    /// Rows already succeeded or canceled are returned untouched, so a webhook
    /// and a client confirmation for the same intent settle only once. A
    /// `failed` row stays open because Stripe allows retrying the intent.
    async fn apply_status(
        &self,
        payment: MembershipPaymentEntity,
        status: PaymentStatus,
    ) -> UseCaseResult<MembershipPaymentEntity> {
        let current = PaymentStatus::from_str(&payment.status).unwrap_or_default();
        if current.is_final() {
            debug!(
                payment_id = payment.id,
                status = %current,
                "payments: payment already settled; skipping"
            );
            return Ok(payment);
        }

        match status {
            PaymentStatus::Pending => Ok(payment),
            PaymentStatus::Succeeded => {
                let periodicity = Periodicity::from_str(&payment.periodicity).ok_or_else(|| {
                    UseCaseError::Internal(anyhow!(
                        "payment {} has unknown periodicity {}",
                        payment.id,
                        payment.periodicity
                    ))
                })?;
                let now = Utc::now();
                let membership = membership_for_purchase(
                    payment.membership_type_id,
                    periodicity,
                    now.date_naive(),
                    &payment.stripe_payment_intent_id,
                    now,
                )
                .ok_or_else(|| UseCaseError::Internal(anyhow!("membership end date overflow")))?;

                let Some(settled) = self
                    .payment_repo
                    .settle_succeeded(payment.id, payment.company_id, membership)
                    .await
                    .map_err(|err| {
                        error!(payment_id = payment.id, db_error = ?err, "payments: failed to settle payment");
                        UseCaseError::Internal(err)
                    })?
                else {
                    debug!(payment_id = payment.id, "payments: payment settled concurrently; skipping");
                    return self.reload(payment.id).await;
                };

                info!(
                    payment_id = settled.id,
                    company_id = settled.company_id,
                    membership_type_id = settled.membership_type_id,
                    "payments: membership activated"
                );
                Ok(settled)
            }
            PaymentStatus::Failed | PaymentStatus::Canceled => {
                let Some(updated) = self
                    .payment_repo
                    .update_status(payment.id, status.to_string())
                    .await
                    .map_err(|err| {
                        error!(payment_id = payment.id, db_error = ?err, "payments: failed to update payment status");
                        UseCaseError::Internal(err)
                    })?
                else {
                    debug!(payment_id = payment.id, "payments: payment settled concurrently; skipping");
                    return self.reload(payment.id).await;
                };

                info!(payment_id = updated.id, status = %status, "payments: payment closed without charge");
                Ok(updated)
            }
        }
    }

    async fn reload(&self, payment_id: i32) -> UseCaseResult<MembershipPaymentEntity> {
        self.payment_repo
            .find_by_id(payment_id)
            .await
            .map_err(|err| {
                error!(%payment_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("payment"))
    }

    async fn find_by_intent(
        &self,
        payment_intent_id: &str,
    ) -> UseCaseResult<Option<MembershipPaymentEntity>> {
        self.payment_repo
            .find_by_intent_id(payment_intent_id.to_string())
            .await
            .map_err(|err| {
                error!(%payment_intent_id, db_error = ?err, "payments: failed to load payment");
                UseCaseError::Internal(err)
            })
    }

    async fn currency(&self) -> UseCaseResult<String> {
        let settings = self.settings_repo.get().await.map_err(|err| {
            error!(db_error = ?err, "payments: failed to load system settings");
            UseCaseError::Internal(err)
        })?;

        Ok(settings
            .map(|settings| settings.currency)
            .filter(|currency| !currency.trim().is_empty())
            .unwrap_or_else(|| self.default_currency.clone())
            .trim()
            .to_lowercase())
    }

    /// Returns the user's Stripe customer, creating and storing one on the
    /// first purchase.
    async fn ensure_customer(&self, user_id: i32) -> UseCaseResult<String> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to load user");
                UseCaseError::Internal(err)
            })?
            .ok_or(UseCaseError::NotFound("user"))?;

        if let Some(customer_id) = user.stripe_customer_id {
            return Ok(customer_id);
        }

        let customer_id = self
            .stripe_client
            .create_customer(&user.email, user.id)
            .await
            .map_err(|err| {
                error!(error = %err, %user_id, "payments: failed to create stripe customer");
                UseCaseError::ExternalService(err.to_string())
            })?;

        self.user_repo
            .update(
                user.id,
                UpdateUserEntity {
                    stripe_customer_id: Some(customer_id.clone()),
                    updated_at: Some(Utc::now()),
                    ..Default::default()
                },
            )
            .await
            .map_err(|err| {
                error!(%user_id, db_error = ?err, "payments: failed to store stripe customer");
                UseCaseError::Internal(err)
            })?;

        info!(%user_id, customer_id = %customer_id, "payments: stripe customer created");
        Ok(customer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::DateTime;
    use crates::{
        domain::{
            entities::{
                companies::CompanyEntity, membership_types::MembershipTypeEntity,
                users::UserEntity,
            },
            repositories::{
                UniqueViolation, companies::MockCompanyRepository,
                membership_payments::MockMembershipPaymentRepository,
                membership_types::MockMembershipTypeRepository,
                system_settings::MockSystemSettingsRepository, users::MockUserRepository,
            },
            value_objects::enums::user_roles::UserRole,
        },
        payments::stripe_client::StripeEventData,
    };
    use mockall::{Sequence, predicate::eq};

    type TestUseCase = PaymentUseCase<
        MockMembershipPaymentRepository,
        MockCompanyRepository,
        MockMembershipTypeRepository,
        MockUserRepository,
        MockSystemSettingsRepository,
        MockStripeGateway,
    >;

    struct Mocks {
        payments: MockMembershipPaymentRepository,
        companies: MockCompanyRepository,
        membership_types: MockMembershipTypeRepository,
        users: MockUserRepository,
        settings: MockSystemSettingsRepository,
        stripe: MockStripeGateway,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                payments: MockMembershipPaymentRepository::new(),
                companies: MockCompanyRepository::new(),
                membership_types: MockMembershipTypeRepository::new(),
                users: MockUserRepository::new(),
                settings: MockSystemSettingsRepository::new(),
                stripe: MockStripeGateway::new(),
            }
        }

        fn build(self) -> TestUseCase {
            PaymentUseCase::new(
                Arc::new(self.payments),
                Arc::new(self.companies),
                Arc::new(self.membership_types),
                Arc::new(self.users),
                Arc::new(self.settings),
                Arc::new(self.stripe),
                "usd".to_string(),
            )
        }
    }

    fn epoch() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap()
    }

    fn company(id: i32, owner: Option<i32>) -> CompanyEntity {
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
            category_ids: serde_json::json!([]),
            social_media: serde_json::json!({}),
            catalog_url: None,
            video_urls: serde_json::json!([]),
            membership_type_id: None,
            website: None,
            certificate_ids: serde_json::json!([]),
            membership_payment_method: None,
            membership_start_date: None,
            membership_end_date: None,
            membership_notes: None,
            user_id: owner,
            status: "activo".to_string(),
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn plan(id: i32, visibility: &str, annual_cost: f64) -> MembershipTypeEntity {
        MembershipTypeEntity {
            id,
            name: "Oro".to_string(),
            description: None,
            pricing: serde_json::json!([{"periodicity": "anual", "cost": annual_cost}]),
            benefits: serde_json::json!([]),
            visibility: visibility.to_string(),
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn user(id: i32, customer: Option<&str>) -> UserEntity {
        UserEntity {
            id,
            uid: format!("uid-{id}"),
            email: format!("user{id}@empresa.mx"),
            display_name: None,
            role: "representante".to_string(),
            stripe_customer_id: customer.map(str::to_string),
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn intent(id: &str, status: &str) -> StripePaymentIntent {
        StripePaymentIntent {
            id: id.to_string(),
            status: status.to_string(),
            amount: 120_000,
            currency: "mxn".to_string(),
            client_secret: Some(format!("{id}_secret_abc")),
            customer: Some("cus_1".to_string()),
            metadata: HashMap::new(),
            last_payment_error: None,
        }
    }

    fn payment_row(id: i32, status: &str) -> MembershipPaymentEntity {
        MembershipPaymentEntity {
            id,
            user_id: 5,
            company_id: 42,
            membership_type_id: 7,
            stripe_payment_intent_id: "pi_42".to_string(),
            amount_minor: 120_000,
            currency: "mxn".to_string(),
            periodicity: "anual".to_string(),
            status: status.to_string(),
            created_at: epoch(),
            updated_at: epoch(),
        }
    }

    fn intent_request() -> CreatePaymentIntentModel {
        CreatePaymentIntentModel {
            company_id: 42,
            membership_type_id: 7,
            periodicity: Periodicity::Annual,
        }
    }

    fn representative() -> Actor {
        Actor::new(5, UserRole::Representative)
    }

    fn purchasable(mocks: &mut Mocks) {
        mocks
            .companies
            .expect_find_by_id()
            .with(eq(42))
            .returning(|id| Ok(Some(company(id, Some(5)))));
        mocks
            .membership_types
            .expect_find_by_id()
            .with(eq(7))
            .returning(|id| Ok(Some(plan(id, "publica", 1200.0))));
        mocks.settings.expect_get().returning(|| Ok(None));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, Some("cus_1")))));
        mocks
            .stripe
            .expect_create_payment_intent()
            .withf(|amount, currency, customer, metadata| {
                *amount == 120_000
                    && currency == "usd"
                    && customer == "cus_1"
                    && metadata.get("company_id").map(String::as_str) == Some("42")
            })
            .returning(|_, _, _, _| Ok(intent("pi_42", "requires_payment_method")));
    }

    #[tokio::test]
    async fn intent_then_successful_confirmation_activates_membership() {
        let mut mocks = Mocks::new();
        purchasable(&mut mocks);
        let mut seq = Sequence::new();

        mocks
            .payments
            .expect_create()
            .withf(|row| {
                row.company_id == 42
                    && row.membership_type_id == 7
                    && row.status == "pending"
                    && row.stripe_payment_intent_id == "pi_42"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(payment_row(11, "pending")));
        mocks
            .payments
            .expect_find_by_intent_id()
            .with(eq("pi_42".to_string()))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(Some(payment_row(11, "pending"))));
        mocks
            .stripe
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, "succeeded")));
        mocks
            .payments
            .expect_settle_succeeded()
            .withf(|payment_id, company_id, membership| {
                *payment_id == 11
                    && *company_id == 42
                    && membership.membership_type_id == 7
                    && membership.membership_payment_method == "stripe"
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(Some(payment_row(11, "succeeded"))));

        let usecase = mocks.build();
        let created = usecase
            .create_intent(representative(), intent_request())
            .await
            .unwrap();
        assert_eq!(created.payment_id, 11);
        assert_eq!(created.amount, 120_000);
        assert_eq!(created.status, PaymentStatus::Pending);
        assert_eq!(created.client_secret, "pi_42_secret_abc");

        let confirmed = usecase
            .confirm(representative(), "pi_42".to_string())
            .await
            .unwrap();
        assert_eq!(confirmed.status, PaymentStatus::Succeeded);
    }

    #[tokio::test]
    async fn duplicate_intent_is_conflict() {
        let mut mocks = Mocks::new();
        purchasable(&mut mocks);
        mocks.payments.expect_create().returning(|_| {
            Err(UniqueViolation::new("membership_payments_stripe_payment_intent_id_key").into())
        });

        let err = mocks
            .build()
            .create_intent(representative(), intent_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn free_plan_is_rejected() {
        let mut mocks = Mocks::new();
        mocks
            .companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5)))));
        mocks
            .membership_types
            .expect_find_by_id()
            .returning(|id| Ok(Some(plan(id, "publica", 0.0))));
        mocks.settings.expect_get().returning(|| Ok(None));
        mocks.stripe.expect_create_payment_intent().never();

        let err = mocks
            .build()
            .create_intent(representative(), intent_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn private_plan_requires_admin() {
        let mut mocks = Mocks::new();
        mocks
            .companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5)))));
        mocks
            .membership_types
            .expect_find_by_id()
            .returning(|id| Ok(Some(plan(id, "privada", 500.0))));

        let err = mocks
            .build()
            .create_intent(representative(), intent_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn first_purchase_creates_and_stores_customer() {
        let mut mocks = Mocks::new();
        mocks
            .companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5)))));
        mocks
            .membership_types
            .expect_find_by_id()
            .returning(|id| Ok(Some(plan(id, "publica", 1200.0))));
        mocks.settings.expect_get().returning(|| Ok(None));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, None))));
        mocks
            .stripe
            .expect_create_customer()
            .withf(|email, user_id| email == "user5@empresa.mx" && *user_id == 5)
            .times(1)
            .returning(|_, _| Ok("cus_new".to_string()));
        mocks
            .users
            .expect_update()
            .withf(|id, changes| {
                *id == 5 && changes.stripe_customer_id.as_deref() == Some("cus_new")
            })
            .times(1)
            .returning(|id, _| Ok(Some(user(id, Some("cus_new")))));
        mocks
            .stripe
            .expect_create_payment_intent()
            .withf(|_, _, customer, _| customer == "cus_new")
            .returning(|_, _, _, _| Ok(intent("pi_9", "requires_payment_method")));
        mocks
            .payments
            .expect_create()
            .returning(|_| Ok(payment_row(12, "pending")));

        let created = mocks
            .build()
            .create_intent(representative(), intent_request())
            .await
            .unwrap();

        assert_eq!(created.payment_intent_id, "pi_9");
    }

    #[tokio::test]
    async fn stripe_failure_is_bad_gateway_with_processor_message() {
        let mut mocks = Mocks::new();
        mocks
            .companies
            .expect_find_by_id()
            .returning(|id| Ok(Some(company(id, Some(5)))));
        mocks
            .membership_types
            .expect_find_by_id()
            .returning(|id| Ok(Some(plan(id, "publica", 1200.0))));
        mocks.settings.expect_get().returning(|| Ok(None));
        mocks
            .users
            .expect_find_by_id()
            .returning(|id| Ok(Some(user(id, Some("cus_1")))));
        mocks
            .stripe
            .expect_create_payment_intent()
            .returning(|_, _, _, _| Err(anyhow!("Your card was declined.")));
        mocks.payments.expect_create().never();

        let err = mocks
            .build()
            .create_intent(representative(), intent_request())
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.to_string(), "Your card was declined.");
    }

    #[tokio::test]
    async fn settled_payment_is_not_applied_twice() {
        let mut mocks = Mocks::new();
        mocks
            .stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| {
                Ok(StripeEvent {
                    id: Some("evt_1".to_string()),
                    type_: "payment_intent.succeeded".to_string(),
                    created: None,
                    livemode: Some(false),
                    data: StripeEventData {
                        object: serde_json::json!({
                            "id": "pi_42",
                            "status": "succeeded",
                            "amount": 120000,
                            "currency": "mxn"
                        }),
                    },
                })
            });
        mocks
            .payments
            .expect_find_by_intent_id()
            .returning(|_| Ok(Some(payment_row(11, "succeeded"))));
        mocks.payments.expect_settle_succeeded().never();
        mocks.payments.expect_update_status().never();

        mocks
            .build()
            .handle_webhook(b"{}", "t=1,v1=abc")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_webhook_marks_payment_failed_and_leaves_company() {
        let mut mocks = Mocks::new();
        mocks
            .stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| {
                Ok(StripeEvent {
                    id: Some("evt_2".to_string()),
                    type_: "payment_intent.payment_failed".to_string(),
                    created: None,
                    livemode: Some(false),
                    data: StripeEventData {
                        object: serde_json::json!({
                            "id": "pi_42",
                            "status": "requires_payment_method",
                            "amount": 120000,
                            "currency": "mxn"
                        }),
                    },
                })
            });
        mocks
            .payments
            .expect_find_by_intent_id()
            .returning(|_| Ok(Some(payment_row(11, "pending"))));
        mocks
            .payments
            .expect_update_status()
            .with(eq(11), eq("failed".to_string()))
            .times(1)
            .returning(|id, _| Ok(Some(payment_row(id, "failed"))));
        mocks.payments.expect_settle_succeeded().never();

        mocks
            .build()
            .handle_webhook(b"{}", "t=1,v1=abc")
            .await
            .unwrap();
    }

    fn succeeded_webhook(mocks: &mut Mocks) {
        mocks
            .stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| {
                Ok(StripeEvent {
                    id: Some("evt_3".to_string()),
                    type_: "payment_intent.succeeded".to_string(),
                    created: None,
                    livemode: Some(false),
                    data: StripeEventData {
                        object: serde_json::json!({
                            "id": "pi_42",
                            "status": "succeeded",
                            "amount": 120000,
                            "currency": "mxn"
                        }),
                    },
                })
            });
    }

    #[tokio::test]
    async fn retried_intent_after_decline_activates_membership() {
        let mut mocks = Mocks::new();
        succeeded_webhook(&mut mocks);
        mocks
            .payments
            .expect_find_by_intent_id()
            .with(eq("pi_42".to_string()))
            .returning(|_| Ok(Some(payment_row(11, "failed"))));
        mocks
            .payments
            .expect_settle_succeeded()
            .withf(|payment_id, company_id, membership| {
                *payment_id == 11 && *company_id == 42 && membership.membership_type_id == 7
            })
            .times(1)
            .returning(|_, _, _| Ok(Some(payment_row(11, "succeeded"))));

        mocks
            .build()
            .handle_webhook(b"{}", "t=1,v1=abc")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn concurrent_settlement_returns_stored_row() {
        let mut mocks = Mocks::new();
        mocks
            .payments
            .expect_find_by_intent_id()
            .returning(|_| Ok(Some(payment_row(11, "pending"))));
        mocks
            .stripe
            .expect_retrieve_payment_intent()
            .returning(|id| Ok(intent(id, "succeeded")));
        mocks
            .payments
            .expect_settle_succeeded()
            .times(1)
            .returning(|_, _, _| Ok(None));
        mocks
            .payments
            .expect_find_by_id()
            .with(eq(11))
            .times(1)
            .returning(|id| Ok(Some(payment_row(id, "succeeded"))));

        let confirmed = mocks
            .build()
            .confirm(representative(), "pi_42".to_string())
            .await
            .unwrap();

        assert_eq!(confirmed.status, PaymentStatus::Succeeded);
    }

    #[tokio::test]
    async fn invalid_signature_is_bad_request() {
        let mut mocks = Mocks::new();
        mocks
            .stripe
            .expect_verify_webhook_signature()
            .returning(|_, _| Err(anyhow!("signature mismatch")));

        let err = mocks
            .build()
            .handle_webhook(b"{}", "t=1,v1=bad")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn other_users_cannot_read_a_payment() {
        let mut mocks = Mocks::new();
        mocks
            .payments
            .expect_find_by_id()
            .returning(|id| Ok(Some(payment_row(id, "pending"))));

        let err = mocks
            .build()
            .get(Actor::new(6, UserRole::User), 11)
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
