use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{
            companies::CompanyRepository, membership_payments::MembershipPaymentRepository,
            membership_types::MembershipTypeRepository,
            system_settings::SystemSettingsRepository, users::UserRepository,
        },
        value_objects::membership_payments::{ConfirmPaymentModel, CreatePaymentIntentModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            companies::CompanyPostgres, membership_payments::MembershipPaymentPostgres,
            membership_types::MembershipTypePostgres, system_settings::SystemSettingsPostgres,
            users::UserPostgres,
        },
    },
    payments::stripe_client::StripeClient,
};
use tracing::warn;

use crate::{
    auth::AuthUser,
    axum_http::error_responses::JsonBody,
    config::config_model::DotEnvyConfig,
    usecases::{
        errors::UseCaseError,
        payments::{PaymentUseCase, StripeGateway},
    },
};

type Usecase<P, C, M, U, S, G> = Arc<PaymentUseCase<P, C, M, U, S, G>>;

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let payment_repository = MembershipPaymentPostgres::new(Arc::clone(&db_pool));
    let company_repository = CompanyPostgres::new(Arc::clone(&db_pool));
    let membership_type_repository = MembershipTypePostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let settings_repository = SystemSettingsPostgres::new(Arc::clone(&db_pool));
    let stripe_client = StripeClient::new(
        config.stripe.secret_key.clone(),
        config.stripe.webhook_secret.clone(),
    );

    let usecase = PaymentUseCase::new(
        Arc::new(payment_repository),
        Arc::new(company_repository),
        Arc::new(membership_type_repository),
        Arc::new(user_repository),
        Arc::new(settings_repository),
        Arc::new(stripe_client),
        config.stripe.default_currency.clone(),
    );

    Router::new()
        .route(
            "/",
            get(list_payments::<
                MembershipPaymentPostgres,
                CompanyPostgres,
                MembershipTypePostgres,
                UserPostgres,
                SystemSettingsPostgres,
                StripeClient,
            >),
        )
        .route(
            "/intents",
            post(
                create_payment_intent::<
                    MembershipPaymentPostgres,
                    CompanyPostgres,
                    MembershipTypePostgres,
                    UserPostgres,
                    SystemSettingsPostgres,
                    StripeClient,
                >,
            ),
        )
        .route(
            "/confirm",
            post(
                confirm_payment::<
                    MembershipPaymentPostgres,
                    CompanyPostgres,
                    MembershipTypePostgres,
                    UserPostgres,
                    SystemSettingsPostgres,
                    StripeClient,
                >,
            ),
        )
        .route(
            "/webhook",
            post(
                stripe_webhook::<
                    MembershipPaymentPostgres,
                    CompanyPostgres,
                    MembershipTypePostgres,
                    UserPostgres,
                    SystemSettingsPostgres,
                    StripeClient,
                >,
            ),
        )
        .route(
            "/:id",
            get(get_payment::<
                MembershipPaymentPostgres,
                CompanyPostgres,
                MembershipTypePostgres,
                UserPostgres,
                SystemSettingsPostgres,
                StripeClient,
            >),
        )
        .with_state(Arc::new(usecase))
}

pub async fn create_payment_intent<P, C, M, U, S, G>(
    State(usecase): State<Usecase<P, C, M, U, S, G>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<CreatePaymentIntentModel>,
) -> impl IntoResponse
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    G: StripeGateway + Send + Sync + 'static,
{
    match usecase.create_intent(auth.actor(), model).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn confirm_payment<P, C, M, U, S, G>(
    State(usecase): State<Usecase<P, C, M, U, S, G>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<ConfirmPaymentModel>,
) -> impl IntoResponse
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    G: StripeGateway + Send + Sync + 'static,
{
    match usecase.confirm(auth.actor(), model.payment_intent_id).await {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Raw body: the signature covers the exact bytes Stripe sent.
pub async fn stripe_webhook<P, C, M, U, S, G>(
    State(usecase): State<Usecase<P, C, M, U, S, G>>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    G: StripeGateway + Send + Sync + 'static,
{
    let Some(signature) = headers
        .get("Stripe-Signature")
        .and_then(|value| value.to_str().ok())
    else {
        warn!("payments: webhook without Stripe-Signature header");
        return UseCaseError::BadRequest("missing Stripe-Signature header".to_string())
            .into_response();
    };

    match usecase.handle_webhook(&body, signature).await {
        Ok(()) => Json(serde_json::json!({ "received": true })).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_payments<P, C, M, U, S, G>(
    State(usecase): State<Usecase<P, C, M, U, S, G>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    G: StripeGateway + Send + Sync + 'static,
{
    match usecase.list(auth.actor()).await {
        Ok(payments) => Json(payments).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_payment<P, C, M, U, S, G>(
    State(usecase): State<Usecase<P, C, M, U, S, G>>,
    auth: AuthUser,
    Path(payment_id): Path<i32>,
) -> impl IntoResponse
where
    P: MembershipPaymentRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
    G: StripeGateway + Send + Sync + 'static,
{
    match usecase.get(auth.actor(), payment_id).await {
        Ok(payment) => Json(payment).into_response(),
        Err(err) => err.into_response(),
    }
}
