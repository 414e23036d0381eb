use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::certificates::CertificateRepository,
        value_objects::certificates::UpsertCertificateModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::certificates::CertificatePostgres,
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::JsonBody,
    usecases::certificates::CertificateUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let certificate_repository = CertificatePostgres::new(Arc::clone(&db_pool));
    let usecase = CertificateUseCase::new(Arc::new(certificate_repository));

    Router::new()
        .route(
            "/",
            get(list_certificates::<CertificatePostgres>).post(create_certificate::<CertificatePostgres>),
        )
        .route(
            "/:id",
            get(get_certificate::<CertificatePostgres>)
                .put(update_certificate::<CertificatePostgres>)
                .delete(delete_certificate::<CertificatePostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_certificates<C>(
    State(usecase): State<Arc<CertificateUseCase<C>>>,
) -> impl IntoResponse
where
    C: CertificateRepository + Send + Sync + 'static,
{
    match usecase.list().await {
        Ok(certificates) => Json(certificates).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_certificate<C>(
    State(usecase): State<Arc<CertificateUseCase<C>>>,
    Path(certificate_id): Path<i32>,
) -> impl IntoResponse
where
    C: CertificateRepository + Send + Sync + 'static,
{
    match usecase.get(certificate_id).await {
        Ok(certificate) => Json(certificate).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_certificate<C>(
    State(usecase): State<Arc<CertificateUseCase<C>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpsertCertificateModel>,
) -> impl IntoResponse
where
    C: CertificateRepository + Send + Sync + 'static,
{
    match usecase.create(auth.actor(), model).await {
        Ok(certificate) => (StatusCode::CREATED, Json(certificate)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_certificate<C>(
    State(usecase): State<Arc<CertificateUseCase<C>>>,
    auth: AuthUser,
    Path(certificate_id): Path<i32>,
    JsonBody(model): JsonBody<UpsertCertificateModel>,
) -> impl IntoResponse
where
    C: CertificateRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), certificate_id, model).await {
        Ok(certificate) => Json(certificate).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_certificate<C>(
    State(usecase): State<Arc<CertificateUseCase<C>>>,
    auth: AuthUser,
    Path(certificate_id): Path<i32>,
) -> impl IntoResponse
where
    C: CertificateRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), certificate_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
