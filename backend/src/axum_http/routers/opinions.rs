use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use crates::{
    domain::{
        repositories::{companies::CompanyRepository, opinions::OpinionRepository},
        value_objects::opinions::{InsertOpinionModel, OpinionDecision, OpinionQuery},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{companies::CompanyPostgres, opinions::OpinionPostgres},
    },
};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    axum_http::error_responses::JsonBody,
    usecases::{errors::UseCaseError, opinions::OpinionUseCase},
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let opinion_repository = OpinionPostgres::new(Arc::clone(&db_pool));
    let company_repository = CompanyPostgres::new(Arc::clone(&db_pool));

    let usecase = OpinionUseCase::new(Arc::new(opinion_repository), Arc::new(company_repository));

    Router::new()
        .route(
            "/",
            get(list_opinions::<OpinionPostgres, CompanyPostgres>)
                .post(submit_opinion::<OpinionPostgres, CompanyPostgres>),
        )
        .route(
            "/summary",
            get(opinion_summary::<OpinionPostgres, CompanyPostgres>),
        )
        .route(
            "/moderation",
            get(moderation_queue::<OpinionPostgres, CompanyPostgres>),
        )
        .route(
            "/:id",
            get(get_opinion::<OpinionPostgres, CompanyPostgres>)
                .delete(delete_opinion::<OpinionPostgres, CompanyPostgres>),
        )
        .route(
            "/:id/approve",
            put(approve_opinion::<OpinionPostgres, CompanyPostgres>),
        )
        .route(
            "/:id/reject",
            put(reject_opinion::<OpinionPostgres, CompanyPostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn submit_opinion<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    maybe_auth: MaybeAuthUser,
    JsonBody(model): JsonBody<InsertOpinionModel>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase.submit(maybe_auth.actor(), model).await {
        Ok(opinion) => (StatusCode::CREATED, Json(opinion)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list_opinions<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    Query(query): Query<OpinionQuery>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase.list_approved(query.company_id).await {
        Ok(opinions) => Json(opinions).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn opinion_summary<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    Query(query): Query<OpinionQuery>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    let Some(company_id) = query.company_id else {
        return UseCaseError::BadRequest("companyId is required".to_string()).into_response();
    };

    match usecase.summary(company_id).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn moderation_queue<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    auth: AuthUser,
    Query(query): Query<OpinionQuery>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase.list_for_moderation(auth.actor(), query.status).await {
        Ok(opinions) => Json(opinions).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_opinion<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    maybe_auth: MaybeAuthUser,
    Path(opinion_id): Path<i32>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase.get(maybe_auth.actor(), opinion_id).await {
        Ok(opinion) => Json(opinion).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn approve_opinion<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    auth: AuthUser,
    Path(opinion_id): Path<i32>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase
        .decide(auth.actor(), opinion_id, OpinionDecision::Approve)
        .await
    {
        Ok(opinion) => Json(opinion).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn reject_opinion<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    auth: AuthUser,
    Path(opinion_id): Path<i32>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase
        .decide(auth.actor(), opinion_id, OpinionDecision::Reject)
        .await
    {
        Ok(opinion) => Json(opinion).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_opinion<O, C>(
    State(usecase): State<Arc<OpinionUseCase<O, C>>>,
    auth: AuthUser,
    Path(opinion_id): Path<i32>,
) -> impl IntoResponse
where
    O: OpinionRepository + Send + Sync + 'static,
    C: CompanyRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), opinion_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
