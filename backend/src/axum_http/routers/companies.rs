use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::{
            companies::CompanyRepository, membership_types::MembershipTypeRepository,
            users::UserRepository,
        },
        value_objects::companies::{CompanyFilter, UpsertCompanyModel},
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            companies::CompanyPostgres, membership_types::MembershipTypePostgres,
            users::UserPostgres,
        },
    },
};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    axum_http::error_responses::JsonBody,
    usecases::companies::CompanyUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let company_repository = CompanyPostgres::new(Arc::clone(&db_pool));
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let membership_type_repository = MembershipTypePostgres::new(Arc::clone(&db_pool));

    let usecase = CompanyUseCase::new(
        Arc::new(company_repository),
        Arc::new(user_repository),
        Arc::new(membership_type_repository),
    );

    Router::new()
        .route(
            "/",
            get(list_companies::<CompanyPostgres, UserPostgres, MembershipTypePostgres>)
                .post(create_company::<CompanyPostgres, UserPostgres, MembershipTypePostgres>),
        )
        .route(
            "/:id",
            get(get_company::<CompanyPostgres, UserPostgres, MembershipTypePostgres>)
                .put(update_company::<CompanyPostgres, UserPostgres, MembershipTypePostgres>)
                .delete(delete_company::<CompanyPostgres, UserPostgres, MembershipTypePostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_companies<C, U, M>(
    State(usecase): State<Arc<CompanyUseCase<C, U, M>>>,
    maybe_auth: MaybeAuthUser,
    Query(filter): Query<CompanyFilter>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.list(maybe_auth.actor(), filter).await {
        Ok(companies) => Json(companies).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_company<C, U, M>(
    State(usecase): State<Arc<CompanyUseCase<C, U, M>>>,
    maybe_auth: MaybeAuthUser,
    Path(company_id): Path<i32>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.get(maybe_auth.actor(), company_id).await {
        Ok(company) => Json(company).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_company<C, U, M>(
    State(usecase): State<Arc<CompanyUseCase<C, U, M>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpsertCompanyModel>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.create(auth.actor(), model).await {
        Ok(company) => (StatusCode::CREATED, Json(company)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_company<C, U, M>(
    State(usecase): State<Arc<CompanyUseCase<C, U, M>>>,
    auth: AuthUser,
    Path(company_id): Path<i32>,
    JsonBody(model): JsonBody<UpsertCompanyModel>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), company_id, model).await {
        Ok(company) => Json(company).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_company<C, U, M>(
    State(usecase): State<Arc<CompanyUseCase<C, U, M>>>,
    auth: AuthUser,
    Path(company_id): Path<i32>,
) -> impl IntoResponse
where
    C: CompanyRepository + Send + Sync + 'static,
    U: UserRepository + Send + Sync + 'static,
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), company_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
