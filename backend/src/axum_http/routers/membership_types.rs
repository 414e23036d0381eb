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
        repositories::membership_types::MembershipTypeRepository,
        value_objects::membership_types::UpsertMembershipTypeModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::membership_types::MembershipTypePostgres,
    },
};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    axum_http::error_responses::JsonBody,
    usecases::membership_types::MembershipTypeUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let membership_type_repository = MembershipTypePostgres::new(Arc::clone(&db_pool));
    let usecase = MembershipTypeUseCase::new(Arc::new(membership_type_repository));

    Router::new()
        .route(
            "/",
            get(list_membership_types::<MembershipTypePostgres>).post(create_membership_type::<MembershipTypePostgres>),
        )
        .route(
            "/:id",
            get(get_membership_type::<MembershipTypePostgres>)
                .put(update_membership_type::<MembershipTypePostgres>)
                .delete(delete_membership_type::<MembershipTypePostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_membership_types<M>(
    State(usecase): State<Arc<MembershipTypeUseCase<M>>>,
    maybe_auth: MaybeAuthUser,
) -> impl IntoResponse
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.list(maybe_auth.actor()).await {
        Ok(membership_types) => Json(membership_types).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_membership_type<M>(
    State(usecase): State<Arc<MembershipTypeUseCase<M>>>,
    maybe_auth: MaybeAuthUser,
    Path(membership_type_id): Path<i32>,
) -> impl IntoResponse
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.get(maybe_auth.actor(), membership_type_id).await {
        Ok(membership_type) => Json(membership_type).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_membership_type<M>(
    State(usecase): State<Arc<MembershipTypeUseCase<M>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpsertMembershipTypeModel>,
) -> impl IntoResponse
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.create(auth.actor(), model).await {
        Ok(membership_type) => (StatusCode::CREATED, Json(membership_type)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_membership_type<M>(
    State(usecase): State<Arc<MembershipTypeUseCase<M>>>,
    auth: AuthUser,
    Path(membership_type_id): Path<i32>,
    JsonBody(model): JsonBody<UpsertMembershipTypeModel>,
) -> impl IntoResponse
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), membership_type_id, model).await {
        Ok(membership_type) => Json(membership_type).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_membership_type<M>(
    State(usecase): State<Arc<MembershipTypeUseCase<M>>>,
    auth: AuthUser,
    Path(membership_type_id): Path<i32>,
) -> impl IntoResponse
where
    M: MembershipTypeRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), membership_type_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
