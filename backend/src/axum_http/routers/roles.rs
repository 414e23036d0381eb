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
        repositories::roles::RoleRepository,
        value_objects::roles::UpsertRoleModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::roles::RolePostgres,
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::JsonBody,
    usecases::roles::RoleUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let role_repository = RolePostgres::new(Arc::clone(&db_pool));
    let usecase = RoleUseCase::new(Arc::new(role_repository));

    Router::new()
        .route(
            "/",
            get(list_roles::<RolePostgres>).post(create_role::<RolePostgres>),
        )
        .route(
            "/:id",
            get(get_role::<RolePostgres>)
                .put(update_role::<RolePostgres>)
                .delete(delete_role::<RolePostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_roles<R>(
    State(usecase): State<Arc<RoleUseCase<R>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    R: RoleRepository + Send + Sync + 'static,
{
    match usecase.list(auth.actor()).await {
        Ok(roles) => Json(roles).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_role<R>(
    State(usecase): State<Arc<RoleUseCase<R>>>,
    auth: AuthUser,
    Path(role_id): Path<i32>,
) -> impl IntoResponse
where
    R: RoleRepository + Send + Sync + 'static,
{
    match usecase.get(auth.actor(), role_id).await {
        Ok(role) => Json(role).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_role<R>(
    State(usecase): State<Arc<RoleUseCase<R>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpsertRoleModel>,
) -> impl IntoResponse
where
    R: RoleRepository + Send + Sync + 'static,
{
    match usecase.create(auth.actor(), model).await {
        Ok(role) => (StatusCode::CREATED, Json(role)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_role<R>(
    State(usecase): State<Arc<RoleUseCase<R>>>,
    auth: AuthUser,
    Path(role_id): Path<i32>,
    JsonBody(model): JsonBody<UpsertRoleModel>,
) -> impl IntoResponse
where
    R: RoleRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), role_id, model).await {
        Ok(role) => Json(role).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_role<R>(
    State(usecase): State<Arc<RoleUseCase<R>>>,
    auth: AuthUser,
    Path(role_id): Path<i32>,
) -> impl IntoResponse
where
    R: RoleRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), role_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
