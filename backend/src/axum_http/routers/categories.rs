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
        repositories::categories::CategoryRepository,
        value_objects::categories::UpsertCategoryModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad, repositories::categories::CategoryPostgres,
    },
};

use crate::{
    auth::AuthUser,
    axum_http::error_responses::JsonBody,
    usecases::categories::CategoryUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let category_repository = CategoryPostgres::new(Arc::clone(&db_pool));
    let usecase = CategoryUseCase::new(Arc::new(category_repository));

    Router::new()
        .route(
            "/",
            get(list_categories::<CategoryPostgres>).post(create_category::<CategoryPostgres>),
        )
        .route(
            "/:id",
            get(get_category::<CategoryPostgres>)
                .put(update_category::<CategoryPostgres>)
                .delete(delete_category::<CategoryPostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn list_categories<C>(
    State(usecase): State<Arc<CategoryUseCase<C>>>,
) -> impl IntoResponse
where
    C: CategoryRepository + Send + Sync + 'static,
{
    match usecase.list().await {
        Ok(categories) => Json(categories).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_category<C>(
    State(usecase): State<Arc<CategoryUseCase<C>>>,
    Path(category_id): Path<i32>,
) -> impl IntoResponse
where
    C: CategoryRepository + Send + Sync + 'static,
{
    match usecase.get(category_id).await {
        Ok(category) => Json(category).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_category<C>(
    State(usecase): State<Arc<CategoryUseCase<C>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpsertCategoryModel>,
) -> impl IntoResponse
where
    C: CategoryRepository + Send + Sync + 'static,
{
    match usecase.create(auth.actor(), model).await {
        Ok(category) => (StatusCode::CREATED, Json(category)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_category<C>(
    State(usecase): State<Arc<CategoryUseCase<C>>>,
    auth: AuthUser,
    Path(category_id): Path<i32>,
    JsonBody(model): JsonBody<UpsertCategoryModel>,
) -> impl IntoResponse
where
    C: CategoryRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), category_id, model).await {
        Ok(category) => Json(category).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_category<C>(
    State(usecase): State<Arc<CategoryUseCase<C>>>,
    auth: AuthUser,
    Path(category_id): Path<i32>,
) -> impl IntoResponse
where
    C: CategoryRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), category_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
