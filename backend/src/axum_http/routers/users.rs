use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use crates::{
    domain::{
        repositories::{system_settings::SystemSettingsRepository, users::UserRepository},
        value_objects::iam::UpdateUserModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{system_settings::SystemSettingsPostgres, users::UserPostgres},
    },
};
use tracing::info;

use crate::{
    auth::{AuthUser, VerifiedIdentity},
    axum_http::error_responses::JsonBody,
    config::config_model::DotEnvyConfig,
    usecases::users::UserUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>, config: Arc<DotEnvyConfig>) -> Router {
    let user_repository = UserPostgres::new(Arc::clone(&db_pool));
    let settings_repository = SystemSettingsPostgres::new(Arc::clone(&db_pool));

    let usecase = UserUseCase::new(
        Arc::new(user_repository),
        Arc::new(settings_repository),
        config.access.clone(),
    );

    Router::new()
        .route("/sync", post(sync_user::<UserPostgres, SystemSettingsPostgres>))
        .route("/me", get(current_user))
        .route("/", get(list_users::<UserPostgres, SystemSettingsPostgres>))
        .route(
            "/:id",
            get(get_user::<UserPostgres, SystemSettingsPostgres>)
                .put(update_user::<UserPostgres, SystemSettingsPostgres>)
                .delete(delete_user::<UserPostgres, SystemSettingsPostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn sync_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    VerifiedIdentity(profile): VerifiedIdentity,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    info!(uid = %profile.uid, "users: sync request received");
    match usecase.sync(profile).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn current_user(auth: AuthUser) -> impl IntoResponse {
    Json(auth.user)
}

pub async fn list_users<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    auth: AuthUser,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.list(auth.actor()).await {
        Ok(users) => Json(users).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn get_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.get(auth.actor(), user_id).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
    JsonBody(model): JsonBody<UpdateUserModel>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), user_id, model).await {
        Ok(user) => Json(user).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete_user<U, S>(
    State(usecase): State<Arc<UserUseCase<U, S>>>,
    auth: AuthUser,
    Path(user_id): Path<i32>,
) -> impl IntoResponse
where
    U: UserRepository + Send + Sync + 'static,
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.delete(auth.actor(), user_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}
