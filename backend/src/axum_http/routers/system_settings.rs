use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::get,
};
use crates::{
    domain::{
        repositories::system_settings::SystemSettingsRepository,
        value_objects::system_settings::UpdateSystemSettingsModel,
    },
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::system_settings::SystemSettingsPostgres,
    },
};

use crate::{
    auth::{AuthUser, MaybeAuthUser},
    axum_http::error_responses::JsonBody,
    usecases::system_settings::SystemSettingsUseCase,
};

pub fn routes(db_pool: Arc<PgPoolSquad>) -> Router {
    let settings_repository = SystemSettingsPostgres::new(Arc::clone(&db_pool));
    let usecase = SystemSettingsUseCase::new(Arc::new(settings_repository));

    Router::new()
        .route(
            "/",
            get(get_settings::<SystemSettingsPostgres>)
                .put(update_settings::<SystemSettingsPostgres>),
        )
        .with_state(Arc::new(usecase))
}

pub async fn get_settings<S>(
    State(usecase): State<Arc<SystemSettingsUseCase<S>>>,
    maybe_auth: MaybeAuthUser,
) -> impl IntoResponse
where
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.get(maybe_auth.actor()).await {
        Ok(settings) => Json(settings).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update_settings<S>(
    State(usecase): State<Arc<SystemSettingsUseCase<S>>>,
    auth: AuthUser,
    JsonBody(model): JsonBody<UpdateSystemSettingsModel>,
) -> impl IntoResponse
where
    S: SystemSettingsRepository + Send + Sync + 'static,
{
    match usecase.update(auth.actor(), model).await {
        Ok(settings) => Json(settings).into_response(),
        Err(err) => err.into_response(),
    }
}
