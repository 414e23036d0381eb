use crate::{
    auth::AuthState,
    axum_http::{default_routers, routers},
    config::config_model::DotEnvyConfig,
};
use anyhow::{Context, Result};
use axum::{
    Extension, Router,
    http::{
        HeaderValue, Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use crates::infra::db::{
    postgres::postgres_connection::PgPoolSquad, repositories::users::UserPostgres,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let auth_state = AuthState {
        identity: config.identity.clone(),
        users: Arc::new(UserPostgres::new(Arc::clone(&db_pool))),
    };

    let app = Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/companies",
            routers::companies::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/categories",
            routers::categories::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/membership-types",
            routers::membership_types::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/certificates",
            routers::certificates::routes(Arc::clone(&db_pool)),
        )
        .nest("/api/roles", routers::roles::routes(Arc::clone(&db_pool)))
        .nest(
            "/api/users",
            routers::users::routes(Arc::clone(&db_pool), Arc::clone(&config)),
        )
        .nest(
            "/api/opinions",
            routers::opinions::routes(Arc::clone(&db_pool)),
        )
        .nest(
            "/api/payments",
            routers::payments::routes(Arc::clone(&db_pool), Arc::clone(&config)),
        )
        .nest(
            "/api/system-settings",
            routers::system_settings::routes(Arc::clone(&db_pool)),
        )
        .route("/api/health-check", get(default_routers::health_check))
        .layer(Extension(auth_state))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.backend_server.timeout,
        )))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::PUT,
                    Method::DELETE,
                ])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(allowed_origins(&config.backend_server.cors_allowed_origins)?),
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!("Server is running on port {}", config.backend_server.port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn allowed_origins(origins: &[String]) -> Result<AllowOrigin> {
    if origins.is_empty() {
        return Ok(AllowOrigin::from(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(AllowOrigin::list(origins))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_origin_list_allows_any() {
        assert!(allowed_origins(&[]).is_ok());
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let origins = vec!["https://ok.example.com".to_string(), "bad\norigin".to_string()];
        assert!(allowed_origins(&origins).is_err());
    }
}
