use std::sync::Arc;

use axum::{
    Json, async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use crates::domain::{
    repositories::users::UserRepository,
    value_objects::iam::{Actor, IdentityProfile, UserModel},
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::{axum_http::error_responses::ErrorResponse, config::config_model::Identity};

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub email_verified: Option<bool>,
    pub exp: usize,
}

/// Shared by the extractors; installed on the router as an `Extension`.
#[derive(Clone)]
pub struct AuthState {
    pub identity: Identity,
    pub users: Arc<dyn UserRepository + Send + Sync>,
}

#[derive(Debug)]
pub struct AuthError {
    status: StatusCode,
    message: String,
}

impl AuthError {
    fn unauthorized(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNAUTHORIZED,
            message: message.into(),
        }
    }

    fn internal() -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "Internal server error".to_string(),
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::unauthorized(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            code: self.status.as_u16(),
            message: format!("Unauthorized: {}", self.message),
            fields: None,
        });

        (self.status, body).into_response()
    }
}

pub fn validate_identity_jwt(token: &str, identity: &Identity) -> Result<IdentityClaims, AuthError> {
    let decoding_key = DecodingKey::from_secret(identity.jwt_secret.as_bytes());
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    match &identity.audience {
        Some(audience) => validation.set_audience(&[audience.as_str()]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<IdentityClaims>(token, &decoding_key, &validation)
        .map_err(|e| anyhow::anyhow!("JWT validation failed: {}", e))?;

    Ok(token_data.claims)
}

fn auth_state(parts: &Parts) -> Result<AuthState, AuthError> {
    parts.extensions.get::<AuthState>().cloned().ok_or_else(|| {
        error!("auth: AuthState extension is not installed");
        AuthError::internal()
    })
}

/// `None` when no Authorization header is sent at all.
fn bearer_token(parts: &Parts) -> Result<Option<String>, AuthError> {
    let Some(auth_header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::unauthorized("Invalid Authorization header"))?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(Some(token.trim().to_string())),
        _ => Err(AuthError::unauthorized(
            "Invalid Authorization header format",
        )),
    }
}

fn profile_from_claims(claims: IdentityClaims) -> Result<IdentityProfile, AuthError> {
    let email = claims
        .email
        .filter(|email| !email.trim().is_empty())
        .ok_or_else(|| AuthError::unauthorized("token carries no email"))?;

    Ok(IdentityProfile {
        uid: claims.sub,
        email,
        email_verified: claims.email_verified == Some(true),
        display_name: claims.name,
    })
}

/// A verified identity-provider token, whether or not the user has been
/// mirrored locally yet. Only the sync endpoint needs this.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity(pub IdentityProfile);

#[async_trait]
impl<S> FromRequestParts<S> for VerifiedIdentity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = auth_state(parts)?;
        let token = bearer_token(parts)?
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        let claims = validate_identity_jwt(&token, &state.identity)?;
        Ok(VerifiedIdentity(profile_from_claims(claims)?))
    }
}

/// An authenticated caller with a local user row.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: UserModel,
}

impl AuthUser {
    pub fn actor(&self) -> Actor {
        self.user.actor()
    }
}

async fn resolve_user(state: &AuthState, token: &str) -> Result<AuthUser, AuthError> {
    let claims = validate_identity_jwt(token, &state.identity)?;

    let user = state
        .users
        .find_by_uid(claims.sub.clone())
        .await
        .map_err(|err| {
            error!(uid = %claims.sub, db_error = ?err, "auth: failed to load user");
            AuthError::internal()
        })?
        .ok_or_else(|| {
            warn!(uid = %claims.sub, "auth: token for a user that was never synced");
            AuthError::unauthorized("user is not registered; call /api/users/sync first")
        })?;

    Ok(AuthUser { user: user.into() })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = auth_state(parts)?;
        let token = bearer_token(parts)?
            .ok_or_else(|| AuthError::unauthorized("Missing Authorization header"))?;

        resolve_user(&state, &token).await
    }
}

/// Optional authentication for public endpoints. A missing header means an
/// anonymous caller; a header with a bad token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

impl MaybeAuthUser {
    pub fn actor(&self) -> Option<Actor> {
        self.0.as_ref().map(AuthUser::actor)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            return Ok(MaybeAuthUser(None));
        };

        let state = auth_state(parts)?;
        Ok(MaybeAuthUser(Some(resolve_user(&state, &token).await?)))
    }
}
