use std::collections::BTreeMap;

use crates::domain::{
    repositories::{ReferencedRow, UniqueViolation},
    value_objects::{iam::Actor, validation::field_messages},
};
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("validation failed")]
    Validation(BTreeMap<String, Vec<String>>),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    ExternalService(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl UseCaseError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            UseCaseError::Validation(_) | UseCaseError::BadRequest(_) => StatusCode::BAD_REQUEST,
            UseCaseError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            UseCaseError::Forbidden(_) => StatusCode::FORBIDDEN,
            UseCaseError::NotFound(_) => StatusCode::NOT_FOUND,
            UseCaseError::Conflict(_) => StatusCode::CONFLICT,
            UseCaseError::ExternalService(_) => StatusCode::BAD_GATEWAY,
            UseCaseError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Repository write failures: unique violations become 409, anything
    /// else stays internal.
    pub fn from_write(err: anyhow::Error) -> Self {
        if let Some(violation) = err.downcast_ref::<UniqueViolation>() {
            return UseCaseError::Conflict(format!(
                "a record with the same unique value already exists ({})",
                violation.constraint
            ));
        }
        if let Some(referenced) = err.downcast_ref::<ReferencedRow>() {
            return UseCaseError::Conflict(format!(
                "the record is still referenced by other records ({})",
                referenced.constraint
            ));
        }
        UseCaseError::Internal(err)
    }
}

impl From<ValidationErrors> for UseCaseError {
    fn from(errors: ValidationErrors) -> Self {
        UseCaseError::Validation(field_messages(&errors))
    }
}

pub type UseCaseResult<T> = std::result::Result<T, UseCaseError>;

pub fn ensure_admin(actor: &Actor) -> UseCaseResult<()> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(UseCaseError::Forbidden(
            "this action requires the admin role".to_string(),
        ))
    }
}
