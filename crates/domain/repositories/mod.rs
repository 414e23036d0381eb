pub mod categories;
pub mod certificates;
pub mod companies;
pub mod membership_payments;
pub mod membership_types;
pub mod opinions;
pub mod roles;
pub mod system_settings;
pub mod users;

use thiserror::Error;

/// Raised by repository implementations when an insert or update hits a
/// unique constraint. Use cases downcast the `anyhow::Error` to map it to a
/// conflict.
#[derive(Debug, Error)]
#[error("unique constraint violated: {constraint}")]
pub struct UniqueViolation {
    pub constraint: String,
}

impl UniqueViolation {
    pub fn new(constraint: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
        }
    }
}

/// Raised when a delete is refused because other rows still reference the
/// target, e.g. membership payments kept for audit.
#[derive(Debug, Error)]
#[error("row still referenced: {constraint}")]
pub struct ReferencedRow {
    pub constraint: String,
}

impl ReferencedRow {
    pub fn new(constraint: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
        }
    }
}
