pub mod categories;
pub mod certificates;
pub mod companies;
pub mod membership_payments;
pub mod membership_types;
pub mod opinions;
pub mod roles;
pub mod system_settings;
pub mod users;

use diesel::result::{DatabaseErrorKind, Error as DieselError};

use crate::domain::repositories::{ReferencedRow, UniqueViolation};

/// Turns unique and foreign-key failures into typed errors so use cases can
/// answer with a conflict; everything else passes through.
pub(crate) fn map_write_error(err: DieselError) -> anyhow::Error {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            UniqueViolation::new(info.constraint_name().unwrap_or("unknown")).into()
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            ReferencedRow::new(info.constraint_name().unwrap_or("unknown")).into()
        }
        other => other.into(),
    }
}
