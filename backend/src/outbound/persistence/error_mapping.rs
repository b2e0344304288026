//! Translation of pool and Diesel failures into [`StoreError`].

use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;
use crate::domain::UniqueUserField;
use crate::domain::ports::StoreError;

/// Map a pool failure; every pool failure means the database is unreachable.
pub(crate) fn map_pool_error(error: PoolError) -> StoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    StoreError::connection(message)
}

/// Map a Diesel failure, keeping driver detail out of the message.
pub(crate) fn map_diesel_error(error: DieselError) -> StoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => StoreError::query("record not found"),
        DieselError::QueryBuilderError(_) => StoreError::query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
            StoreError::query("transaction conflict")
        }
        _ => StoreError::query("database error"),
    }
}

/// Unique user column named by a unique-violation error, if any.
pub(crate) fn duplicate_user_field(error: &DieselError) -> Option<UniqueUserField> {
    let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = error else {
        return None;
    };
    unique_field_for_constraint(info.as_ref())
}

fn unique_field_for_constraint(
    info: &(dyn DatabaseErrorInformation + Send + Sync),
) -> Option<UniqueUserField> {
    match info.constraint_name() {
        Some("users_email_key") => Some(UniqueUserField::Email),
        Some("users_phone_number_key") => Some(UniqueUserField::PhoneNumber),
        _ => None,
    }
}
