//! Shared Diesel error mapping for the persistence adapters.

use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub(crate) fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; losing the
/// connection maps to a connection error. Callers that care about constraint
/// violations must inspect the error before handing it here.
pub(crate) fn map_basic_diesel_error<E, Q, C>(
    error: diesel::result::Error,
    query: Q,
    connection: C,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

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
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// Whether the error is a unique violation of the named constraint.
///
/// Postgres reports the constraint name alongside the violation; older or
/// proxied setups sometimes only carry it inside the message text, so both
/// are checked.
pub(crate) fn is_unique_violation_of(error: &diesel::result::Error, constraint: &str) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            info.constraint_name() == Some(constraint) || info.message().contains(constraint)
        }
        _ => false,
    }
}

/// Whether the error is a unique violation of any constraint.
pub(crate) fn is_unique_violation(error: &diesel::result::Error) -> bool {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    matches!(
        error,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::*;

    fn unique_violation_with_message(message: &str) -> diesel::result::Error {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            Box::new(message.to_owned()),
        )
    }

    #[rstest]
    fn pool_errors_map_to_connection() {
        let mapped: String =
            map_basic_pool_error(PoolError::checkout("timed out"), |message| message);
        assert_eq!(mapped, "timed out");
    }

    #[rstest]
    #[case(diesel::result::Error::NotFound, "query: record not found")]
    #[case(
        unique_violation_with_message("duplicate key"),
        "query: database error"
    )]
    fn diesel_errors_map_to_query(#[case] error: diesel::result::Error, #[case] expected: &str) {
        let mapped: String = map_basic_diesel_error(
            error,
            |message| format!("query: {message}"),
            |message| format!("connection: {message}"),
        );
        assert_eq!(mapped, expected);
    }

    #[rstest]
    fn unique_violation_matches_on_message_text() {
        let error = unique_violation_with_message(
            "duplicate key value violates unique constraint \"watchlist_items_watchlist_item_key\"",
        );

        assert!(is_unique_violation(&error));
        assert!(is_unique_violation_of(
            &error,
            "watchlist_items_watchlist_item_key"
        ));
        assert!(!is_unique_violation_of(&error, "users_username_key"));
    }

    #[rstest]
    fn non_database_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&diesel::result::Error::NotFound));
        assert!(!is_unique_violation_of(
            &diesel::result::Error::NotFound,
            "users_username_key"
        ));
    }
}
