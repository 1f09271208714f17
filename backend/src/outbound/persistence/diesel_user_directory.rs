//! PostgreSQL-backed `UserDirectory` implementation using Diesel ORM.
//!
//! Resolution is conflict tolerant: the insert ignores conflicts, then the
//! canonical row is re-read by external identity. Two sessions racing on the
//! same first login both converge on the row whichever of them created.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::user::{ExternalIdentity, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewUserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user directory port.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    /// Create a new directory with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain directory errors.
fn map_pool_error(error: PoolError) -> UserDirectoryError {
    map_basic_pool_error(error, UserDirectoryError::connection)
}

/// Map Diesel errors to domain directory errors.
fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    map_basic_diesel_error(
        error,
        UserDirectoryError::query,
        UserDirectoryError::connection,
    )
}

/// Convert a serial id column value into a validated domain user id.
fn row_id_to_user_id(id: i32) -> Result<UserId, UserDirectoryError> {
    UserId::try_new(id).map_err(|err| UserDirectoryError::query(err.to_string()))
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn resolve_or_create(
        &self,
        identity: &ExternalIdentity,
        suggested_username: &Username,
    ) -> Result<UserId, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            username: suggested_username.as_ref(),
            oauth_provider: identity.provider(),
            external_id: identity.external_id(),
        };

        diesel::insert_into(users::table)
            .values(&new_row)
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let resolved_id = users::table
            .filter(users::oauth_provider.eq(identity.provider()))
            .filter(users::external_id.eq(identity.external_id()))
            .select(users::id)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        match resolved_id {
            Some(id) => row_id_to_user_id(id),
            // The ignored conflict was on the username, held by a different
            // identity, so no row exists for this identity to re-read.
            None => Err(UserDirectoryError::query(format!(
                "username {suggested_username} is taken by another identity"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for error mapping and id conversion edge cases.

    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let pool_err = PoolError::checkout("connection refused");
        let dir_err = map_pool_error(pool_err);

        assert!(matches!(dir_err, UserDirectoryError::Connection { .. }));
        assert!(dir_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_error_maps_to_query_error() {
        let diesel_err = diesel::result::Error::NotFound;
        let dir_err = map_diesel_error(diesel_err);

        assert!(matches!(dir_err, UserDirectoryError::Query { .. }));
        assert!(dir_err.to_string().contains("record not found"));
    }

    #[rstest]
    #[case(1)]
    #[case(i32::MAX)]
    fn serial_ids_convert_to_user_ids(#[case] id: i32) {
        let user_id = row_id_to_user_id(id).expect("positive ids are valid");
        assert_eq!(user_id.as_i32(), id);
    }

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn non_positive_ids_are_query_errors(#[case] id: i32) {
        let error = row_id_to_user_id(id).expect_err("non-positive ids must fail");
        assert!(matches!(error, UserDirectoryError::Query { .. }));
    }
}
