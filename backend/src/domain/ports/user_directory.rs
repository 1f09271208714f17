//! Port for resolving external identities to internal user ids.

use async_trait::async_trait;

use crate::domain::user::{ExternalIdentity, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port mapping provider identities to internal users.
///
/// `resolve_or_create` is conflict tolerant: two concurrent calls for the
/// same identity both succeed and return the same id, whichever one's insert
/// lands first. "Already exists" is the expected steady state, never an
/// error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up the user for `identity`, inserting a new row with
    /// `suggested_username` when the identity is seen for the first time.
    async fn resolve_or_create(
        &self,
        identity: &ExternalIdentity,
        suggested_username: &Username,
    ) -> Result<UserId, UserDirectoryError>;
}

/// Fixture directory that maps every identity to a fixed user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserDirectory;

impl FixtureUserDirectory {
    /// The id every identity resolves to.
    pub const USER_ID: i32 = 1;
}

#[async_trait]
impl UserDirectory for FixtureUserDirectory {
    async fn resolve_or_create(
        &self,
        _identity: &ExternalIdentity,
        _suggested_username: &Username,
    ) -> Result<UserId, UserDirectoryError> {
        UserId::try_new(Self::USER_ID)
            .map_err(|err| UserDirectoryError::query(format!("invalid fixture user id: {err}")))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_resolves_every_identity_to_fixed_id() {
        let directory = FixtureUserDirectory;
        let identity = ExternalIdentity::try_from_parts("fixture", "anyone").expect("identity");
        let username = Username::new("anyone").expect("username");

        let resolved = directory
            .resolve_or_create(&identity, &username)
            .await
            .expect("fixture resolve succeeds");

        assert_eq!(resolved.as_i32(), FixtureUserDirectory::USER_ID);
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = UserDirectoryError::connection("pool exhausted");
        assert!(err.to_string().contains("pool exhausted"));
    }
}
