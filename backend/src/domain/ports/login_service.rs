//! Driving port for login/authentication use-cases.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! identity provider. This makes HTTP handler tests deterministic because
//! they can substitute a test double instead of wiring a real provider.

use async_trait::async_trait;

use crate::domain::auth::LoginCredentials;
use crate::domain::error::Error;
use crate::domain::user::{ExternalIdentity, Username};

/// Identity established by a successful login.
///
/// Carries what the downstream onboarding flow needs: the provider identity
/// to resolve against the user directory and the username to suggest when
/// the directory has to create the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    /// External provider identity vouched for by the authenticator.
    pub identity: ExternalIdentity,
    /// Username to propose if this identity has no user row yet.
    pub suggested_username: Username,
}

/// Domain use-case port for authentication.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated external identity.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, Error>;
}

/// In-memory authenticator used for development and tests until a real
/// identity provider is wired.
///
/// `admin` / `password` authenticates successfully and produces a fixed
/// provider identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

/// Provider name reported by [`FixtureLoginService`].
pub const FIXTURE_PROVIDER: &str = "fixture";

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedIdentity, Error> {
        if credentials.username() == "admin" && credentials.password() == "password" {
            let identity = ExternalIdentity::try_from_parts(FIXTURE_PROVIDER, "fixture-admin")
                .map_err(|err| Error::internal(format!("invalid fixture identity: {err}")))?;
            let suggested_username = Username::new(credentials.username())
                .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
            Ok(AuthenticatedIdentity {
                identity,
                suggested_username,
            })
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
