//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations. Login stores the authenticated external
//! identity; onboarding adds the provisioned internal user id and default
//! watchlist id. Watchlist handlers read those ids back instead of resolving
//! the identity on every request.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AuthenticatedIdentity, OnboardingOutcome};
use crate::domain::{Error, ExternalIdentity, UserId, Username, WatchlistId};

pub(crate) const IDENTITY_KEY: &str = "identity";
pub(crate) const USER_ID_KEY: &str = "internal_user_id";
pub(crate) const WATCHLIST_ID_KEY: &str = "default_watchlist_id";
pub(crate) const ONBOARDING_COMPLETE_KEY: &str = "onboarding_complete";

/// Serialised form of the authenticated identity held in the session cookie.
#[derive(Debug, Serialize, Deserialize)]
struct StoredIdentity {
    provider: String,
    external_id: String,
    username: String,
}

impl StoredIdentity {
    fn from_authenticated(authenticated: &AuthenticatedIdentity) -> Self {
        Self {
            provider: authenticated.identity.provider().to_owned(),
            external_id: authenticated.identity.external_id().to_owned(),
            username: authenticated.suggested_username.as_ref().to_owned(),
        }
    }

    fn into_authenticated(self) -> Result<AuthenticatedIdentity, String> {
        let identity = ExternalIdentity::try_from_parts(&self.provider, &self.external_id)
            .map_err(|error| error.to_string())?;
        let suggested_username =
            Username::new(self.username).map_err(|error| error.to_string())?;
        Ok(AuthenticatedIdentity {
            identity,
            suggested_username,
        })
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity in the session cookie.
    pub fn persist_identity(&self, authenticated: &AuthenticatedIdentity) -> Result<(), Error> {
        self.0
            .insert(IDENTITY_KEY, StoredIdentity::from_authenticated(authenticated))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the authenticated identity from the session, if present.
    pub fn identity(&self) -> Result<Option<AuthenticatedIdentity>, Error> {
        let stored = self
            .0
            .get::<StoredIdentity>(IDENTITY_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match stored {
            Some(raw) => match raw.into_authenticated() {
                Ok(authenticated) => Ok(Some(authenticated)),
                Err(error) => {
                    tracing::warn!("invalid identity in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an authenticated identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<AuthenticatedIdentity, Error> {
        self.identity()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Persist the onboarding outcome so later requests can act on the
    /// internal user and default watchlist without another lookup.
    pub fn persist_onboarding(&self, outcome: &OnboardingOutcome) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, outcome.user_id.as_i32())
            .and_then(|()| self.0.insert(WATCHLIST_ID_KEY, outcome.watchlist_id.as_i32()))
            .and_then(|()| self.0.insert(ONBOARDING_COMPLETE_KEY, true))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the internal user id written by onboarding, if present.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let id = self
            .0
            .get::<i32>(USER_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match UserId::try_new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid user id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require an onboarded user id or return `401 Unauthorized`.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("onboarding required"))
    }

    /// Fetch the default watchlist id written by onboarding, if present.
    pub fn watchlist_id(&self) -> Result<Option<WatchlistId>, Error> {
        let id = self
            .0
            .get::<i32>(WATCHLIST_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match id {
            Some(raw) => match WatchlistId::try_new(raw) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!("invalid watchlist id in session cookie: {error}");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Require the onboarded watchlist id and user id together.
    ///
    /// Mutating watchlist handlers resolve both once here and pass them to
    /// the domain explicitly.
    pub fn require_watchlist_context(&self) -> Result<(WatchlistId, UserId), Error> {
        let user_id = self.require_user_id()?;
        let watchlist_id = self
            .watchlist_id()?
            .ok_or_else(|| Error::unauthorized("onboarding required"))?;
        Ok((watchlist_id, user_id))
    }

    /// Whether onboarding has completed for this session.
    pub fn onboarding_complete(&self) -> Result<bool, Error> {
        self.0
            .get::<bool>(ONBOARDING_COMPLETE_KEY)
            .map(|flag| flag.unwrap_or(false))
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Drop all session state and instruct the client to delete the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
