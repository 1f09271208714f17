//! Domain service for the one-time onboarding flow.
//!
//! Onboarding resolves the external identity to an internal user and
//! provisions the owned watchlist. Both steps are idempotent, so the flow
//! can run on every login without creating duplicates.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::ports::{
    OnboardingCommand, OnboardingOutcome, UserDirectory, UserDirectoryError, WatchlistRepository,
    WatchlistRepositoryError,
};
use crate::domain::user::{ExternalIdentity, Username};
use crate::domain::watchlist::WatchlistName;

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

fn map_repository_error(error: WatchlistRepositoryError) -> Error {
    match error {
        WatchlistRepositoryError::PermissionDenied { message } => Error::forbidden(message),
        WatchlistRepositoryError::DuplicateItem { message } => Error::conflict(message),
        WatchlistRepositoryError::ItemNotFound { message } => Error::not_found(message),
        WatchlistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("watchlist repository unavailable: {message}"))
        }
        WatchlistRepositoryError::Query { message } => {
            Error::internal(format!("watchlist repository error: {message}"))
        }
    }
}

/// Onboarding service implementing the onboarding driving port.
#[derive(Clone)]
pub struct OnboardingService<D, W> {
    directory: Arc<D>,
    watchlists: Arc<W>,
}

impl<D, W> OnboardingService<D, W> {
    /// Create a new onboarding service over the directory and watchlist
    /// repository.
    pub fn new(directory: Arc<D>, watchlists: Arc<W>) -> Self {
        Self {
            directory,
            watchlists,
        }
    }
}

#[async_trait]
impl<D, W> OnboardingCommand for OnboardingService<D, W>
where
    D: UserDirectory,
    W: WatchlistRepository,
{
    async fn complete_onboarding(
        &self,
        identity: &ExternalIdentity,
        suggested_username: &Username,
    ) -> Result<OnboardingOutcome, Error> {
        let user_id = self
            .directory
            .resolve_or_create(identity, suggested_username)
            .await
            .map_err(map_directory_error)?;

        let created = self
            .watchlists
            .create_for_owner(user_id, &WatchlistName::default_name())
            .await
            .map_err(map_repository_error)?;

        Ok(OnboardingOutcome {
            user_id,
            watchlist_id: created.watchlist_id(),
            watchlist_created: created.was_created(),
        })
    }
}

#[cfg(test)]
#[path = "onboarding_service_tests.rs"]
mod tests;
