//! Driving port for the one-time onboarding flow.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::{ExternalIdentity, UserId, Username};
use crate::domain::watchlist::WatchlistId;

/// Identifiers established by a completed onboarding run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OnboardingOutcome {
    /// Internal id the external identity resolved to.
    pub user_id: UserId,
    /// The watchlist the user owns.
    pub watchlist_id: WatchlistId,
    /// Whether this run created the watchlist.
    pub watchlist_created: bool,
}

/// Domain use-case port for onboarding.
///
/// Safe to call on every login: resolving an already-known identity and
/// finding an already-owned watchlist are the expected steady states.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OnboardingCommand: Send + Sync {
    /// Resolve the identity to an internal user and ensure the user owns
    /// exactly one watchlist.
    async fn complete_onboarding(
        &self,
        identity: &ExternalIdentity,
        suggested_username: &Username,
    ) -> Result<OnboardingOutcome, Error>;
}
