//! Driving port for watchlist reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::UserId;
use crate::domain::watchlist::WatchlistView;

/// Domain use-case port for reading the user's owned watchlist.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistQuery: Send + Sync {
    /// Read the watchlist the user owns, items enriched with catalog
    /// metadata. `None` when the user owns no watchlist.
    async fn watchlist_for_user(&self, user_id: UserId) -> Result<Option<WatchlistView>, Error>;
}
