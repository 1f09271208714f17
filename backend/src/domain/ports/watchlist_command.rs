//! Driving port for watchlist mutations.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::user::UserId;
use crate::domain::watchlist::{ItemKey, WatchlistId, WatchlistItemId};

/// Domain use-case port for adding and removing watchlist items.
///
/// The watchlist id and acting user are resolved once at the boundary and
/// passed explicitly; nothing below it reads ambient session state.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistCommand: Send + Sync {
    /// Add a title to the watchlist, returning the new item id.
    async fn add_movie(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, Error>;

    /// Remove a title from the watchlist, returning the deleted item id.
    async fn remove_movie(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, Error>;
}
