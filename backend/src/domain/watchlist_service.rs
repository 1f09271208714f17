//! Watchlist domain services.
//!
//! Implements the watchlist driving ports: the enriched read and the
//! add/remove mutations. Enrichment is read-time only; the store keeps
//! nothing but catalog ids, so display metadata is fetched per item on
//! every read and a per-item failure degrades that item instead of
//! failing the view.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future;
use tracing::debug;

use crate::domain::error::Error;
use crate::domain::movie::poster_url;
use crate::domain::ports::{
    MovieMetadataGateway, WatchlistCommand, WatchlistQuery, WatchlistRepository,
    WatchlistRepositoryError,
};
use crate::domain::user::UserId;
use crate::domain::watchlist::{
    EnrichedWatchlistItem, ItemKey, WatchlistId, WatchlistItem, WatchlistItemId, WatchlistView,
};

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

/// Watchlist service implementing the query and command driving ports.
#[derive(Clone)]
pub struct WatchlistService<R, G> {
    watchlists: Arc<R>,
    metadata: Arc<G>,
}

impl<R, G> WatchlistService<R, G> {
    /// Create a new watchlist service over the repository and the metadata
    /// gateway.
    pub fn new(watchlists: Arc<R>, metadata: Arc<G>) -> Self {
        Self {
            watchlists,
            metadata,
        }
    }
}

impl<R, G> WatchlistService<R, G>
where
    G: MovieMetadataGateway,
{
    async fn enrich_item(&self, item: WatchlistItem) -> EnrichedWatchlistItem {
        let tmdb_id = item.key().tmdb_id();
        match self.metadata.details(tmdb_id).await {
            Ok(Some(details)) => {
                let poster = details.summary.poster_path.as_deref().map(poster_url);
                EnrichedWatchlistItem::new(
                    item,
                    Some(details.summary.title),
                    poster,
                    details.summary.overview,
                )
            }
            Ok(None) => {
                debug!(%tmdb_id, "catalog has no metadata for watchlist item");
                EnrichedWatchlistItem::without_metadata(item)
            }
            Err(error) => {
                debug!(%tmdb_id, %error, "watchlist item enrichment failed");
                EnrichedWatchlistItem::without_metadata(item)
            }
        }
    }
}

#[async_trait]
impl<R, G> WatchlistQuery for WatchlistService<R, G>
where
    R: WatchlistRepository,
    G: MovieMetadataGateway,
{
    async fn watchlist_for_user(&self, user_id: UserId) -> Result<Option<WatchlistView>, Error> {
        let Some(snapshot) = self
            .watchlists
            .find_owned(user_id)
            .await
            .map_err(map_repository_error)?
        else {
            return Ok(None);
        };

        let id = snapshot.id();
        let name = snapshot.name().clone();
        let enriched = future::join_all(
            snapshot
                .into_items()
                .into_iter()
                .map(|item| self.enrich_item(item)),
        )
        .await;

        Ok(Some(WatchlistView::new(id, name, enriched)))
    }
}

#[async_trait]
impl<R, G> WatchlistCommand for WatchlistService<R, G>
where
    R: WatchlistRepository,
    G: MovieMetadataGateway,
{
    async fn add_movie(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, Error> {
        self.watchlists
            .add_item(watchlist_id, key, acting_user_id)
            .await
            .map_err(map_repository_error)
    }

    async fn remove_movie(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, Error> {
        self.watchlists
            .remove_item(watchlist_id, key, acting_user_id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "watchlist_service_tests.rs"]
mod tests;
