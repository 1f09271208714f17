//! Driving port for catalog browse and search reads.

use async_trait::async_trait;

use crate::domain::error::Error;
use crate::domain::movie::{GenreId, MoviePage, MovieProfile, TrendingPeriod};
use crate::domain::watchlist::TmdbId;

/// Domain use-case port for browsing the movie catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieCatalogQuery: Send + Sync {
    /// Search titles by free text. A blank query yields an empty page
    /// without consulting the catalog.
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, Error>;

    /// List titles trending over the given period.
    async fn trending(&self, period: TrendingPeriod, page: u32) -> Result<MoviePage, Error>;

    /// List the catalog's top rated titles.
    async fn top_rated(&self, page: u32) -> Result<MoviePage, Error>;

    /// Discover titles carrying the given genre.
    async fn by_genre(&self, genre_id: GenreId, page: u32) -> Result<MoviePage, Error>;

    /// Fetch the detail aggregate for one title. `None` when the catalog
    /// has no such title.
    async fn movie(&self, id: TmdbId) -> Result<Option<MovieProfile>, Error>;
}
