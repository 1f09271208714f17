//! Catalog browse and search domain service.
//!
//! Thin orchestration over the metadata gateway: list reads delegate
//! directly, the detail read fans out to three provider endpoints, and a
//! blank search query never reaches the provider at all.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::future;

use crate::domain::error::Error;
use crate::domain::movie::{GenreId, MoviePage, MovieProfile, TrendingPeriod};
use crate::domain::ports::{MetadataGatewayError, MovieCatalogQuery, MovieMetadataGateway};
use crate::domain::watchlist::TmdbId;

fn map_gateway_error(error: MetadataGatewayError) -> Error {
    match error {
        MetadataGatewayError::Transport { message }
        | MetadataGatewayError::Timeout { message }
        | MetadataGatewayError::RateLimited { message } => {
            Error::service_unavailable(format!("metadata provider unavailable: {message}"))
        }
        MetadataGatewayError::Decode { message } => {
            Error::internal(format!("metadata provider response invalid: {message}"))
        }
        MetadataGatewayError::InvalidRequest { message } => Error::invalid_request(message),
    }
}

/// Catalog service implementing the browse/search driving port.
#[derive(Clone)]
pub struct MovieCatalogService<G> {
    metadata: Arc<G>,
}

impl<G> MovieCatalogService<G> {
    /// Create a new catalog service over the metadata gateway.
    pub fn new(metadata: Arc<G>) -> Self {
        Self { metadata }
    }
}

#[async_trait]
impl<G> MovieCatalogQuery for MovieCatalogService<G>
where
    G: MovieMetadataGateway,
{
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, Error> {
        if query.trim().is_empty() {
            return Ok(MoviePage::empty());
        }
        self.metadata
            .search(query, page)
            .await
            .map_err(map_gateway_error)
    }

    async fn trending(&self, period: TrendingPeriod, page: u32) -> Result<MoviePage, Error> {
        self.metadata
            .trending(period, page)
            .await
            .map_err(map_gateway_error)
    }

    async fn top_rated(&self, page: u32) -> Result<MoviePage, Error> {
        self.metadata
            .top_rated(page)
            .await
            .map_err(map_gateway_error)
    }

    async fn by_genre(&self, genre_id: GenreId, page: u32) -> Result<MoviePage, Error> {
        self.metadata
            .by_genre(genre_id, page)
            .await
            .map_err(map_gateway_error)
    }

    async fn movie(&self, id: TmdbId) -> Result<Option<MovieProfile>, Error> {
        let (details, credits, external_ids) = future::join3(
            self.metadata.details(id),
            self.metadata.credits(id),
            self.metadata.external_ids(id),
        )
        .await;

        // A missing title settles the aggregate before the companion
        // lookups are consulted; their errors for an absent id are noise.
        let Some(details) = details.map_err(map_gateway_error)? else {
            return Ok(None);
        };

        Ok(Some(MovieProfile {
            details,
            credits: credits.map_err(map_gateway_error)?,
            external_ids: external_ids.map_err(map_gateway_error)?,
        }))
    }
}

#[cfg(test)]
#[path = "movie_catalog_service_tests.rs"]
mod tests;
