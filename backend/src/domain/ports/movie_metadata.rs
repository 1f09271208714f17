//! Driven port for the external movie metadata provider.
//!
//! The domain owns the lookup contract so services and handler tests stay
//! adapter-agnostic. "Title not found" is data (`Ok(None)`), not an error;
//! the error enum covers provider and transport failures only.

use async_trait::async_trait;

use crate::domain::movie::{
    Credits, ExternalIds, Genre, GenreId, MovieDetails, MoviePage, MovieSummary, TrendingPeriod,
};
use crate::domain::watchlist::TmdbId;

use super::define_port_error;

define_port_error! {
    /// Errors surfaced while calling the metadata provider.
    pub enum MetadataGatewayError {
        /// Network transport failed before receiving a response.
        Transport { message: String } =>
            "metadata gateway transport failed: {message}",
        /// Provider call exceeded timeout.
        Timeout { message: String } =>
            "metadata gateway timeout: {message}",
        /// Provider rate-limited the request.
        RateLimited { message: String } =>
            "metadata gateway rate limited request: {message}",
        /// Provider response could not be decoded.
        Decode { message: String } =>
            "metadata gateway response decode failed: {message}",
        /// Provider rejected the request.
        InvalidRequest { message: String } =>
            "metadata gateway request invalid: {message}",
    }
}

impl MetadataGatewayError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for read-only movie catalog lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MovieMetadataGateway: Send + Sync {
    /// Fetch the detail record for one title. `None` when the catalog has
    /// no such title.
    async fn details(&self, id: TmdbId) -> Result<Option<MovieDetails>, MetadataGatewayError>;

    /// Fetch cast and crew for one title.
    async fn credits(&self, id: TmdbId) -> Result<Credits, MetadataGatewayError>;

    /// Fetch cross-service identifiers for one title.
    async fn external_ids(&self, id: TmdbId) -> Result<ExternalIds, MetadataGatewayError>;

    /// Search titles by free text.
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, MetadataGatewayError>;

    /// List titles trending over the given period.
    async fn trending(
        &self,
        period: TrendingPeriod,
        page: u32,
    ) -> Result<MoviePage, MetadataGatewayError>;

    /// List the provider's top rated titles.
    async fn top_rated(&self, page: u32) -> Result<MoviePage, MetadataGatewayError>;

    /// Discover titles carrying the given genre.
    async fn by_genre(
        &self,
        genre_id: GenreId,
        page: u32,
    ) -> Result<MoviePage, MetadataGatewayError>;
}

/// Fixture gateway backed by a tiny canned catalog.
///
/// Serves two titles so dev mode and handler tests get plausible data
/// without network access. Unknown ids behave like absent titles.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureMovieMetadataGateway;

impl FixtureMovieMetadataGateway {
    /// Catalog ids of the canned titles.
    pub const TMDB_IDS: [i32; 2] = [550, 603];

    fn catalog() -> Result<Vec<MovieSummary>, MetadataGatewayError> {
        let id = |raw| {
            TmdbId::try_new(raw)
                .map_err(|err| MetadataGatewayError::decode(format!("invalid fixture id: {err}")))
        };
        Ok(vec![
            MovieSummary {
                tmdb_id: id(550)?,
                title: "Fight Club".to_owned(),
                overview: Some(
                    "An insomniac office worker and a soap maker form an underground club."
                        .to_owned(),
                ),
                poster_path: Some("/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg".to_owned()),
                backdrop_path: Some("/hZkgoQYus5vegHoetLkCJzb17zJ.jpg".to_owned()),
                release_date: Some("1999-10-15".to_owned()),
                genre_ids: vec![GenreId::new(18)],
                vote_average: 8.4,
                vote_count: 26_280,
                popularity: 61.4,
                original_language: Some("en".to_owned()),
                original_title: Some("Fight Club".to_owned()),
                adult: false,
            },
            MovieSummary {
                tmdb_id: id(603)?,
                title: "The Matrix".to_owned(),
                overview: Some(
                    "A hacker learns the world he knows is a simulation.".to_owned(),
                ),
                poster_path: Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg".to_owned()),
                backdrop_path: Some("/fNG7i7RqMErkcqhohV2a6cV1Ehy.jpg".to_owned()),
                release_date: Some("1999-03-31".to_owned()),
                genre_ids: vec![GenreId::new(28), GenreId::new(878)],
                vote_average: 8.2,
                vote_count: 24_100,
                popularity: 73.8,
                original_language: Some("en".to_owned()),
                original_title: Some("The Matrix".to_owned()),
                adult: false,
            },
        ])
    }

    fn page_of(results: Vec<MovieSummary>) -> MoviePage {
        let total_results = u32::try_from(results.len()).unwrap_or(u32::MAX);
        MoviePage {
            page: 1,
            total_pages: u32::from(total_results > 0),
            total_results,
            results,
        }
    }

    fn summary(id: TmdbId) -> Result<Option<MovieSummary>, MetadataGatewayError> {
        Ok(Self::catalog()?
            .into_iter()
            .find(|summary| summary.tmdb_id == id))
    }
}

#[async_trait]
impl MovieMetadataGateway for FixtureMovieMetadataGateway {
    async fn details(&self, id: TmdbId) -> Result<Option<MovieDetails>, MetadataGatewayError> {
        let Some(summary) = Self::summary(id)? else {
            return Ok(None);
        };
        let (genres, runtime, tagline) = match summary.tmdb_id.as_i32() {
            550 => (
                vec![Genre {
                    id: GenreId::new(18),
                    name: "Drama".to_owned(),
                }],
                Some(139),
                Some("Mischief. Mayhem. Soap.".to_owned()),
            ),
            _ => (
                vec![
                    Genre {
                        id: GenreId::new(28),
                        name: "Action".to_owned(),
                    },
                    Genre {
                        id: GenreId::new(878),
                        name: "Science Fiction".to_owned(),
                    },
                ],
                Some(136),
                Some("Welcome to the Real World.".to_owned()),
            ),
        };
        Ok(Some(MovieDetails {
            summary,
            genres,
            runtime,
            tagline,
            homepage: None,
        }))
    }

    async fn credits(&self, id: TmdbId) -> Result<Credits, MetadataGatewayError> {
        use crate::domain::movie::{CastMember, CrewMember};

        let credits = match id.as_i32() {
            550 => Credits {
                cast: vec![CastMember {
                    person_id: 819,
                    name: "Edward Norton".to_owned(),
                    character: "The Narrator".to_owned(),
                    profile_path: None,
                    order: 0,
                }],
                crew: vec![CrewMember {
                    person_id: 7467,
                    name: "David Fincher".to_owned(),
                    job: "Director".to_owned(),
                    department: "Directing".to_owned(),
                    profile_path: None,
                }],
            },
            603 => Credits {
                cast: vec![CastMember {
                    person_id: 6384,
                    name: "Keanu Reeves".to_owned(),
                    character: "Neo".to_owned(),
                    profile_path: None,
                    order: 0,
                }],
                crew: Vec::new(),
            },
            _ => Credits::default(),
        };
        Ok(credits)
    }

    async fn external_ids(&self, id: TmdbId) -> Result<ExternalIds, MetadataGatewayError> {
        let imdb_id = match id.as_i32() {
            550 => Some("tt0137523".to_owned()),
            603 => Some("tt0133093".to_owned()),
            _ => None,
        };
        Ok(ExternalIds {
            imdb_id,
            ..ExternalIds::default()
        })
    }

    async fn search(&self, query: &str, _page: u32) -> Result<MoviePage, MetadataGatewayError> {
        let needle = query.to_lowercase();
        let results = Self::catalog()?
            .into_iter()
            .filter(|summary| summary.title.to_lowercase().contains(&needle))
            .collect();
        Ok(Self::page_of(results))
    }

    async fn trending(
        &self,
        _period: TrendingPeriod,
        _page: u32,
    ) -> Result<MoviePage, MetadataGatewayError> {
        Ok(Self::page_of(Self::catalog()?))
    }

    async fn top_rated(&self, _page: u32) -> Result<MoviePage, MetadataGatewayError> {
        Ok(Self::page_of(Self::catalog()?))
    }

    async fn by_genre(
        &self,
        genre_id: GenreId,
        _page: u32,
    ) -> Result<MoviePage, MetadataGatewayError> {
        let results = Self::catalog()?
            .into_iter()
            .filter(|summary| summary.genre_ids.contains(&genre_id))
            .collect();
        Ok(Self::page_of(results))
    }
}
