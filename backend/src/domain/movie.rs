//! Movie catalog read models.
//!
//! These types mirror what the external metadata provider returns, translated
//! into domain vocabulary at the adapter boundary. Nothing here is persisted;
//! watchlists store only the catalog id and item kind.

use std::fmt;
use std::str::FromStr;

use crate::domain::watchlist::TmdbId;

/// Base URL for poster images at the width the UI renders.
pub const POSTER_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Build a full poster image URL from a provider poster path.
///
/// Provider paths begin with a slash, e.g. `/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg`.
#[must_use]
pub fn poster_url(poster_path: &str) -> String {
    format!("{POSTER_BASE_URL}{poster_path}")
}

/// Genre identifier owned by the external catalog and passed through as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenreId(i32);

impl GenreId {
    /// Wrap a raw catalog genre id.
    #[must_use]
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    /// Access the raw numeric value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for GenreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when parsing an unknown trending period string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTrendingPeriodError {
    /// The unrecognised input value.
    pub input: String,
}

impl fmt::Display for ParseTrendingPeriodError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown trending period: {}", self.input)
    }
}

impl std::error::Error for ParseTrendingPeriodError {}

/// Window over which the catalog ranks trending titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrendingPeriod {
    /// Trending over the last day.
    #[default]
    Day,
    /// Trending over the last week.
    Week,
}

impl TrendingPeriod {
    /// Returns the provider path segment for this period.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
        }
    }
}

impl fmt::Display for TrendingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendingPeriod {
    type Err = ParseTrendingPeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            _ => Err(ParseTrendingPeriodError {
                input: s.to_owned(),
            }),
        }
    }
}

/// A movie as it appears in search, trending, and discovery lists.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieSummary {
    /// Catalog identifier.
    pub tmdb_id: TmdbId,
    /// Display title.
    pub title: String,
    /// Short synopsis, absent when the catalog has none.
    pub overview: Option<String>,
    /// Poster path relative to the image host.
    pub poster_path: Option<String>,
    /// Backdrop path relative to the image host.
    pub backdrop_path: Option<String>,
    /// Release date as provided, `YYYY-MM-DD`; absent when unannounced.
    pub release_date: Option<String>,
    /// Catalog genre ids.
    pub genre_ids: Vec<GenreId>,
    /// Average rating on the provider's 0 to 10 scale.
    pub vote_average: f64,
    /// Number of ratings behind the average.
    pub vote_count: u32,
    /// Provider popularity score.
    pub popularity: f64,
    /// ISO 639-1 language of the original release.
    pub original_language: Option<String>,
    /// Title in the original release language.
    pub original_title: Option<String>,
    /// Whether the catalog flags this title as adult content.
    pub adult: bool,
}

/// One page of movie summaries with the provider's paging counters.
#[derive(Debug, Clone, PartialEq)]
pub struct MoviePage {
    /// 1-based page number.
    pub page: u32,
    /// Summaries on this page.
    pub results: Vec<MovieSummary>,
    /// Total pages available.
    pub total_pages: u32,
    /// Total results across all pages.
    pub total_results: u32,
}

impl MoviePage {
    /// The page returned without consulting the catalog, e.g. for a blank
    /// search query.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }
}

/// A named catalog genre.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Genre {
    /// Catalog genre id.
    pub id: GenreId,
    /// Display name.
    pub name: String,
}

/// Full detail record for a single title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetails {
    /// The list-level fields for this title.
    pub summary: MovieSummary,
    /// Named genres, resolved from the id list.
    pub genres: Vec<Genre>,
    /// Runtime in minutes, absent when the catalog has none.
    pub runtime: Option<u32>,
    /// Marketing tagline.
    pub tagline: Option<String>,
    /// Official site URL.
    pub homepage: Option<String>,
}

/// A credited cast appearance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastMember {
    /// Catalog person id.
    pub person_id: i32,
    /// Performer name.
    pub name: String,
    /// Character played.
    pub character: String,
    /// Profile image path relative to the image host.
    pub profile_path: Option<String>,
    /// Billing order, 0 first.
    pub order: u32,
}

/// A credited crew role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrewMember {
    /// Catalog person id.
    pub person_id: i32,
    /// Crew member name.
    pub name: String,
    /// Specific job, e.g. `Director`.
    pub job: String,
    /// Department, e.g. `Directing`.
    pub department: String,
    /// Profile image path relative to the image host.
    pub profile_path: Option<String>,
}

/// Cast and crew for a title.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Credits {
    /// Cast in billing order.
    pub cast: Vec<CastMember>,
    /// Crew in provider order.
    pub crew: Vec<CrewMember>,
}

/// Identifiers for this title on other services.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExternalIds {
    /// IMDb title id, e.g. `tt0137523`.
    pub imdb_id: Option<String>,
    /// Facebook page id.
    pub facebook_id: Option<String>,
    /// Instagram handle.
    pub instagram_id: Option<String>,
    /// Twitter handle.
    pub twitter_id: Option<String>,
}

/// The detail-page aggregate: details plus credits plus external ids.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieProfile {
    /// Full detail record.
    pub details: MovieDetails,
    /// Cast and crew.
    pub credits: Credits,
    /// Cross-service identifiers.
    pub external_ids: ExternalIds,
}
