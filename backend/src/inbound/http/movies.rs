//! Movie catalog API handlers.
//!
//! ```text
//! GET /api/v1/search?query=&page=
//! GET /api/v1/movies/trending?period=&page=
//! GET /api/v1/movies/top-rated?page=
//! GET /api/v1/movies/genre/{genreId}?page=
//! GET /api/v1/movies/{id}
//! ```
//!
//! Browse and search are public; no session is consulted. The literal
//! `/movies/...` routes must be registered before `/movies/{id}` so the
//! path parameter does not swallow them.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::movie::{
    CastMember, Credits, CrewMember, ExternalIds, Genre, MovieDetails, MoviePage, MovieProfile,
    MovieSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_genre_id_segment, parse_page, parse_tmdb_id_segment, parse_trending_period,
};

const PAGE_FIELD: FieldName = FieldName::new("page");
const PERIOD_FIELD: FieldName = FieldName::new("period");
const GENRE_ID_FIELD: FieldName = FieldName::new("genreId");
const MOVIE_ID_FIELD: FieldName = FieldName::new("id");

/// A movie as listed by search, trending, and discovery responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummaryBody {
    #[schema(example = 550)]
    pub tmdb_id: i32,
    #[schema(example = "Fight Club")]
    pub title: String,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    #[schema(format = "date", example = "1999-10-15")]
    pub release_date: Option<String>,
    pub genre_ids: Vec<i32>,
    pub vote_average: f64,
    pub vote_count: u32,
    pub popularity: f64,
    pub original_language: Option<String>,
    pub original_title: Option<String>,
    pub adult: bool,
}

impl From<MovieSummary> for MovieSummaryBody {
    fn from(summary: MovieSummary) -> Self {
        Self {
            tmdb_id: summary.tmdb_id.as_i32(),
            title: summary.title,
            overview: summary.overview,
            poster_path: summary.poster_path,
            backdrop_path: summary.backdrop_path,
            release_date: summary.release_date,
            genre_ids: summary.genre_ids.iter().map(|id| id.as_i32()).collect(),
            vote_average: summary.vote_average,
            vote_count: summary.vote_count,
            popularity: summary.popularity,
            original_language: summary.original_language,
            original_title: summary.original_title,
            adult: summary.adult,
        }
    }
}

/// One page of results with the catalog's paging counters.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoviePageBody {
    pub page: u32,
    pub results: Vec<MovieSummaryBody>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl From<MoviePage> for MoviePageBody {
    fn from(page: MoviePage) -> Self {
        Self {
            page: page.page,
            results: page.results.into_iter().map(Into::into).collect(),
            total_pages: page.total_pages,
            total_results: page.total_results,
        }
    }
}

/// A named catalog genre.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenreBody {
    pub id: i32,
    #[schema(example = "Drama")]
    pub name: String,
}

impl From<Genre> for GenreBody {
    fn from(genre: Genre) -> Self {
        Self {
            id: genre.id.as_i32(),
            name: genre.name,
        }
    }
}

/// Full detail record for one title.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieDetailsBody {
    #[serde(flatten)]
    pub summary: MovieSummaryBody,
    pub genres: Vec<GenreBody>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub homepage: Option<String>,
}

impl From<MovieDetails> for MovieDetailsBody {
    fn from(details: MovieDetails) -> Self {
        Self {
            summary: details.summary.into(),
            genres: details.genres.into_iter().map(Into::into).collect(),
            runtime: details.runtime,
            tagline: details.tagline,
            homepage: details.homepage,
        }
    }
}

/// A credited cast appearance.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CastMemberBody {
    pub id: i32,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: u32,
}

impl From<CastMember> for CastMemberBody {
    fn from(member: CastMember) -> Self {
        Self {
            id: member.person_id,
            name: member.name,
            character: member.character,
            profile_path: member.profile_path,
            order: member.order,
        }
    }
}

/// A credited crew role.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrewMemberBody {
    pub id: i32,
    pub name: String,
    #[schema(example = "Director")]
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

impl From<CrewMember> for CrewMemberBody {
    fn from(member: CrewMember) -> Self {
        Self {
            id: member.person_id,
            name: member.name,
            job: member.job,
            department: member.department,
            profile_path: member.profile_path,
        }
    }
}

/// Cast and crew for one title.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreditsBody {
    pub cast: Vec<CastMemberBody>,
    pub crew: Vec<CrewMemberBody>,
}

impl From<Credits> for CreditsBody {
    fn from(credits: Credits) -> Self {
        Self {
            cast: credits.cast.into_iter().map(Into::into).collect(),
            crew: credits.crew.into_iter().map(Into::into).collect(),
        }
    }
}

/// Identifiers for one title on other services.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExternalIdsBody {
    #[schema(example = "tt0137523")]
    pub imdb_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
}

impl From<ExternalIds> for ExternalIdsBody {
    fn from(ids: ExternalIds) -> Self {
        Self {
            imdb_id: ids.imdb_id,
            facebook_id: ids.facebook_id,
            instagram_id: ids.instagram_id,
            twitter_id: ids.twitter_id,
        }
    }
}

/// The detail-page aggregate for `GET /api/v1/movies/{id}`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovieProfileBody {
    pub details: MovieDetailsBody,
    pub credits: CreditsBody,
    pub external_ids: ExternalIdsBody,
}

impl From<MovieProfile> for MovieProfileBody {
    fn from(profile: MovieProfile) -> Self {
        Self {
            details: profile.details.into(),
            credits: profile.credits.into(),
            external_ids: profile.external_ids.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    query: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TrendingParams {
    period: Option<String>,
    page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    page: Option<String>,
}

/// Search titles by free text.
///
/// A blank query responds with an empty page without consulting the
/// catalog.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    params(
        ("query" = Option<String>, Query, description = "Free text to search for"),
        ("page" = Option<u32>, Query, description = "1-based result page, default 1")
    ),
    responses(
        (status = 200, description = "Search results", body = MoviePageBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "searchMovies",
    security([])
)]
#[get("/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<MoviePageBody>> {
    let params = params.into_inner();
    let page = parse_page(params.page, PAGE_FIELD)?;
    let query = params.query.unwrap_or_default();
    let results = state.catalog.search(&query, page).await?;
    Ok(web::Json(results.into()))
}

/// List titles trending over the last day or week.
#[utoipa::path(
    get,
    path = "/api/v1/movies/trending",
    params(
        ("period" = Option<String>, Query, description = "`day` or `week`, default `day`"),
        ("page" = Option<u32>, Query, description = "1-based result page, default 1")
    ),
    responses(
        (status = 200, description = "Trending titles", body = MoviePageBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "getTrendingMovies",
    security([])
)]
#[get("/movies/trending")]
pub async fn trending(
    state: web::Data<HttpState>,
    params: web::Query<TrendingParams>,
) -> ApiResult<web::Json<MoviePageBody>> {
    let params = params.into_inner();
    let period = parse_trending_period(params.period, PERIOD_FIELD)?;
    let page = parse_page(params.page, PAGE_FIELD)?;
    let results = state.catalog.trending(period, page).await?;
    Ok(web::Json(results.into()))
}

/// List the catalog's top rated titles.
#[utoipa::path(
    get,
    path = "/api/v1/movies/top-rated",
    params(("page" = Option<u32>, Query, description = "1-based result page, default 1")),
    responses(
        (status = 200, description = "Top rated titles", body = MoviePageBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "getTopRatedMovies",
    security([])
)]
#[get("/movies/top-rated")]
pub async fn top_rated(
    state: web::Data<HttpState>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<MoviePageBody>> {
    let page = parse_page(params.into_inner().page, PAGE_FIELD)?;
    let results = state.catalog.top_rated(page).await?;
    Ok(web::Json(results.into()))
}

/// Discover titles carrying the given genre.
#[utoipa::path(
    get,
    path = "/api/v1/movies/genre/{genreId}",
    params(
        ("genreId" = i32, Path, description = "Catalog genre id"),
        ("page" = Option<u32>, Query, description = "1-based result page, default 1")
    ),
    responses(
        (status = 200, description = "Titles in the genre", body = MoviePageBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "getMoviesByGenre",
    security([])
)]
#[get("/movies/genre/{genreId}")]
pub async fn by_genre(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    params: web::Query<PageParams>,
) -> ApiResult<web::Json<MoviePageBody>> {
    let genre_id = parse_genre_id_segment(&path.into_inner(), GENRE_ID_FIELD)?;
    let page = parse_page(params.into_inner().page, PAGE_FIELD)?;
    let results = state.catalog.by_genre(genre_id, page).await?;
    Ok(web::Json(results.into()))
}

/// Fetch the detail aggregate for one title.
#[utoipa::path(
    get,
    path = "/api/v1/movies/{id}",
    params(("id" = i32, Path, description = "Catalog id of the title")),
    responses(
        (status = 200, description = "Detail aggregate", body = MovieProfileBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "No such title in the catalog", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "Catalog unavailable", body = Error)
    ),
    tags = ["movies"],
    operation_id = "getMovie",
    security([])
)]
#[get("/movies/{id}")]
pub async fn movie_detail(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<MovieProfileBody>> {
    let tmdb_id = parse_tmdb_id_segment(&path.into_inner(), MOVIE_ID_FIELD)?;
    let profile = state
        .catalog
        .movie(tmdb_id)
        .await?
        .ok_or_else(|| Error::not_found(format!("movie {tmdb_id} not found")))?;
    Ok(web::Json(profile.into()))
}

#[cfg(test)]
#[path = "movies_tests.rs"]
mod tests;
