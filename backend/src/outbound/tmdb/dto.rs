//! DTOs for decoding TMDB JSON responses.
//!
//! The adapter decodes into these transport DTOs first, then maps into domain
//! records in one pass. Fields the provider omits or nulls are defaulted so
//! one sparse result does not fail a whole page.

use serde::Deserialize;

use crate::domain::movie::{
    CastMember, Credits, CrewMember, ExternalIds, Genre, GenreId, MovieDetails, MoviePage,
    MovieSummary,
};
use crate::domain::watchlist::TmdbId;

#[derive(Debug, Deserialize)]
pub(super) struct ListResponseDto {
    pub(super) page: u32,
    #[serde(default)]
    pub(super) results: Vec<MovieSummaryDto>,
    pub(super) total_pages: u32,
    pub(super) total_results: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct MovieSummaryDto {
    pub(super) id: i32,
    pub(super) title: String,
    #[serde(default)]
    pub(super) overview: Option<String>,
    #[serde(default)]
    pub(super) poster_path: Option<String>,
    #[serde(default)]
    pub(super) backdrop_path: Option<String>,
    #[serde(default)]
    pub(super) release_date: Option<String>,
    #[serde(default)]
    pub(super) genre_ids: Vec<i32>,
    #[serde(default)]
    pub(super) vote_average: f64,
    #[serde(default)]
    pub(super) vote_count: u32,
    #[serde(default)]
    pub(super) popularity: f64,
    #[serde(default)]
    pub(super) original_language: Option<String>,
    #[serde(default)]
    pub(super) original_title: Option<String>,
    #[serde(default)]
    pub(super) adult: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct MovieDetailsDto {
    #[serde(flatten)]
    pub(super) summary: MovieSummaryDto,
    #[serde(default)]
    pub(super) genres: Vec<GenreDto>,
    #[serde(default)]
    pub(super) runtime: Option<u32>,
    #[serde(default)]
    pub(super) tagline: Option<String>,
    #[serde(default)]
    pub(super) homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GenreDto {
    pub(super) id: i32,
    pub(super) name: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct CreditsDto {
    #[serde(default)]
    pub(super) cast: Vec<CastMemberDto>,
    #[serde(default)]
    pub(super) crew: Vec<CrewMemberDto>,
}

#[derive(Debug, Deserialize)]
pub(super) struct CastMemberDto {
    pub(super) id: i32,
    pub(super) name: String,
    #[serde(default)]
    pub(super) character: String,
    #[serde(default)]
    pub(super) profile_path: Option<String>,
    #[serde(default)]
    pub(super) order: u32,
}

#[derive(Debug, Deserialize)]
pub(super) struct CrewMemberDto {
    pub(super) id: i32,
    pub(super) name: String,
    #[serde(default)]
    pub(super) job: String,
    #[serde(default)]
    pub(super) department: String,
    #[serde(default)]
    pub(super) profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ExternalIdsDto {
    #[serde(default)]
    pub(super) imdb_id: Option<String>,
    #[serde(default)]
    pub(super) facebook_id: Option<String>,
    #[serde(default)]
    pub(super) instagram_id: Option<String>,
    #[serde(default)]
    pub(super) twitter_id: Option<String>,
}

/// Drop the provider's empty-string placeholders for absent text fields.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.is_empty())
}

impl ListResponseDto {
    pub(super) fn into_domain_page(self) -> Result<MoviePage, String> {
        let results = self
            .results
            .into_iter()
            .map(MovieSummaryDto::into_domain_summary)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(MoviePage {
            page: self.page,
            results,
            total_pages: self.total_pages,
            total_results: self.total_results,
        })
    }
}

impl MovieSummaryDto {
    fn into_domain_summary(self) -> Result<MovieSummary, String> {
        let tmdb_id = TmdbId::try_new(self.id)
            .map_err(|error| format!("movie {} has an invalid id: {error}", self.id))?;
        Ok(MovieSummary {
            tmdb_id,
            title: self.title,
            overview: non_empty(self.overview),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            release_date: non_empty(self.release_date),
            genre_ids: self.genre_ids.into_iter().map(GenreId::new).collect(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            popularity: self.popularity,
            original_language: self.original_language,
            original_title: self.original_title,
            adult: self.adult,
        })
    }
}

impl MovieDetailsDto {
    pub(super) fn into_domain_details(self) -> Result<MovieDetails, String> {
        let genres: Vec<Genre> = self.genres.into_iter().map(GenreDto::into_domain).collect();
        let mut summary = self.summary.into_domain_summary()?;
        // Detail payloads carry full genre objects instead of genre_ids.
        if summary.genre_ids.is_empty() {
            summary.genre_ids = genres.iter().map(|genre| genre.id).collect();
        }
        Ok(MovieDetails {
            summary,
            genres,
            runtime: self.runtime,
            tagline: non_empty(self.tagline),
            homepage: non_empty(self.homepage),
        })
    }
}

impl GenreDto {
    fn into_domain(self) -> Genre {
        Genre {
            id: GenreId::new(self.id),
            name: self.name,
        }
    }
}

impl CreditsDto {
    pub(super) fn into_domain_credits(self) -> Credits {
        Credits {
            cast: self.cast.into_iter().map(CastMemberDto::into_domain).collect(),
            crew: self.crew.into_iter().map(CrewMemberDto::into_domain).collect(),
        }
    }
}

impl CastMemberDto {
    fn into_domain(self) -> CastMember {
        CastMember {
            person_id: self.id,
            name: self.name,
            character: self.character,
            profile_path: self.profile_path,
            order: self.order,
        }
    }
}

impl CrewMemberDto {
    fn into_domain(self) -> CrewMember {
        CrewMember {
            person_id: self.id,
            name: self.name,
            job: self.job,
            department: self.department,
            profile_path: self.profile_path,
        }
    }
}

impl ExternalIdsDto {
    pub(super) fn into_domain_external_ids(self) -> ExternalIds {
        ExternalIds {
            imdb_id: self.imdb_id,
            facebook_id: self.facebook_id,
            instagram_id: self.instagram_id,
            twitter_id: self.twitter_id,
        }
    }
}
