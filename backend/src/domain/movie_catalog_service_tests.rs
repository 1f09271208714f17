//! Tests for the catalog browse and search service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::movie::{Credits, ExternalIds, MovieDetails, MovieSummary};
use crate::domain::ports::MockMovieMetadataGateway;

fn tmdb_id(raw: i32) -> TmdbId {
    TmdbId::try_new(raw).expect("valid id")
}

fn summary(raw_id: i32, title: &str) -> MovieSummary {
    MovieSummary {
        tmdb_id: tmdb_id(raw_id),
        title: title.to_owned(),
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: None,
        genre_ids: Vec::new(),
        vote_average: 7.5,
        vote_count: 100,
        popularity: 10.0,
        original_language: None,
        original_title: None,
        adult: false,
    }
}

fn details(raw_id: i32, title: &str) -> MovieDetails {
    MovieDetails {
        summary: summary(raw_id, title),
        genres: Vec::new(),
        runtime: Some(120),
        tagline: None,
        homepage: None,
    }
}

fn one_result_page(raw_id: i32, title: &str) -> MoviePage {
    MoviePage {
        page: 1,
        results: vec![summary(raw_id, title)],
        total_pages: 1,
        total_results: 1,
    }
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("\t\n")]
#[tokio::test]
async fn blank_search_short_circuits_without_gateway_call(#[case] query: &str) {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata.expect_search().times(0);

    let service = MovieCatalogService::new(Arc::new(metadata));
    let page = service.search(query, 1).await.expect("search succeeds");

    assert_eq!(page.page, 1);
    assert!(page.results.is_empty());
    assert_eq!(page.total_pages, 0);
    assert_eq!(page.total_results, 0);
}

#[tokio::test]
async fn search_delegates_non_blank_queries() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_search()
        .times(1)
        .withf(|query, page| query == "fight club" && *page == 2)
        .return_once(|_, _| Ok(one_result_page(550, "Fight Club")));

    let service = MovieCatalogService::new(Arc::new(metadata));
    let page = service
        .search("fight club", 2)
        .await
        .expect("search succeeds");

    assert_eq!(page.results.len(), 1);
    assert_eq!(page.results[0].title, "Fight Club");
}

#[tokio::test]
async fn search_maps_rate_limit_to_service_unavailable() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_search()
        .times(1)
        .return_once(|_, _| Err(MetadataGatewayError::rate_limited("slow down")));

    let service = MovieCatalogService::new(Arc::new(metadata));
    let error = service
        .search("fight club", 1)
        .await
        .expect_err("rate limit surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn trending_passes_period_through() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_trending()
        .times(1)
        .withf(|period, page| *period == TrendingPeriod::Week && *page == 1)
        .return_once(|_, _| Ok(one_result_page(603, "The Matrix")));

    let service = MovieCatalogService::new(Arc::new(metadata));
    let page = service
        .trending(TrendingPeriod::Week, 1)
        .await
        .expect("trending succeeds");

    assert_eq!(page.results[0].tmdb_id.as_i32(), 603);
}

#[tokio::test]
async fn top_rated_and_genre_lists_delegate() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_top_rated()
        .times(1)
        .return_once(|_| Ok(one_result_page(550, "Fight Club")));
    metadata
        .expect_by_genre()
        .times(1)
        .withf(|genre_id, _| genre_id.as_i32() == 18)
        .return_once(|_, _| Ok(one_result_page(550, "Fight Club")));

    let service = MovieCatalogService::new(Arc::new(metadata));

    let top = service.top_rated(1).await.expect("top rated succeeds");
    assert_eq!(top.results.len(), 1);

    let drama = service
        .by_genre(GenreId::new(18), 1)
        .await
        .expect("discovery succeeds");
    assert_eq!(drama.results.len(), 1);
}

#[tokio::test]
async fn movie_aggregates_three_lookups() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_details()
        .times(1)
        .return_once(|_| Ok(Some(details(550, "Fight Club"))));
    metadata
        .expect_credits()
        .times(1)
        .return_once(|_| Ok(Credits::default()));
    metadata
        .expect_external_ids()
        .times(1)
        .return_once(|_| {
            Ok(ExternalIds {
                imdb_id: Some("tt0137523".to_owned()),
                ..ExternalIds::default()
            })
        });

    let service = MovieCatalogService::new(Arc::new(metadata));
    let profile = service
        .movie(tmdb_id(550))
        .await
        .expect("aggregate succeeds")
        .expect("title exists");

    assert_eq!(profile.details.summary.title, "Fight Club");
    assert_eq!(profile.external_ids.imdb_id.as_deref(), Some("tt0137523"));
}

#[tokio::test]
async fn movie_returns_none_when_catalog_has_no_title() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata.expect_details().times(1).return_once(|_| Ok(None));
    metadata
        .expect_credits()
        .times(1)
        .return_once(|_| Err(MetadataGatewayError::invalid_request("404 for credits")));
    metadata
        .expect_external_ids()
        .times(1)
        .return_once(|_| Err(MetadataGatewayError::invalid_request("404 for external ids")));

    let service = MovieCatalogService::new(Arc::new(metadata));
    let profile = service
        .movie(tmdb_id(999_999))
        .await
        .expect("absent title is data, not an error");

    assert!(profile.is_none());
}

#[tokio::test]
async fn movie_surfaces_companion_lookup_failures_for_existing_titles() {
    let mut metadata = MockMovieMetadataGateway::new();
    metadata
        .expect_details()
        .times(1)
        .return_once(|_| Ok(Some(details(550, "Fight Club"))));
    metadata
        .expect_credits()
        .times(1)
        .return_once(|_| Err(MetadataGatewayError::transport("connection reset")));
    metadata
        .expect_external_ids()
        .times(1)
        .return_once(|_| Ok(ExternalIds::default()));

    let service = MovieCatalogService::new(Arc::new(metadata));
    let error = service
        .movie(tmdb_id(550))
        .await
        .expect_err("credits failure surfaces");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}
