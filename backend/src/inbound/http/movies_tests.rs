//! Endpoint tests for the movie catalog routes.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::Value;

use super::{by_genre, movie_detail, search, top_rated, trending};
use crate::domain::Error;
use crate::domain::ports::MockMovieCatalogQuery;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::fixture_state_ports;

fn test_app(
    ports: HttpStatePorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    // Literal /movies routes go before /movies/{id} so the path
    // parameter does not capture them.
    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .service(
            web::scope("/api/v1")
                .service(search)
                .service(trending)
                .service(top_rated)
                .service(by_genre)
                .service(movie_detail),
        )
}

async fn get_json<S>(app: &S, uri: &str, expected: StatusCode) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = actix_test::TestRequest::get().uri(uri).to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), expected, "status for {uri}");
    actix_test::read_body_json(response).await
}

#[actix_web::test]
async fn search_returns_matching_titles() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/search?query=matrix", StatusCode::OK).await;

    assert_eq!(body.get("page").and_then(Value::as_u64), Some(1));
    assert_eq!(body.get("totalResults").and_then(Value::as_u64), Some(1));
    assert!(body.get("total_results").is_none());
    let results = body
        .get("results")
        .and_then(Value::as_array)
        .expect("results array");
    assert_eq!(results.len(), 1);

    let hit = &results[0];
    assert_eq!(hit.get("tmdbId").and_then(Value::as_i64), Some(603));
    assert_eq!(hit.get("title").and_then(Value::as_str), Some("The Matrix"));
    assert_eq!(
        hit.get("posterPath").and_then(Value::as_str),
        Some("/f89U3ADr1oiB1s9GkdPOEpXUk5H.jpg")
    );
    assert_eq!(
        hit.get("releaseDate").and_then(Value::as_str),
        Some("1999-03-31")
    );
    assert_eq!(
        hit.get("genreIds").cloned(),
        Some(serde_json::json!([28, 878]))
    );
    assert_eq!(hit.get("adult").and_then(Value::as_bool), Some(false));
}

#[rstest]
#[case("/api/v1/search")]
#[case("/api/v1/search?query=%20%20")]
#[actix_web::test]
async fn blank_search_returns_an_empty_page(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, uri, StatusCode::OK).await;

    assert_eq!(body.get("page").and_then(Value::as_u64), Some(1));
    assert_eq!(
        body.get("results").and_then(Value::as_array).map(Vec::len),
        Some(0)
    );
    assert_eq!(body.get("totalPages").and_then(Value::as_u64), Some(0));
    assert_eq!(body.get("totalResults").and_then(Value::as_u64), Some(0));
}

#[actix_web::test]
async fn trending_defaults_to_the_daily_window() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/movies/trending", StatusCode::OK).await;

    let results = body
        .get("results")
        .and_then(Value::as_array)
        .expect("results array");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].get("tmdbId").and_then(Value::as_i64), Some(550));
    assert_eq!(results[1].get("tmdbId").and_then(Value::as_i64), Some(603));
}

#[actix_web::test]
async fn trending_accepts_the_weekly_window() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(
        &app,
        "/api/v1/movies/trending?period=week&page=1",
        StatusCode::OK,
    )
    .await;

    assert_eq!(body.get("totalResults").and_then(Value::as_u64), Some(2));
}

#[actix_web::test]
async fn top_rated_lists_the_catalog() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/movies/top-rated", StatusCode::OK).await;

    let results = body
        .get("results")
        .and_then(Value::as_array)
        .expect("results array");
    assert_eq!(results.len(), 2);
}

#[actix_web::test]
async fn genre_discovery_filters_titles() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/movies/genre/28", StatusCode::OK).await;

    let results = body
        .get("results")
        .and_then(Value::as_array)
        .expect("results array");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].get("tmdbId").and_then(Value::as_i64), Some(603));
}

#[actix_web::test]
async fn movie_detail_aggregates_details_credits_and_external_ids() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/movies/550", StatusCode::OK).await;

    let details = body.get("details").expect("details present");
    assert_eq!(
        details.get("title").and_then(Value::as_str),
        Some("Fight Club")
    );
    assert_eq!(details.get("tmdbId").and_then(Value::as_i64), Some(550));
    assert_eq!(details.get("runtime").and_then(Value::as_u64), Some(139));
    assert_eq!(
        details.get("tagline").and_then(Value::as_str),
        Some("Mischief. Mayhem. Soap.")
    );
    let genres = details
        .get("genres")
        .and_then(Value::as_array)
        .expect("genres array");
    assert_eq!(genres[0].get("name").and_then(Value::as_str), Some("Drama"));

    let credits = body.get("credits").expect("credits present");
    let cast = credits
        .get("cast")
        .and_then(Value::as_array)
        .expect("cast array");
    assert_eq!(
        cast[0].get("name").and_then(Value::as_str),
        Some("Edward Norton")
    );
    assert_eq!(
        cast[0].get("character").and_then(Value::as_str),
        Some("The Narrator")
    );
    let crew = credits
        .get("crew")
        .and_then(Value::as_array)
        .expect("crew array");
    assert_eq!(
        crew[0].get("job").and_then(Value::as_str),
        Some("Director")
    );

    let external_ids = body.get("externalIds").expect("external ids present");
    assert!(body.get("external_ids").is_none());
    assert_eq!(
        external_ids.get("imdbId").and_then(Value::as_str),
        Some("tt0137523")
    );
}

#[actix_web::test]
async fn movie_detail_reports_unknown_titles_as_not_found() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, "/api/v1/movies/27205", StatusCode::NOT_FOUND).await;

    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("movie 27205 not found")
    );
}

#[rstest]
#[case("/api/v1/movies/trending?period=month", "period", "invalid_period", "month")]
#[case("/api/v1/movies/top-rated?page=0", "page", "out_of_range", "0")]
#[case("/api/v1/movies/trending?page=abc", "page", "invalid_number", "abc")]
#[case("/api/v1/movies/genre/drama", "genreId", "invalid_number", "drama")]
#[case("/api/v1/movies/abc", "id", "invalid_number", "abc")]
#[case("/api/v1/movies/0", "id", "out_of_range", "0")]
#[actix_web::test]
async fn invalid_catalog_parameters_carry_field_details(
    #[case] uri: &str,
    #[case] field: &str,
    #[case] code: &str,
    #[case] value: &str,
) {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;

    let body = get_json(&app, uri, StatusCode::BAD_REQUEST).await;

    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("invalid_request")
    );
    let details = body
        .get("details")
        .and_then(Value::as_object)
        .expect("details present");
    assert_eq!(details.get("field").and_then(Value::as_str), Some(field));
    assert_eq!(details.get("code").and_then(Value::as_str), Some(code));
    assert_eq!(details.get("value").and_then(Value::as_str), Some(value));
}

#[actix_web::test]
async fn catalog_outage_surfaces_as_service_unavailable() {
    let mut catalog = MockMovieCatalogQuery::new();
    catalog.expect_trending().returning(|_, _| {
        Err(Error::service_unavailable(
            "metadata provider unavailable: socket closed",
        ))
    });
    let mut ports = fixture_state_ports();
    ports.catalog = Arc::new(catalog);

    let app = actix_test::init_service(test_app(ports)).await;

    let body = get_json(
        &app,
        "/api/v1/movies/trending",
        StatusCode::SERVICE_UNAVAILABLE,
    )
    .await;

    assert_eq!(
        body.get("code").and_then(Value::as_str),
        Some("service_unavailable")
    );
}
