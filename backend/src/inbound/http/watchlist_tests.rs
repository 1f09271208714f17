//! Endpoint tests for the watchlist routes.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::{add_watchlist_item, get_watchlist, remove_watchlist_item};
use crate::domain::Error;
use crate::domain::ports::{MockWatchlistCommand, MockWatchlistQuery};
use crate::inbound::http::auth::{LoginRequest, login};
use crate::inbound::http::onboarding::complete_onboarding;
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::inbound::http::test_utils::{fixture_state_ports, test_session_middleware};

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
    App::new()
        .app_data(web::Data::new(HttpState::new(ports)))
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(login)
                .service(complete_onboarding)
                .service(get_watchlist)
                .service(add_watchlist_item)
                .service(remove_watchlist_item),
        )
}

fn session_cookie(res: &actix_web::dev::ServiceResponse) -> actix_web::cookie::Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn login_cookie<S>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: "admin".into(),
            password: "password".into(),
        })
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success());
    session_cookie(&response)
}

/// Log in and complete onboarding, returning the cookie carrying the
/// onboarded session state.
async fn onboarded_cookie<S>(app: &S) -> actix_web::cookie::Cookie<'static>
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let cookie = login_cookie(app).await;
    let request = actix_test::TestRequest::post()
        .uri("/api/v1/onboarding")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert!(response.status().is_success());
    session_cookie(&response)
}

#[actix_web::test]
async fn watchlist_read_returns_enriched_items() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/watchlist")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;

    assert_eq!(body.get("id").and_then(Value::as_i64), Some(10));
    assert_eq!(
        body.get("name").and_then(Value::as_str),
        Some("My Watchlist")
    );
    let items = body
        .get("items")
        .and_then(Value::as_array)
        .expect("items array");
    assert_eq!(items.len(), 2);

    let first = &items[0];
    assert_eq!(first.get("tmdbId").and_then(Value::as_i64), Some(550));
    assert!(first.get("tmdb_id").is_none());
    assert_eq!(first.get("itemType").and_then(Value::as_str), Some("movie"));
    assert_eq!(first.get("addedByUserId").and_then(Value::as_i64), Some(1));
    assert_eq!(
        first.get("title").and_then(Value::as_str),
        Some("Fight Club")
    );
    assert_eq!(
        first.get("posterUrl").and_then(Value::as_str),
        Some("https://image.tmdb.org/t/p/w500/pB8BM7pdSp6B6Ih7QZ4DrQ3PmJK.jpg")
    );
    assert_eq!(
        items[1].get("title").and_then(Value::as_str),
        Some("The Matrix")
    );
}

#[actix_web::test]
async fn watchlist_read_without_onboarding_is_unauthorised() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = login_cookie(&app).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/watchlist")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("onboarding required")
    );
}

#[actix_web::test]
async fn missing_watchlist_reads_as_null() {
    let mut query = MockWatchlistQuery::new();
    query.expect_watchlist_for_user().returning(|_| Ok(None));
    let mut ports = fixture_state_ports();
    ports.watchlist_query = Arc::new(query);

    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/watchlist")
        .cookie(cookie)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = actix_test::read_body(response).await;
    assert_eq!(body, "null");
}

#[actix_web::test]
async fn adding_a_new_title_returns_its_item_id() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(json!({ "tmdbId": 3000, "itemType": "movie" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "itemId": 3 }));
}

#[actix_web::test]
async fn adding_a_listed_title_is_a_conflict() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(json!({ "tmdbId": 550, "itemType": "movie" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("conflict"));
}

#[actix_web::test]
async fn removing_a_listed_title_returns_its_item_id() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(json!({ "tmdbId": 550, "itemType": "movie" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({ "itemId": 1 }));
}

#[actix_web::test]
async fn removing_an_unlisted_title_is_not_found() {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::delete()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(json!({ "tmdbId": 999, "itemType": "movie" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("not_found"));
}

#[actix_web::test]
async fn foreign_watchlist_mutation_is_forbidden() {
    let mut commands = MockWatchlistCommand::new();
    commands.expect_add_movie().returning(|_, _, _| {
        Err(Error::forbidden("user 1 may not modify watchlist 99"))
    });
    let mut ports = fixture_state_ports();
    ports.watchlist_commands = Arc::new(commands);

    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(json!({ "tmdbId": 550, "itemType": "movie" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));
}

#[rstest]
#[case(json!({}), "tmdbId", "missing_field")]
#[case(json!({ "tmdbId": 0, "itemType": "movie" }), "tmdbId", "out_of_range")]
#[case(json!({ "tmdbId": 550 }), "itemType", "missing_field")]
#[case(
    json!({ "tmdbId": 550, "itemType": "Feature Film" }),
    "itemType",
    "invalid_item_kind"
)]
#[actix_web::test]
async fn invalid_item_payloads_carry_field_details(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] code: &str,
) {
    let app = actix_test::init_service(test_app(fixture_state_ports())).await;
    let cookie = onboarded_cookie(&app).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/watchlist/items")
        .cookie(cookie)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
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
}
