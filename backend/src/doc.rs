//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI specification for the REST API. It
//! registers every HTTP endpoint from the inbound layer, the request and
//! response schemas they reference, and the session cookie security
//! scheme. Swagger UI serves the document in debug builds; the
//! `openapi-dump` binary exports it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::movies::{
    CastMemberBody, CreditsBody, CrewMemberBody, ExternalIdsBody, GenreBody, MovieDetailsBody,
    MoviePageBody, MovieProfileBody, MovieSummaryBody,
};
use crate::inbound::http::onboarding::OnboardingResponseBody;
use crate::inbound::http::watchlist::{
    WatchlistItemBody, WatchlistItemIdResponseBody, WatchlistItemRequestBody, WatchlistViewBody,
};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Watchlist backend API",
        description = "HTTP interface for the shared movie watchlist: session login, \
                       onboarding, catalog browsing, and watchlist management.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::onboarding::complete_onboarding,
        crate::inbound::http::watchlist::get_watchlist,
        crate::inbound::http::watchlist::add_watchlist_item,
        crate::inbound::http::watchlist::remove_watchlist_item,
        crate::inbound::http::movies::search,
        crate::inbound::http::movies::trending,
        crate::inbound::http::movies::top_rated,
        crate::inbound::http::movies::by_genre,
        crate::inbound::http::movies::movie_detail,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        LoginRequest,
        OnboardingResponseBody,
        WatchlistViewBody,
        WatchlistItemBody,
        WatchlistItemRequestBody,
        WatchlistItemIdResponseBody,
        MoviePageBody,
        MovieSummaryBody,
        GenreBody,
        MovieDetailsBody,
        CastMemberBody,
        CrewMemberBody,
        CreditsBody,
        ExternalIdsBody,
        MovieProfileBody,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "onboarding", description = "Post-login provisioning"),
        (name = "watchlist", description = "Shared watchlist reads and mutations"),
        (name = "movies", description = "Catalog browse and search"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
