//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

use crate::domain::ports::{
    FixtureLoginService, FixtureMovieMetadataGateway, FixtureUserDirectory,
    FixtureWatchlistRepository,
};
use crate::domain::{MovieCatalogService, OnboardingService, WatchlistService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Port bundle backed entirely by in-memory fixtures.
pub fn fixture_state_ports() -> HttpStatePorts {
    let metadata = Arc::new(FixtureMovieMetadataGateway);
    let watchlists = Arc::new(FixtureWatchlistRepository);
    let watchlist_service = Arc::new(WatchlistService::new(
        Arc::clone(&watchlists),
        Arc::clone(&metadata),
    ));
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        onboarding: Arc::new(OnboardingService::new(
            Arc::new(FixtureUserDirectory),
            watchlists,
        )),
        watchlist_commands: Arc::clone(&watchlist_service) as _,
        watchlist_query: watchlist_service,
        catalog: Arc::new(MovieCatalogService::new(metadata)),
    }
}

/// HTTP state backed entirely by in-memory fixtures.
pub fn fixture_http_state() -> HttpState {
    HttpState::new(fixture_state_ports())
}
