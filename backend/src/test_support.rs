//! Shared helpers for the crate's test suites.
//!
//! Compiled only with the `test-support` feature; the crate's dev-dependency
//! on itself turns the feature on for integration and doc tests.

use std::io::{self, Write as _};
use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;
use actix_web::web;
use tempfile::NamedTempFile;

use crate::domain::ports::{
    FixtureLoginService, FixtureMovieMetadataGateway, FixtureUserDirectory,
    FixtureWatchlistRepository,
};
use crate::domain::{MovieCatalogService, OnboardingService, WatchlistService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

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

/// Shared HTTP state over the fixture ports, ready for `App::app_data`.
pub fn fixture_http_state() -> web::Data<HttpState> {
    web::Data::new(HttpState::new(fixture_state_ports()))
}

/// Build a session middleware configured for tests.
///
/// Generates a fresh signing key per invocation and disables the `Secure`
/// flag so the actix test client can round-trip cookies over plain HTTP.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Write a session key file of `len` bytes and return its guard.
///
/// The file is removed when the guard drops.
pub fn session_key_file(len: usize) -> io::Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(&vec![b'k'; len])?;
    file.flush()?;
    Ok(file)
}
