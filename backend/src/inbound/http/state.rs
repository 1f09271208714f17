//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    LoginService, MovieCatalogQuery, OnboardingCommand, WatchlistCommand, WatchlistQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub onboarding: Arc<dyn OnboardingCommand>,
    pub watchlist_commands: Arc<dyn WatchlistCommand>,
    pub watchlist_query: Arc<dyn WatchlistQuery>,
    pub catalog: Arc<dyn MovieCatalogQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub onboarding: Arc<dyn OnboardingCommand>,
    pub watchlist_commands: Arc<dyn WatchlistCommand>,
    pub watchlist_query: Arc<dyn WatchlistQuery>,
    pub catalog: Arc<dyn MovieCatalogQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{
    ///     FixtureLoginService, FixtureMovieMetadataGateway, FixtureUserDirectory,
    ///     FixtureWatchlistRepository,
    /// };
    /// use backend::domain::{MovieCatalogService, OnboardingService, WatchlistService};
    /// use backend::inbound::http::state::{HttpState, HttpStatePorts};
    ///
    /// let metadata = Arc::new(FixtureMovieMetadataGateway);
    /// let watchlists = Arc::new(FixtureWatchlistRepository);
    /// let watchlist_service = Arc::new(WatchlistService::new(
    ///     Arc::clone(&watchlists),
    ///     Arc::clone(&metadata),
    /// ));
    /// let ports = HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     onboarding: Arc::new(OnboardingService::new(
    ///         Arc::new(FixtureUserDirectory),
    ///         watchlists,
    ///     )),
    ///     watchlist_commands: Arc::clone(&watchlist_service) as _,
    ///     watchlist_query: watchlist_service,
    ///     catalog: Arc::new(MovieCatalogService::new(metadata)),
    /// };
    /// let state = HttpState::new(ports);
    /// let _catalog = state.catalog.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            onboarding,
            watchlist_commands,
            watchlist_query,
            catalog,
        } = ports;
        Self {
            login,
            onboarding,
            watchlist_commands,
            watchlist_query,
            catalog,
        }
    }
}
