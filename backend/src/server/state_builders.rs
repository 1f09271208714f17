//! Builders for the HTTP state ports with fixture fallbacks.

use std::sync::Arc;

use actix_web::web;

use backend::domain::ports::{
    FixtureLoginService, FixtureMovieMetadataGateway, FixtureUserDirectory,
    FixtureWatchlistRepository, MovieMetadataGateway, UserDirectory, WatchlistRepository,
};
use backend::domain::{MovieCatalogService, OnboardingService, WatchlistService};
use backend::inbound::http::state::{HttpState, HttpStatePorts};
use backend::outbound::persistence::{DieselUserDirectory, DieselWatchlistRepository};
use backend::outbound::tmdb::TmdbHttpGateway;

use super::ServerConfig;
use super::config::TmdbSettings;

/// Wire the domain services over concrete adapters and erase them into the
/// port bundle the handlers consume.
///
/// Login keeps the fixture credential contract until a real identity provider
/// is wired; every other port follows the supplied adapters.
fn assemble_ports<D, R, G>(
    directory: Arc<D>,
    watchlists: Arc<R>,
    metadata: Arc<G>,
) -> HttpStatePorts
where
    D: UserDirectory + 'static,
    R: WatchlistRepository + 'static,
    G: MovieMetadataGateway + 'static,
{
    let watchlist_service = Arc::new(WatchlistService::new(
        Arc::clone(&watchlists),
        Arc::clone(&metadata),
    ));
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        onboarding: Arc::new(OnboardingService::new(directory, watchlists)),
        watchlist_commands: Arc::clone(&watchlist_service) as _,
        watchlist_query: watchlist_service,
        catalog: Arc::new(MovieCatalogService::new(metadata)),
    }
}

/// Select database-backed persistence adapters when a pool is available,
/// otherwise fall back to the fixtures.
fn build_ports_with_pool<Pool, D, R, G>(
    pool: &Option<Pool>,
    make_adapters: impl FnOnce(&Pool) -> (Arc<D>, Arc<R>),
    metadata: Arc<G>,
) -> HttpStatePorts
where
    D: UserDirectory + 'static,
    R: WatchlistRepository + 'static,
    G: MovieMetadataGateway + 'static,
{
    match pool {
        Some(pool) => {
            let (directory, watchlists) = make_adapters(pool);
            assemble_ports(directory, watchlists, metadata)
        }
        None => assemble_ports(
            Arc::new(FixtureUserDirectory),
            Arc::new(FixtureWatchlistRepository),
            metadata,
        ),
    }
}

fn build_ports_with_gateway<G>(config: &ServerConfig, metadata: Arc<G>) -> HttpStatePorts
where
    G: MovieMetadataGateway + 'static,
{
    build_ports_with_pool(
        &config.db_pool,
        |pool| {
            (
                Arc::new(DieselUserDirectory::new(pool.clone())),
                Arc::new(DieselWatchlistRepository::new(pool.clone())),
            )
        },
        metadata,
    )
}

fn build_metadata_gateway(settings: &TmdbSettings) -> std::io::Result<TmdbHttpGateway> {
    TmdbHttpGateway::new(
        settings.base_url.clone(),
        settings.api_token.clone(),
        settings.timeout,
    )
    .map_err(|error| {
        std::io::Error::other(format!("metadata gateway construction failed: {error}"))
    })
}

/// Build the shared HTTP state from configured adapters and fixture fallbacks.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    let ports = match &config.tmdb {
        Some(settings) => {
            build_ports_with_gateway(config, Arc::new(build_metadata_gateway(settings)?))
        }
        None => build_ports_with_gateway(config, Arc::new(FixtureMovieMetadataGateway)),
    };
    Ok(web::Data::new(HttpState::new(ports)))
}
