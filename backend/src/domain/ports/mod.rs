//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod login_service;
mod movie_catalog_query;
mod movie_metadata;
mod onboarding_command;
mod user_directory;
mod watchlist_command;
mod watchlist_query;
mod watchlist_repository;

pub use login_service::{
    AuthenticatedIdentity, FIXTURE_PROVIDER, FixtureLoginService, LoginService,
};
#[cfg(test)]
pub use movie_catalog_query::MockMovieCatalogQuery;
pub use movie_catalog_query::MovieCatalogQuery;
#[cfg(test)]
pub use movie_metadata::MockMovieMetadataGateway;
pub use movie_metadata::{FixtureMovieMetadataGateway, MetadataGatewayError, MovieMetadataGateway};
#[cfg(test)]
pub use onboarding_command::MockOnboardingCommand;
pub use onboarding_command::{OnboardingCommand, OnboardingOutcome};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{FixtureUserDirectory, UserDirectory, UserDirectoryError};
#[cfg(test)]
pub use watchlist_command::MockWatchlistCommand;
pub use watchlist_command::WatchlistCommand;
#[cfg(test)]
pub use watchlist_query::MockWatchlistQuery;
pub use watchlist_query::WatchlistQuery;
#[cfg(test)]
pub use watchlist_repository::MockWatchlistRepository;
pub use watchlist_repository::{
    FixtureWatchlistRepository, WatchlistRepository, WatchlistRepositoryError,
};
