//! Domain primitives, aggregates, and application services.
//!
//! Purpose: Define strongly typed domain entities plus the services that
//! orchestrate them behind driving ports. Keep types immutable and document
//! invariants and serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — transport-agnostic error payload and category.
//! - TraceId / TRACE_ID_HEADER — request correlation identifier.
//! - LoginCredentials — validated login payload.
//! - User, UserId, Username, ExternalIdentity — account identity types.
//! - Watchlist aggregates — WatchlistSnapshot, WatchlistView, WatchlistItem,
//!   Membership, CreatedWatchlist, and their identifier newtypes.
//! - Movie read models — MovieSummary, MoviePage, MovieDetails, Credits,
//!   ExternalIds, MovieProfile, TrendingPeriod.
//! - WatchlistItemEvent — outbox payload recorded with item mutations.
//! - Services — OnboardingService, WatchlistService, MovieCatalogService.

pub mod auth;
pub mod error;
pub mod events;
pub mod movie;
pub mod movie_catalog_service;
pub mod onboarding_service;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod watchlist;
pub mod watchlist_service;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::events::{ITEM_ADDED_EVENT, ITEM_REMOVED_EVENT, WatchlistItemEvent};
pub use self::movie::{
    CastMember, Credits, CrewMember, ExternalIds, Genre, GenreId, MovieDetails, MoviePage,
    MovieProfile, MovieSummary, ParseTrendingPeriodError, TrendingPeriod, poster_url,
};
pub use self::movie_catalog_service::MovieCatalogService;
pub use self::onboarding_service::OnboardingService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{ExternalIdentity, User, UserId, UserValidationError, Username};
pub use self::watchlist::{
    CreatedWatchlist, DEFAULT_WATCHLIST_NAME, EnrichedWatchlistItem, ItemKey, ItemKind,
    Membership, MembershipRole, TmdbId, WatchlistId, WatchlistItem, WatchlistItemId,
    WatchlistName, WatchlistSnapshot, WatchlistValidationError, WatchlistView,
};
pub use self::watchlist_service::WatchlistService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
