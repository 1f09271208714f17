//! Watchlist API handlers.
//!
//! ```text
//! GET    /api/v1/watchlist
//! POST   /api/v1/watchlist/items {"tmdbId":550,"itemType":"movie"}
//! DELETE /api/v1/watchlist/items {"tmdbId":550,"itemType":"movie"}
//! ```
//!
//! All routes require a completed onboarding: the watchlist id and acting
//! user id come from the session and are passed to the domain explicitly.

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::watchlist::{EnrichedWatchlistItem, ItemKey, WatchlistView};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_item_kind, parse_tmdb_id,
};

const TMDB_ID_FIELD: FieldName = FieldName::new("tmdbId");
const ITEM_TYPE_FIELD: FieldName = FieldName::new("itemType");

/// Request body for the item mutation routes.
///
/// Example JSON:
/// `{"tmdbId":550,"itemType":"movie"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItemRequestBody {
    #[schema(example = 550)]
    pub tmdb_id: Option<i32>,
    #[schema(example = "movie")]
    pub item_type: Option<String>,
}

impl WatchlistItemRequestBody {
    fn into_item_key(self) -> Result<ItemKey, Error> {
        let tmdb_id = self
            .tmdb_id
            .ok_or_else(|| missing_field_error(TMDB_ID_FIELD))?;
        let tmdb_id = parse_tmdb_id(tmdb_id, TMDB_ID_FIELD)?;
        let kind = self
            .item_type
            .ok_or_else(|| missing_field_error(ITEM_TYPE_FIELD))?;
        let kind = parse_item_kind(&kind, ITEM_TYPE_FIELD)?;
        Ok(ItemKey::new(kind, tmdb_id))
    }
}

/// One watchlist entry with its catalog metadata.
///
/// Metadata fields are `null` when the catalog lookup failed; the stored
/// entry is still listed.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItemBody {
    pub id: i32,
    #[schema(example = 550)]
    pub tmdb_id: i32,
    #[schema(example = "movie")]
    pub item_type: String,
    pub added_by_user_id: i32,
    #[schema(format = "date-time")]
    pub added_at: String,
    pub title: Option<String>,
    pub poster_url: Option<String>,
    pub overview: Option<String>,
}

impl From<&EnrichedWatchlistItem> for WatchlistItemBody {
    fn from(entry: &EnrichedWatchlistItem) -> Self {
        let item = entry.item();
        Self {
            id: item.id().as_i32(),
            tmdb_id: item.key().tmdb_id().as_i32(),
            item_type: item.key().kind().as_ref().to_owned(),
            added_by_user_id: item.added_by().as_i32(),
            added_at: item.added_at().to_rfc3339(),
            title: entry.title().map(ToOwned::to_owned),
            poster_url: entry.poster_url().map(ToOwned::to_owned),
            overview: entry.overview().map(ToOwned::to_owned),
        }
    }
}

/// Response body for `GET /api/v1/watchlist`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistViewBody {
    pub id: i32,
    #[schema(example = "Watchlist")]
    pub name: String,
    pub items: Vec<WatchlistItemBody>,
}

impl From<WatchlistView> for WatchlistViewBody {
    fn from(view: WatchlistView) -> Self {
        Self {
            id: view.id().as_i32(),
            name: view.name().as_ref().to_owned(),
            items: view.items().iter().map(WatchlistItemBody::from).collect(),
        }
    }
}

/// Response body for the item mutation routes.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistItemIdResponseBody {
    pub item_id: i32,
}

/// Fetch the caller's watchlist with enriched items.
///
/// Responds `200` with JSON `null` when the user owns no watchlist yet.
#[utoipa::path(
    get,
    path = "/api/v1/watchlist",
    responses(
        (status = 200, description = "Owned watchlist; `null` when none exists", body = WatchlistViewBody),
        (status = 401, description = "Onboarding required", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "A backing service is unavailable", body = Error)
    ),
    tags = ["watchlist"],
    operation_id = "getWatchlist",
    security(("SessionCookie" = []))
)]
#[get("/watchlist")]
pub async fn get_watchlist(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Option<WatchlistViewBody>>> {
    let user_id = session.require_user_id()?;
    let view = state.watchlist_query.watchlist_for_user(user_id).await?;
    Ok(web::Json(view.map(WatchlistViewBody::from)))
}

/// Add a title to the caller's watchlist.
#[utoipa::path(
    post,
    path = "/api/v1/watchlist/items",
    request_body = WatchlistItemRequestBody,
    responses(
        (status = 200, description = "Item added", body = WatchlistItemIdResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Onboarding required", body = Error),
        (status = 403, description = "Caller may not modify this watchlist", body = Error),
        (status = 409, description = "Item already on the watchlist", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "A backing service is unavailable", body = Error)
    ),
    tags = ["watchlist"],
    operation_id = "addMovie",
    security(("SessionCookie" = []))
)]
#[post("/watchlist/items")]
pub async fn add_watchlist_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WatchlistItemRequestBody>,
) -> ApiResult<web::Json<WatchlistItemIdResponseBody>> {
    let (watchlist_id, user_id) = session.require_watchlist_context()?;
    let key = payload.into_inner().into_item_key()?;
    let item_id = state
        .watchlist_commands
        .add_movie(watchlist_id, &key, user_id)
        .await?;
    Ok(web::Json(WatchlistItemIdResponseBody {
        item_id: item_id.as_i32(),
    }))
}

/// Remove a title from the caller's watchlist.
#[utoipa::path(
    delete,
    path = "/api/v1/watchlist/items",
    request_body = WatchlistItemRequestBody,
    responses(
        (status = 200, description = "Item removed", body = WatchlistItemIdResponseBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Onboarding required", body = Error),
        (status = 403, description = "Caller may not modify this watchlist", body = Error),
        (status = 404, description = "Item is not on the watchlist", body = Error),
        (status = 500, description = "Internal server error", body = Error),
        (status = 503, description = "A backing service is unavailable", body = Error)
    ),
    tags = ["watchlist"],
    operation_id = "removeMovie",
    security(("SessionCookie" = []))
)]
#[delete("/watchlist/items")]
pub async fn remove_watchlist_item(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<WatchlistItemRequestBody>,
) -> ApiResult<web::Json<WatchlistItemIdResponseBody>> {
    let (watchlist_id, user_id) = session.require_watchlist_context()?;
    let key = payload.into_inner().into_item_key()?;
    let item_id = state
        .watchlist_commands
        .remove_movie(watchlist_id, &key, user_id)
        .await?;
    Ok(web::Json(WatchlistItemIdResponseBody {
        item_id: item_id.as_i32(),
    }))
}

#[cfg(test)]
#[path = "watchlist_tests.rs"]
mod tests;
