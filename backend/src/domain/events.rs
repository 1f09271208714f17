//! Integration events recorded in the transactional outbox.
//!
//! Events are appended in the same database transaction as the state change
//! they describe, so a committed change always has its event and a rolled
//! back change never does. A separate relay drains the outbox table; this
//! subsystem only appends.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::user::UserId;
use crate::domain::watchlist::{ItemKind, TmdbId, WatchlistId, WatchlistItemId};

/// Event type recorded when an item is added to a watchlist.
pub const ITEM_ADDED_EVENT: &str = "watchlist.item.added";
/// Event type recorded when an item is removed from a watchlist.
pub const ITEM_REMOVED_EVENT: &str = "watchlist.item.removed";

/// Payload shared by both watchlist item events.
///
/// Serialised as camelCase JSON into the outbox `payload` column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct WatchlistItemEvent {
    /// The watchlist that changed.
    pub watchlist_id: WatchlistId,
    /// The item row that was inserted or deleted.
    pub item_id: WatchlistItemId,
    /// Catalog identifier of the title.
    pub tmdb_id: TmdbId,
    /// Kind of catalog item.
    pub item_type: ItemKind,
    /// The user who made the change.
    pub acting_user_id: UserId,
}

impl WatchlistItemEvent {
    /// Serialise this event into the outbox payload representation.
    pub fn payload(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::watchlist::WatchlistValidationError;
    use rstest::rstest;

    fn sample_event() -> WatchlistItemEvent {
        WatchlistItemEvent {
            watchlist_id: WatchlistId::try_new(10).expect("valid id"),
            item_id: WatchlistItemId::try_new(3).expect("valid id"),
            tmdb_id: TmdbId::try_new(550).expect("valid id"),
            item_type: ItemKind::movie(),
            acting_user_id: UserId::try_new(7).expect("valid id"),
        }
    }

    #[rstest]
    fn payload_serialises_camel_case() {
        let payload = sample_event().payload().expect("serialises");
        assert_eq!(payload["watchlistId"], 10);
        assert_eq!(payload["itemId"], 3);
        assert_eq!(payload["tmdbId"], 550);
        assert_eq!(payload["itemType"], "movie");
        assert_eq!(payload["actingUserId"], 7);
        assert_eq!(
            payload.as_object().map(serde_json::Map::len),
            Some(5),
            "payload carries exactly the published fields",
        );
    }

    #[rstest]
    fn payload_round_trips() {
        let event = sample_event();
        let payload = event.payload().expect("serialises");
        let back: WatchlistItemEvent = serde_json::from_value(payload).expect("deserialises");
        assert_eq!(back, event);
    }

    #[rstest]
    fn payload_rejects_invalid_ids_on_read() {
        let err = serde_json::from_value::<WatchlistItemEvent>(serde_json::json!({
            "watchlistId": 0,
            "itemId": 3,
            "tmdbId": 550,
            "itemType": "movie",
            "actingUserId": 7,
        }))
        .expect_err("non-positive ids must fail");
        assert!(
            err.to_string()
                .contains(&WatchlistValidationError::NonPositiveWatchlistId.to_string()),
        );
    }

    #[rstest]
    fn event_type_constants_are_stable() {
        assert_eq!(ITEM_ADDED_EVENT, "watchlist.item.added");
        assert_eq!(ITEM_REMOVED_EVENT, "watchlist.item.removed");
    }
}
