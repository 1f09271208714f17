//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{outbox_events, users, watchlist_items, watchlist_memberships, watchlists};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: i32,
    pub username: String,
    pub oauth_provider: String,
    pub external_id: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub username: &'a str,
    pub oauth_provider: &'a str,
    pub external_id: &'a str,
}

// ---------------------------------------------------------------------------
// Watchlist models
// ---------------------------------------------------------------------------

/// Row struct for reading from the watchlists table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = watchlists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WatchlistRow {
    pub id: i32,
    pub name: String,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new watchlist records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watchlists)]
pub(crate) struct NewWatchlistRow<'a> {
    pub name: &'a str,
}

/// Insertable struct for creating membership records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watchlist_memberships)]
pub(crate) struct NewMembershipRow<'a> {
    pub watchlist_id: i32,
    pub user_id: i32,
    pub role: &'a str,
}

// ---------------------------------------------------------------------------
// Watchlist item models
// ---------------------------------------------------------------------------

/// Row struct for reading from the watchlist_items table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = watchlist_items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct WatchlistItemRow {
    pub id: i32,
    pub watchlist_id: i32,
    pub item_type: String,
    pub tmdb_id: i32,
    pub added_by_user_id: i32,
    /// Maps to the item's `added_at` timestamp in the domain.
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating watchlist item records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = watchlist_items)]
pub(crate) struct NewWatchlistItemRow<'a> {
    pub watchlist_id: i32,
    pub item_type: &'a str,
    pub tmdb_id: i32,
    pub added_by_user_id: i32,
}

// ---------------------------------------------------------------------------
// Outbox models
// ---------------------------------------------------------------------------

/// Insertable struct for appending outbox event records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = outbox_events)]
pub(crate) struct NewOutboxEventRow<'a> {
    pub event_type: &'a str,
    pub payload: &'a serde_json::Value,
}
