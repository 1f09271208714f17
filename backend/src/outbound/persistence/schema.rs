//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// User accounts table.
    ///
    /// Stores one row per resolved external identity. Both `username` and the
    /// `(oauth_provider, external_id)` pair are unique.
    users (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Unique display name (max 50 characters).
        username -> Varchar,
        /// Identity provider name (max 50 characters).
        oauth_provider -> Varchar,
        /// Subject identifier issued by the provider (max 100 characters).
        external_id -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Watchlists table.
    watchlists (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Display name (max 256 characters).
        name -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Watchlist membership table.
    ///
    /// One row per (watchlist, user) pair. A partial unique index on
    /// `user_id WHERE role = 'owner'` limits each user to one owned list.
    watchlist_memberships (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Watchlist the membership belongs to.
        watchlist_id -> Int4,
        /// Member user account.
        user_id -> Int4,
        /// Membership role text: owner, editor, or viewer (max 25 characters).
        role -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Watchlist items table.
    ///
    /// One row per (watchlist, item_type, tmdb_id) triple.
    watchlist_items (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Watchlist the item belongs to.
        watchlist_id -> Int4,
        /// Catalog item kind, e.g. `movie` (max 50 characters).
        item_type -> Varchar,
        /// External catalog identifier.
        tmdb_id -> Int4,
        /// User who added the item.
        added_by_user_id -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp (auto-updated by trigger).
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only outbox journal for item mutations.
    outbox_events (id) {
        /// Primary key: serial identifier.
        id -> Int4,
        /// Event type string, e.g. `watchlist.item.added` (max 100 characters).
        event_type -> Varchar,
        /// Event payload document.
        payload -> Jsonb,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(watchlist_memberships -> users (user_id));
diesel::joinable!(watchlist_memberships -> watchlists (watchlist_id));
diesel::joinable!(watchlist_items -> watchlists (watchlist_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    watchlists,
    watchlist_memberships,
    watchlist_items,
    outbox_events,
);
