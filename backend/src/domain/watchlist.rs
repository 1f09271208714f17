//! Watchlist data model.
//!
//! A watchlist is a named collection of catalog items shared through
//! memberships. Every user owns at most one watchlist; ownership is a
//! membership role, not a column on the watchlist row, so lists can later be
//! shared with editors and viewers without a schema change.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::{User, UserId};

/// Name given to the watchlist provisioned during onboarding.
pub const DEFAULT_WATCHLIST_NAME: &str = "My Watchlist";

/// Maximum accepted watchlist name length in bytes.
pub const WATCHLIST_NAME_MAX: usize = 256;
/// Maximum accepted item kind length in bytes.
pub const ITEM_KIND_MAX: usize = 50;

/// Validation errors returned by watchlist value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchlistValidationError {
    /// Internal watchlist ids are positive serial values.
    NonPositiveWatchlistId,
    /// Internal item ids are positive serial values.
    NonPositiveItemId,
    /// Catalog ids from the metadata provider are positive integers.
    NonPositiveTmdbId,
    /// Watchlist name was missing or blank once trimmed.
    EmptyName,
    /// Watchlist name exceeds the stored column width.
    NameTooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// Item kind was missing or blank once trimmed.
    EmptyItemKind,
    /// Item kind exceeds the stored column width.
    ItemKindTooLong {
        /// Maximum accepted length in bytes.
        max: usize,
    },
    /// Item kind contains characters outside the accepted set.
    ItemKindInvalidCharacters,
    /// Membership role text did not match a known role.
    UnknownRole {
        /// The role text that failed to parse.
        role: String,
    },
}

impl fmt::Display for WatchlistValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveWatchlistId => write!(f, "watchlist id must be positive"),
            Self::NonPositiveItemId => write!(f, "watchlist item id must be positive"),
            Self::NonPositiveTmdbId => write!(f, "tmdb id must be positive"),
            Self::EmptyName => write!(f, "watchlist name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "watchlist name must be at most {max} bytes")
            }
            Self::EmptyItemKind => write!(f, "item type must not be empty"),
            Self::ItemKindTooLong { max } => {
                write!(f, "item type must be at most {max} bytes")
            }
            Self::ItemKindInvalidCharacters => write!(
                f,
                "item type may only contain lowercase letters, digits, or underscores",
            ),
            Self::UnknownRole { role } => write!(f, "unknown membership role: {role}"),
        }
    }
}

impl std::error::Error for WatchlistValidationError {}

/// Internal numeric watchlist identifier backed by a serial column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct WatchlistId(i32);

impl WatchlistId {
    /// Validate and construct a [`WatchlistId`] from a raw database value.
    pub fn try_new(id: i32) -> Result<Self, WatchlistValidationError> {
        if id <= 0 {
            return Err(WatchlistValidationError::NonPositiveWatchlistId);
        }
        Ok(Self(id))
    }

    /// Access the raw numeric value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for WatchlistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for WatchlistId {
    type Error = WatchlistValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<WatchlistId> for i32 {
    fn from(value: WatchlistId) -> Self {
        value.0
    }
}

/// Internal numeric watchlist item identifier backed by a serial column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct WatchlistItemId(i32);

impl WatchlistItemId {
    /// Validate and construct a [`WatchlistItemId`] from a raw database value.
    pub fn try_new(id: i32) -> Result<Self, WatchlistValidationError> {
        if id <= 0 {
            return Err(WatchlistValidationError::NonPositiveItemId);
        }
        Ok(Self(id))
    }

    /// Access the raw numeric value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for WatchlistItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for WatchlistItemId {
    type Error = WatchlistValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<WatchlistItemId> for i32 {
    fn from(value: WatchlistItemId) -> Self {
        value.0
    }
}

/// Identifier assigned by the external movie catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct TmdbId(i32);

impl TmdbId {
    /// Validate and construct a [`TmdbId`] from a raw catalog value.
    pub fn try_new(id: i32) -> Result<Self, WatchlistValidationError> {
        if id <= 0 {
            return Err(WatchlistValidationError::NonPositiveTmdbId);
        }
        Ok(Self(id))
    }

    /// Access the raw numeric value.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self.0
    }
}

impl fmt::Display for TmdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for TmdbId {
    type Error = WatchlistValidationError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<TmdbId> for i32 {
    fn from(value: TmdbId) -> Self {
        value.0
    }
}

/// Watchlist display name.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`WATCHLIST_NAME_MAX`] bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WatchlistName(String);

impl WatchlistName {
    /// Validate and construct a [`WatchlistName`] from owned input.
    pub fn new(name: impl Into<String>) -> Result<Self, WatchlistValidationError> {
        Self::from_owned(name.into())
    }

    /// The name assigned to watchlists provisioned at onboarding.
    #[must_use]
    pub fn default_name() -> Self {
        Self(DEFAULT_WATCHLIST_NAME.to_owned())
    }

    fn from_owned(name: String) -> Result<Self, WatchlistValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(WatchlistValidationError::EmptyName);
        }
        if trimmed.len() > WATCHLIST_NAME_MAX {
            return Err(WatchlistValidationError::NameTooLong {
                max: WATCHLIST_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for WatchlistName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for WatchlistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<WatchlistName> for String {
    fn from(value: WatchlistName) -> Self {
        value.0
    }
}

impl TryFrom<String> for WatchlistName {
    type Error = WatchlistValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Role a member holds on a watchlist, stored as lowercase text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipRole {
    /// Full control; at most one owned watchlist per user.
    Owner,
    /// May add and remove items.
    Editor,
    /// Read-only access.
    Viewer,
}

impl MembershipRole {
    /// Canonical storage text for this role.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// Whether this role may add or remove watchlist items.
    #[must_use]
    pub fn can_edit_items(self) -> bool {
        matches!(self, Self::Owner | Self::Editor)
    }
}

impl fmt::Display for MembershipRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MembershipRole {
    type Err = WatchlistValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            other => Err(WatchlistValidationError::UnknownRole {
                role: other.to_owned(),
            }),
        }
    }
}

fn is_item_kind_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

/// Kind of catalog item stored on a watchlist, e.g. `movie` or `tv_show`.
///
/// Kept as validated text rather than a closed enum so new catalog kinds do
/// not require a schema or code change.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`ITEM_KIND_MAX`] bytes.
/// - Lowercase ASCII letters, digits, and underscores only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemKind(String);

impl ItemKind {
    /// Validate and construct an [`ItemKind`] from owned input.
    pub fn new(kind: impl Into<String>) -> Result<Self, WatchlistValidationError> {
        Self::from_owned(kind.into())
    }

    /// The kind used for feature film entries.
    #[must_use]
    pub fn movie() -> Self {
        Self("movie".to_owned())
    }

    fn from_owned(kind: String) -> Result<Self, WatchlistValidationError> {
        let trimmed = kind.trim();
        if trimmed.is_empty() {
            return Err(WatchlistValidationError::EmptyItemKind);
        }
        if trimmed.len() > ITEM_KIND_MAX {
            return Err(WatchlistValidationError::ItemKindTooLong { max: ITEM_KIND_MAX });
        }
        if !trimmed.chars().all(is_item_kind_char) {
            return Err(WatchlistValidationError::ItemKindInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemKind {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ItemKind> for String {
    fn from(value: ItemKind) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemKind {
    type Error = WatchlistValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Natural key of an item within a watchlist: kind plus catalog id.
///
/// The storage layer enforces uniqueness of (watchlist, kind, catalog id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemKey {
    kind: ItemKind,
    tmdb_id: TmdbId,
}

impl ItemKey {
    /// Build an [`ItemKey`] from validated components.
    #[must_use]
    pub fn new(kind: ItemKind, tmdb_id: TmdbId) -> Self {
        Self { kind, tmdb_id }
    }

    /// Catalog item kind.
    #[must_use]
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Catalog identifier.
    #[must_use]
    pub fn tmdb_id(&self) -> TmdbId {
        self.tmdb_id
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.tmdb_id)
    }
}

/// A user's membership on a watchlist, with the joined user identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Membership {
    user: User,
    role: MembershipRole,
}

impl Membership {
    /// Build a [`Membership`] from validated components.
    #[must_use]
    pub fn new(user: User, role: MembershipRole) -> Self {
        Self { user, role }
    }

    /// The member.
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    /// The member's role.
    #[must_use]
    pub fn role(&self) -> MembershipRole {
        self.role
    }
}

/// A stored watchlist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistItem {
    id: WatchlistItemId,
    watchlist_id: WatchlistId,
    key: ItemKey,
    added_by: UserId,
    added_at: DateTime<Utc>,
}

impl WatchlistItem {
    /// Build a [`WatchlistItem`] from validated components.
    #[must_use]
    pub fn new(
        id: WatchlistItemId,
        watchlist_id: WatchlistId,
        key: ItemKey,
        added_by: UserId,
        added_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            watchlist_id,
            key,
            added_by,
            added_at,
        }
    }

    /// Internal item identifier.
    #[must_use]
    pub fn id(&self) -> WatchlistItemId {
        self.id
    }

    /// The watchlist this entry belongs to.
    #[must_use]
    pub fn watchlist_id(&self) -> WatchlistId {
        self.watchlist_id
    }

    /// Natural key: kind plus catalog id.
    #[must_use]
    pub fn key(&self) -> &ItemKey {
        &self.key
    }

    /// The user who added this entry.
    #[must_use]
    pub fn added_by(&self) -> UserId {
        self.added_by
    }

    /// When this entry was added.
    #[must_use]
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

/// Full state of a watchlist as read from storage: the list row, its
/// memberships with joined user identities, and its items in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchlistSnapshot {
    id: WatchlistId,
    name: WatchlistName,
    memberships: Vec<Membership>,
    items: Vec<WatchlistItem>,
}

impl WatchlistSnapshot {
    /// Build a [`WatchlistSnapshot`] from validated components.
    #[must_use]
    pub fn new(
        id: WatchlistId,
        name: WatchlistName,
        memberships: Vec<Membership>,
        items: Vec<WatchlistItem>,
    ) -> Self {
        Self {
            id,
            name,
            memberships,
            items,
        }
    }

    /// Internal watchlist identifier.
    #[must_use]
    pub fn id(&self) -> WatchlistId {
        self.id
    }

    /// Watchlist display name.
    #[must_use]
    pub fn name(&self) -> &WatchlistName {
        &self.name
    }

    /// Memberships with joined user identities.
    #[must_use]
    pub fn memberships(&self) -> &[Membership] {
        &self.memberships
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[WatchlistItem] {
        &self.items
    }

    /// Role the given user holds on this watchlist, if any.
    #[must_use]
    pub fn role_of(&self, user_id: UserId) -> Option<MembershipRole> {
        self.memberships
            .iter()
            .find(|membership| membership.user().id() == user_id)
            .map(Membership::role)
    }

    /// Consume the snapshot, yielding its items.
    #[must_use]
    pub fn into_items(self) -> Vec<WatchlistItem> {
        self.items
    }
}

/// Outcome of the idempotent owned-watchlist provisioning step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreatedWatchlist {
    /// A new watchlist and owner membership were inserted.
    Created(WatchlistId),
    /// The user already owned a watchlist; nothing was inserted.
    Existing(WatchlistId),
}

impl CreatedWatchlist {
    /// The owned watchlist id, whether freshly created or pre-existing.
    #[must_use]
    pub fn watchlist_id(self) -> WatchlistId {
        match self {
            Self::Created(id) | Self::Existing(id) => id,
        }
    }

    /// Whether this call inserted the watchlist.
    #[must_use]
    pub fn was_created(self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// A watchlist entry decorated with catalog metadata for display.
///
/// Metadata fields are `None` when the catalog lookup failed or returned
/// nothing; the stored entry is still shown.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedWatchlistItem {
    item: WatchlistItem,
    title: Option<String>,
    poster_url: Option<String>,
    overview: Option<String>,
}

impl EnrichedWatchlistItem {
    /// Build an entry with catalog metadata attached.
    #[must_use]
    pub fn new(
        item: WatchlistItem,
        title: Option<String>,
        poster_url: Option<String>,
        overview: Option<String>,
    ) -> Self {
        Self {
            item,
            title,
            poster_url,
            overview,
        }
    }

    /// Build an entry whose catalog metadata is unavailable.
    #[must_use]
    pub fn without_metadata(item: WatchlistItem) -> Self {
        Self::new(item, None, None, None)
    }

    /// The stored entry.
    #[must_use]
    pub fn item(&self) -> &WatchlistItem {
        &self.item
    }

    /// Catalog title, if the lookup succeeded.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Full poster image URL, if the catalog provided one.
    #[must_use]
    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url.as_deref()
    }

    /// Catalog synopsis, if the lookup succeeded.
    #[must_use]
    pub fn overview(&self) -> Option<&str> {
        self.overview.as_deref()
    }
}

/// Watchlist read model returned to callers: the list plus enriched items.
#[derive(Debug, Clone, PartialEq)]
pub struct WatchlistView {
    id: WatchlistId,
    name: WatchlistName,
    items: Vec<EnrichedWatchlistItem>,
}

impl WatchlistView {
    /// Build a [`WatchlistView`] from validated components.
    #[must_use]
    pub fn new(id: WatchlistId, name: WatchlistName, items: Vec<EnrichedWatchlistItem>) -> Self {
        Self { id, name, items }
    }

    /// Internal watchlist identifier.
    #[must_use]
    pub fn id(&self) -> WatchlistId {
        self.id
    }

    /// Watchlist display name.
    #[must_use]
    pub fn name(&self) -> &WatchlistName {
        &self.name
    }

    /// Enriched items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[EnrichedWatchlistItem] {
        &self.items
    }
}
