//! Port for watchlist persistence.
//!
//! Operations are coarse grained: each call is one atomic unit of work
//! inside the adapter, so permission checks, duplicate checks, the row
//! change, and the outbox append commit or roll back together.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::user::{ExternalIdentity, User, UserId, Username};
use crate::domain::watchlist::{
    CreatedWatchlist, ItemKey, ItemKind, Membership, MembershipRole, TmdbId, WatchlistId,
    WatchlistItem, WatchlistItemId, WatchlistName, WatchlistSnapshot,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by watchlist repository adapters.
    pub enum WatchlistRepositoryError {
        /// The acting user has no membership allowing the mutation.
        PermissionDenied { message: String } =>
            "watchlist permission denied: {message}",
        /// The watchlist already holds an item with this key.
        DuplicateItem { message: String } =>
            "watchlist item already present: {message}",
        /// No item with this key exists on the watchlist.
        ItemNotFound { message: String } =>
            "watchlist item not found: {message}",
        /// Repository connection could not be established.
        Connection { message: String } =>
            "watchlist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "watchlist repository query failed: {message}",
    }
}

/// Port for reading and mutating watchlists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WatchlistRepository: Send + Sync {
    /// Read the watchlist the user owns, with memberships and items in
    /// insertion order. `None` when the user owns no watchlist.
    async fn find_owned(
        &self,
        user_id: UserId,
    ) -> Result<Option<WatchlistSnapshot>, WatchlistRepositoryError>;

    /// Ensure the user owns a watchlist, creating one with `name` if absent.
    ///
    /// Idempotent: a second call finds the existing list and inserts
    /// nothing. At most one owner membership per user is enforced by the
    /// store.
    async fn create_for_owner(
        &self,
        user_id: UserId,
        name: &WatchlistName,
    ) -> Result<CreatedWatchlist, WatchlistRepositoryError>;

    /// Insert an item and its outbox event in one transaction.
    ///
    /// Fails with `PermissionDenied` unless the acting user holds an owner
    /// or editor membership, and with `DuplicateItem` when the key is
    /// already present.
    async fn add_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError>;

    /// Delete an item and append its outbox event in one transaction.
    ///
    /// Fails with `PermissionDenied` unless the acting user holds an owner
    /// or editor membership, and with `ItemNotFound` when no row matches
    /// the key.
    async fn remove_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError>;
}

/// Fixture repository backed by one canned watchlist.
///
/// The fixture user owns a two-item list and may mutate it; every other
/// user owns nothing and may mutate nothing. Mutations validate against
/// the canned items but persist nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureWatchlistRepository;

impl FixtureWatchlistRepository {
    /// Owner of the canned watchlist, aligned with the fixture directory.
    pub const OWNER_ID: i32 = 1;
    /// Id of the canned watchlist.
    pub const WATCHLIST_ID: i32 = 10;
    /// Catalog ids of the canned items, in insertion order.
    pub const ITEM_TMDB_IDS: [i32; 2] = [550, 603];
    /// Item id handed out for accepted inserts.
    pub const NEXT_ITEM_ID: i32 = 3;

    fn added_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-01-05T12:00:00Z")
            .expect("fixture timestamp parses")
            .with_timezone(&Utc)
    }

    fn owner() -> Result<User, WatchlistRepositoryError> {
        let invalid = |err| WatchlistRepositoryError::query(format!("invalid fixture data: {err}"));
        Ok(User::new(
            UserId::try_new(Self::OWNER_ID).map_err(invalid)?,
            Username::new("admin").map_err(invalid)?,
            ExternalIdentity::try_from_parts("fixture", "fixture-admin").map_err(invalid)?,
        ))
    }

    fn snapshot() -> Result<WatchlistSnapshot, WatchlistRepositoryError> {
        let invalid = |err| WatchlistRepositoryError::query(format!("invalid fixture data: {err}"));
        let owner = Self::owner()?;
        let watchlist_id = WatchlistId::try_new(Self::WATCHLIST_ID).map_err(invalid)?;
        let items = Self::ITEM_TMDB_IDS
            .iter()
            .zip(1..)
            .map(|(&tmdb_id, item_id)| {
                Ok(WatchlistItem::new(
                    WatchlistItemId::try_new(item_id).map_err(invalid)?,
                    watchlist_id,
                    ItemKey::new(ItemKind::movie(), TmdbId::try_new(tmdb_id).map_err(invalid)?),
                    owner.id(),
                    Self::added_at(),
                ))
            })
            .collect::<Result<Vec<_>, WatchlistRepositoryError>>()?;

        Ok(WatchlistSnapshot::new(
            watchlist_id,
            WatchlistName::default_name(),
            vec![Membership::new(owner, MembershipRole::Owner)],
            items,
        ))
    }

    fn check_member(
        watchlist_id: WatchlistId,
        acting_user_id: UserId,
    ) -> Result<(), WatchlistRepositoryError> {
        if watchlist_id.as_i32() != Self::WATCHLIST_ID
            || acting_user_id.as_i32() != Self::OWNER_ID
        {
            return Err(WatchlistRepositoryError::permission_denied(format!(
                "user {acting_user_id} may not modify watchlist {watchlist_id}",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl WatchlistRepository for FixtureWatchlistRepository {
    async fn find_owned(
        &self,
        user_id: UserId,
    ) -> Result<Option<WatchlistSnapshot>, WatchlistRepositoryError> {
        if user_id.as_i32() == Self::OWNER_ID {
            Self::snapshot().map(Some)
        } else {
            Ok(None)
        }
    }

    async fn create_for_owner(
        &self,
        user_id: UserId,
        _name: &WatchlistName,
    ) -> Result<CreatedWatchlist, WatchlistRepositoryError> {
        let watchlist_id = WatchlistId::try_new(Self::WATCHLIST_ID)
            .map_err(|err| WatchlistRepositoryError::query(format!("invalid fixture data: {err}")))?;
        if user_id.as_i32() == Self::OWNER_ID {
            Ok(CreatedWatchlist::Existing(watchlist_id))
        } else {
            Ok(CreatedWatchlist::Created(watchlist_id))
        }
    }

    async fn add_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError> {
        Self::check_member(watchlist_id, acting_user_id)?;
        let snapshot = Self::snapshot()?;
        if snapshot.items().iter().any(|item| item.key() == key) {
            return Err(WatchlistRepositoryError::duplicate_item(format!(
                "{key} already on watchlist {watchlist_id}",
            )));
        }
        WatchlistItemId::try_new(Self::NEXT_ITEM_ID)
            .map_err(|err| WatchlistRepositoryError::query(format!("invalid fixture data: {err}")))
    }

    async fn remove_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError> {
        Self::check_member(watchlist_id, acting_user_id)?;
        let snapshot = Self::snapshot()?;
        snapshot
            .items()
            .iter()
            .find(|item| item.key() == key)
            .map(WatchlistItem::id)
            .ok_or_else(|| {
                WatchlistRepositoryError::item_not_found(format!(
                    "{key} not on watchlist {watchlist_id}",
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    fn owner_id() -> UserId {
        UserId::try_new(FixtureWatchlistRepository::OWNER_ID).expect("valid id")
    }

    fn watchlist_id() -> WatchlistId {
        WatchlistId::try_new(FixtureWatchlistRepository::WATCHLIST_ID).expect("valid id")
    }

    fn movie_key(tmdb_id: i32) -> ItemKey {
        ItemKey::new(ItemKind::movie(), TmdbId::try_new(tmdb_id).expect("valid id"))
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_owner_sees_canned_watchlist() {
        let repo = FixtureWatchlistRepository;
        let snapshot = repo
            .find_owned(owner_id())
            .await
            .expect("fixture read succeeds")
            .expect("owner has a watchlist");

        assert_eq!(snapshot.id(), watchlist_id());
        assert_eq!(snapshot.items().len(), 2);
        assert_eq!(
            snapshot.role_of(owner_id()),
            Some(MembershipRole::Owner),
        );
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_other_users_own_nothing() {
        let repo = FixtureWatchlistRepository;
        let other = UserId::try_new(42).expect("valid id");
        let found = repo.find_owned(other).await.expect("fixture read succeeds");
        assert!(found.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_create_is_idempotent_for_owner() {
        let repo = FixtureWatchlistRepository;
        let outcome = repo
            .create_for_owner(owner_id(), &WatchlistName::default_name())
            .await
            .expect("fixture create succeeds");

        assert_eq!(outcome, CreatedWatchlist::Existing(watchlist_id()));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_add_rejects_duplicates_and_accepts_new_keys() {
        let repo = FixtureWatchlistRepository;

        let duplicate = repo
            .add_item(watchlist_id(), &movie_key(550), owner_id())
            .await
            .expect_err("canned item must be a duplicate");
        assert!(matches!(
            duplicate,
            WatchlistRepositoryError::DuplicateItem { .. },
        ));

        let inserted = repo
            .add_item(watchlist_id(), &movie_key(27205), owner_id())
            .await
            .expect("new key inserts");
        assert_eq!(inserted.as_i32(), FixtureWatchlistRepository::NEXT_ITEM_ID);
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_remove_finds_canned_items_only() {
        let repo = FixtureWatchlistRepository;

        let removed = repo
            .remove_item(watchlist_id(), &movie_key(603), owner_id())
            .await
            .expect("canned item removes");
        assert_eq!(removed.as_i32(), 2);

        let missing = repo
            .remove_item(watchlist_id(), &movie_key(27205), owner_id())
            .await
            .expect_err("unknown key must be missing");
        assert!(matches!(
            missing,
            WatchlistRepositoryError::ItemNotFound { .. },
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_denies_non_members() {
        let repo = FixtureWatchlistRepository;
        let outsider = UserId::try_new(42).expect("valid id");

        let denied = repo
            .add_item(watchlist_id(), &movie_key(550), outsider)
            .await
            .expect_err("outsiders may not mutate");
        assert!(matches!(
            denied,
            WatchlistRepositoryError::PermissionDenied { .. },
        ));
    }
}
