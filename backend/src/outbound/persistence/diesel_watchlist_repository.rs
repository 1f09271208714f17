//! PostgreSQL-backed `WatchlistRepository` implementation using Diesel ORM.
//!
//! Every mutation is a single transaction: membership check, duplicate or
//! locate step, the write itself, and the outbox append either all commit or
//! all roll back. Reads load the list, memberships, and items in one
//! transaction so the snapshot is internally consistent.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::events::{ITEM_ADDED_EVENT, ITEM_REMOVED_EVENT, WatchlistItemEvent};
use crate::domain::ports::{WatchlistRepository, WatchlistRepositoryError};
use crate::domain::user::{ExternalIdentity, User, UserId, Username};
use crate::domain::watchlist::{
    CreatedWatchlist, ItemKey, ItemKind, Membership, MembershipRole, TmdbId, WatchlistId,
    WatchlistItem, WatchlistItemId, WatchlistName, WatchlistSnapshot,
};

use super::diesel_basic_error_mapping::{
    is_unique_violation_of, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    NewMembershipRow, NewOutboxEventRow, NewWatchlistItemRow, NewWatchlistRow, UserRow,
    WatchlistItemRow, WatchlistRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{outbox_events, users, watchlist_items, watchlist_memberships, watchlists};

/// Partial unique index limiting each user to one owned watchlist.
const OWNER_UNIQUE_INDEX: &str = "watchlist_memberships_owner_user_idx";
/// Unique constraint on (watchlist_id, item_type, tmdb_id).
const ITEM_DEDUPE_KEY: &str = "watchlist_items_watchlist_item_key";

/// Diesel-backed implementation of the watchlist repository port.
#[derive(Clone)]
pub struct DieselWatchlistRepository {
    pool: DbPool,
}

impl DieselWatchlistRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> WatchlistRepositoryError {
    map_basic_pool_error(error, WatchlistRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> WatchlistRepositoryError {
    map_basic_diesel_error(
        error,
        WatchlistRepositoryError::query,
        WatchlistRepositoryError::connection,
    )
}

/// Error carrier for transactional units of work.
///
/// Diesel's transaction runner requires `From<diesel::result::Error>` on the
/// closure error type. This wrapper carries already-classified domain errors
/// through the rollback unchanged, while raw Diesel failures are mapped once
/// the transaction has finished.
#[derive(Debug)]
enum TransactionError {
    Domain(WatchlistRepositoryError),
    Diesel(diesel::result::Error),
}

impl From<diesel::result::Error> for TransactionError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_transaction_error(error: TransactionError) -> WatchlistRepositoryError {
    match error {
        TransactionError::Domain(error) => error,
        TransactionError::Diesel(error) => map_diesel_error(error),
    }
}

/// Map a failed item insert, classifying dedupe-key violations.
///
/// The in-transaction duplicate check runs first, so this only fires when a
/// concurrent transaction inserted the same key between check and insert.
fn map_item_insert_error(error: diesel::result::Error, key: &ItemKey) -> TransactionError {
    if is_unique_violation_of(&error, ITEM_DEDUPE_KEY) {
        TransactionError::Domain(WatchlistRepositoryError::duplicate_item(format!(
            "item {key} is already on the watchlist"
        )))
    } else {
        TransactionError::Diesel(error)
    }
}

fn invalid_row(error: impl std::fmt::Display) -> WatchlistRepositoryError {
    WatchlistRepositoryError::query(error.to_string())
}

/// Convert a joined user row into a validated domain user.
fn row_to_user(row: UserRow) -> Result<User, WatchlistRepositoryError> {
    let id = UserId::try_new(row.id).map_err(invalid_row)?;
    let username = Username::new(row.username).map_err(invalid_row)?;
    let identity = ExternalIdentity::try_from_parts(row.oauth_provider, row.external_id)
        .map_err(invalid_row)?;
    Ok(User::new(id, username, identity))
}

/// Convert a (role, user) pair from the membership join into a domain membership.
fn row_to_membership(
    role: String,
    user_row: UserRow,
) -> Result<Membership, WatchlistRepositoryError> {
    let role = role.parse::<MembershipRole>().map_err(invalid_row)?;
    Ok(Membership::new(row_to_user(user_row)?, role))
}

/// Convert a database row into a validated domain watchlist item.
fn row_to_item(row: WatchlistItemRow) -> Result<WatchlistItem, WatchlistRepositoryError> {
    let WatchlistItemRow {
        id,
        watchlist_id,
        item_type,
        tmdb_id,
        added_by_user_id,
        created_at,
        updated_at: _,
    } = row;

    let id = WatchlistItemId::try_new(id).map_err(invalid_row)?;
    let watchlist_id = WatchlistId::try_new(watchlist_id).map_err(invalid_row)?;
    let kind = ItemKind::new(item_type).map_err(invalid_row)?;
    let tmdb_id = TmdbId::try_new(tmdb_id).map_err(invalid_row)?;
    let added_by = UserId::try_new(added_by_user_id).map_err(invalid_row)?;

    Ok(WatchlistItem::new(
        id,
        watchlist_id,
        ItemKey::new(kind, tmdb_id),
        added_by,
        created_at,
    ))
}

/// Assemble a watchlist snapshot from the rows loaded in one read transaction.
fn rows_to_snapshot(
    list_row: WatchlistRow,
    membership_rows: Vec<(String, UserRow)>,
    item_rows: Vec<WatchlistItemRow>,
) -> Result<WatchlistSnapshot, WatchlistRepositoryError> {
    let id = WatchlistId::try_new(list_row.id).map_err(invalid_row)?;
    let name = WatchlistName::new(list_row.name).map_err(invalid_row)?;
    let memberships = membership_rows
        .into_iter()
        .map(|(role, user_row)| row_to_membership(role, user_row))
        .collect::<Result<Vec<_>, _>>()?;
    let items = item_rows
        .into_iter()
        .map(row_to_item)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(WatchlistSnapshot::new(id, name, memberships, items))
}

/// Resolve the acting user's role on the watchlist and require edit rights.
///
/// Runs on the transaction's connection so the permission decision and the
/// mutation it guards observe the same state.
async fn require_edit_rights(
    conn: &mut AsyncPgConnection,
    raw_watchlist_id: i32,
    raw_user_id: i32,
) -> Result<(), TransactionError> {
    let role_text = watchlist_memberships::table
        .filter(watchlist_memberships::watchlist_id.eq(raw_watchlist_id))
        .filter(watchlist_memberships::user_id.eq(raw_user_id))
        .select(watchlist_memberships::role)
        .first::<String>(conn)
        .await
        .optional()?;

    let Some(role_text) = role_text else {
        return Err(TransactionError::Domain(
            WatchlistRepositoryError::permission_denied(format!(
                "user {raw_user_id} is not a member of watchlist {raw_watchlist_id}"
            )),
        ));
    };

    let role = role_text
        .parse::<MembershipRole>()
        .map_err(|err| TransactionError::Domain(WatchlistRepositoryError::query(err.to_string())))?;

    if !role.can_edit_items() {
        return Err(TransactionError::Domain(
            WatchlistRepositoryError::permission_denied(format!(
                "role {role} cannot modify watchlist {raw_watchlist_id}"
            )),
        ));
    }

    Ok(())
}

/// Append an item event to the outbox on the transaction's connection.
async fn append_outbox_event(
    conn: &mut AsyncPgConnection,
    event_type: &str,
    event: &WatchlistItemEvent,
) -> Result<(), TransactionError> {
    let payload = event.payload().map_err(|err| {
        TransactionError::Domain(WatchlistRepositoryError::query(format!(
            "serialise outbox payload: {err}"
        )))
    })?;

    diesel::insert_into(outbox_events::table)
        .values(&NewOutboxEventRow {
            event_type,
            payload: &payload,
        })
        .execute(conn)
        .await?;

    Ok(())
}

/// Outcome of the provisioning transaction, before id validation.
enum ProvisionOutcome {
    Created(i32),
    Existing(i32),
}

#[async_trait]
impl WatchlistRepository for DieselWatchlistRepository {
    async fn find_owned(
        &self,
        user_id: UserId,
    ) -> Result<Option<WatchlistSnapshot>, WatchlistRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_user_id = user_id.as_i32();
        let owner_role = MembershipRole::Owner.as_str();

        let loaded = conn
            .transaction(|conn| {
                async move {
                    let owned_id = watchlist_memberships::table
                        .filter(watchlist_memberships::user_id.eq(raw_user_id))
                        .filter(watchlist_memberships::role.eq(owner_role))
                        .select(watchlist_memberships::watchlist_id)
                        .first::<i32>(conn)
                        .await
                        .optional()?;

                    let Some(raw_watchlist_id) = owned_id else {
                        return Ok(None);
                    };

                    let list_row = watchlists::table
                        .find(raw_watchlist_id)
                        .select(WatchlistRow::as_select())
                        .first::<WatchlistRow>(conn)
                        .await?;

                    let membership_rows = watchlist_memberships::table
                        .inner_join(users::table)
                        .filter(watchlist_memberships::watchlist_id.eq(raw_watchlist_id))
                        .order(watchlist_memberships::id.asc())
                        .select((watchlist_memberships::role, UserRow::as_select()))
                        .load::<(String, UserRow)>(conn)
                        .await?;

                    let item_rows = watchlist_items::table
                        .filter(watchlist_items::watchlist_id.eq(raw_watchlist_id))
                        .order(watchlist_items::id.asc())
                        .select(WatchlistItemRow::as_select())
                        .load::<WatchlistItemRow>(conn)
                        .await?;

                    Ok(Some((list_row, membership_rows, item_rows)))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let Some((list_row, membership_rows, item_rows)) = loaded else {
            return Ok(None);
        };

        rows_to_snapshot(list_row, membership_rows, item_rows).map(Some)
    }

    async fn create_for_owner(
        &self,
        user_id: UserId,
        name: &WatchlistName,
    ) -> Result<CreatedWatchlist, WatchlistRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_user_id = user_id.as_i32();
        let owner_role = MembershipRole::Owner.as_str();
        let list_name = name.as_ref();

        let outcome = conn
            .transaction(|conn| {
                async move {
                    let existing = watchlist_memberships::table
                        .filter(watchlist_memberships::user_id.eq(raw_user_id))
                        .filter(watchlist_memberships::role.eq(owner_role))
                        .select(watchlist_memberships::watchlist_id)
                        .first::<i32>(conn)
                        .await
                        .optional()?;

                    if let Some(raw_watchlist_id) = existing {
                        return Ok(ProvisionOutcome::Existing(raw_watchlist_id));
                    }

                    let raw_watchlist_id = diesel::insert_into(watchlists::table)
                        .values(&NewWatchlistRow { name: list_name })
                        .returning(watchlists::id)
                        .get_result::<i32>(conn)
                        .await?;

                    diesel::insert_into(watchlist_memberships::table)
                        .values(&NewMembershipRow {
                            watchlist_id: raw_watchlist_id,
                            user_id: raw_user_id,
                            role: owner_role,
                        })
                        .execute(conn)
                        .await?;

                    Ok(ProvisionOutcome::Created(raw_watchlist_id))
                }
                .scope_boxed()
            })
            .await;

        match outcome {
            Ok(ProvisionOutcome::Created(raw_id)) => {
                let id = WatchlistId::try_new(raw_id).map_err(invalid_row)?;
                Ok(CreatedWatchlist::Created(id))
            }
            Ok(ProvisionOutcome::Existing(raw_id)) => {
                let id = WatchlistId::try_new(raw_id).map_err(invalid_row)?;
                Ok(CreatedWatchlist::Existing(id))
            }
            // Lost a provisioning race: the competing transaction committed
            // its owner membership first and ours rolled back whole. Re-read
            // the winner's watchlist id.
            Err(error) if is_unique_violation_of(&error, OWNER_UNIQUE_INDEX) => {
                let raw_id = watchlist_memberships::table
                    .filter(watchlist_memberships::user_id.eq(raw_user_id))
                    .filter(watchlist_memberships::role.eq(owner_role))
                    .select(watchlist_memberships::watchlist_id)
                    .first::<i32>(&mut conn)
                    .await
                    .map_err(map_diesel_error)?;
                let id = WatchlistId::try_new(raw_id).map_err(invalid_row)?;
                Ok(CreatedWatchlist::Existing(id))
            }
            Err(error) => Err(map_diesel_error(error)),
        }
    }

    async fn add_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_watchlist_id = watchlist_id.as_i32();
        let raw_user_id = acting_user_id.as_i32();
        let kind = key.kind().as_ref();
        let raw_tmdb_id = key.tmdb_id().as_i32();

        conn.transaction(|conn| {
            async move {
                require_edit_rights(conn, raw_watchlist_id, raw_user_id).await?;

                let duplicate = watchlist_items::table
                    .filter(watchlist_items::watchlist_id.eq(raw_watchlist_id))
                    .filter(watchlist_items::item_type.eq(kind))
                    .filter(watchlist_items::tmdb_id.eq(raw_tmdb_id))
                    .select(watchlist_items::id)
                    .first::<i32>(conn)
                    .await
                    .optional()?;

                if duplicate.is_some() {
                    return Err(TransactionError::Domain(
                        WatchlistRepositoryError::duplicate_item(format!(
                            "item {key} is already on the watchlist"
                        )),
                    ));
                }

                let raw_item_id = diesel::insert_into(watchlist_items::table)
                    .values(&NewWatchlistItemRow {
                        watchlist_id: raw_watchlist_id,
                        item_type: kind,
                        tmdb_id: raw_tmdb_id,
                        added_by_user_id: raw_user_id,
                    })
                    .returning(watchlist_items::id)
                    .get_result::<i32>(conn)
                    .await
                    .map_err(|error| map_item_insert_error(error, key))?;

                let item_id = WatchlistItemId::try_new(raw_item_id)
                    .map_err(|err| TransactionError::Domain(invalid_row(err)))?;

                let event = WatchlistItemEvent {
                    watchlist_id,
                    item_id,
                    tmdb_id: key.tmdb_id(),
                    item_type: key.kind().clone(),
                    acting_user_id,
                };
                append_outbox_event(conn, ITEM_ADDED_EVENT, &event).await?;

                Ok(item_id)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_transaction_error)
    }

    async fn remove_item(
        &self,
        watchlist_id: WatchlistId,
        key: &ItemKey,
        acting_user_id: UserId,
    ) -> Result<WatchlistItemId, WatchlistRepositoryError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let raw_watchlist_id = watchlist_id.as_i32();
        let raw_user_id = acting_user_id.as_i32();
        let kind = key.kind().as_ref();
        let raw_tmdb_id = key.tmdb_id().as_i32();

        conn.transaction(|conn| {
            async move {
                require_edit_rights(conn, raw_watchlist_id, raw_user_id).await?;

                let located = watchlist_items::table
                    .filter(watchlist_items::watchlist_id.eq(raw_watchlist_id))
                    .filter(watchlist_items::item_type.eq(kind))
                    .filter(watchlist_items::tmdb_id.eq(raw_tmdb_id))
                    .select(watchlist_items::id)
                    .first::<i32>(conn)
                    .await
                    .optional()?;

                let Some(raw_item_id) = located else {
                    return Err(TransactionError::Domain(
                        WatchlistRepositoryError::item_not_found(format!(
                            "item {key} is not on the watchlist"
                        )),
                    ));
                };

                diesel::delete(watchlist_items::table.find(raw_item_id))
                    .execute(conn)
                    .await?;

                let item_id = WatchlistItemId::try_new(raw_item_id)
                    .map_err(|err| TransactionError::Domain(invalid_row(err)))?;

                let event = WatchlistItemEvent {
                    watchlist_id,
                    item_id,
                    tmdb_id: key.tmdb_id(),
                    item_type: key.kind().clone(),
                    acting_user_id,
                };
                append_outbox_event(conn, ITEM_REMOVED_EVENT, &event).await?;

                Ok(item_id)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_transaction_error)
    }
}
