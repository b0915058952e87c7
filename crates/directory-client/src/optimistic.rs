//! Optimistic toggle protocol over the [`DirectoryCache`].
//!
//! A [`ToggleTransaction`] applies the expected outcome of a toggle to the
//! cache before the network round-trip, then either reconciles with the
//! server's row or restores the pre-toggle snapshots verbatim.

use std::sync::Arc;

use directory_model::{User, UserId};
use pagination::Page;

use crate::cache::{DirectoryCache, FetchKey, ListKey};

/// Lifecycle of a [`ToggleTransaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TogglePhase {
    /// Optimistic state applied; awaiting the server outcome.
    Pending,
    /// Reconciled with the server's authoritative row.
    Committed,
    /// Pre-toggle snapshots restored.
    RolledBack,
}

/// One optimistic toggle in flight.
///
/// The transaction owns the snapshots needed for rollback. Once committed
/// or rolled back it is inert; further transitions are no-ops.
pub struct ToggleTransaction {
    cache: Arc<DirectoryCache>,
    list_key: ListKey,
    user_id: UserId,
    saved_list: Option<Page<User>>,
    saved_detail: Option<User>,
    phase: TogglePhase,
}

impl ToggleTransaction {
    /// Start a toggle for `user_id` as seen through `list_key`.
    ///
    /// In order: cancel any in-flight fetches that could overwrite the
    /// optimistic state, snapshot the affected entries, then apply the
    /// expected flip to both the cached list row and the detail entry.
    #[must_use]
    pub fn begin(cache: Arc<DirectoryCache>, list_key: ListKey, user_id: UserId) -> Self {
        cache.cancel_fetch(&FetchKey::List(list_key.clone()));
        cache.cancel_fetch(&FetchKey::Detail(user_id.clone()));

        let saved_list = cache.list(&list_key);
        let saved_detail = cache.detail(&user_id);

        if let Some(snapshot) = &saved_list {
            let mut flipped = snapshot.clone();
            flipped.data = flipped
                .data
                .into_iter()
                .map(|row| {
                    if row.id() == &user_id {
                        let active = row.active();
                        row.with_active(!active)
                    } else {
                        row
                    }
                })
                .collect();
            cache.insert_list(list_key.clone(), flipped);
        }
        if let Some(snapshot) = &saved_detail {
            let active = snapshot.active();
            cache.insert_detail(snapshot.clone().with_active(!active));
        }

        Self {
            cache,
            list_key,
            user_id,
            saved_list,
            saved_detail,
            phase: TogglePhase::Pending,
        }
    }

    /// Current phase of the transaction.
    #[must_use]
    pub const fn phase(&self) -> TogglePhase {
        self.phase
    }

    /// Reconcile with the server's authoritative row.
    ///
    /// The detail entry takes the server row as-is and the list key is
    /// marked stale for a background refresh, since other rows on the page
    /// may have moved underneath the mutation.
    pub fn commit(&mut self, server_user: User) {
        if self.phase != TogglePhase::Pending {
            return;
        }
        self.cache.insert_detail(server_user);
        self.cache.mark_stale(&self.list_key);
        self.phase = TogglePhase::Committed;
    }

    /// Restore the pre-toggle snapshots exactly as they were captured.
    pub fn rollback(&mut self) {
        if self.phase != TogglePhase::Pending {
            return;
        }
        if let Some(snapshot) = self.saved_list.take() {
            self.cache.insert_list(self.list_key.clone(), snapshot);
        }
        if let Some(snapshot) = self.saved_detail.take() {
            self.cache.insert_detail(snapshot);
        }
        self.phase = TogglePhase::RolledBack;
    }

    /// Id of the user being toggled.
    #[must_use]
    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
