//! Cache-aware client facade over a [`UserTransport`].
//!
//! [`DirectoryClient`] ties the layers together: each load registers an
//! in-flight fetch, hands its cancellation token to the transport, and only
//! publishes the response to the cache when the fetch was not superseded.
//! Toggles run through the optimistic [`ToggleTransaction`] protocol.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use directory_model::{User, UserId};
use pagination::Page;

use crate::api::{FetchError, UserTransport};
use crate::cache::{DirectoryCache, FetchKey, ListKey};
use crate::optimistic::ToggleTransaction;

/// High-level directory client with a cancellable fetch layer and an
/// optimistic cache.
pub struct DirectoryClient<T> {
    transport: Arc<T>,
    cache: Arc<DirectoryCache>,
}

impl<T> DirectoryClient<T>
where
    T: UserTransport,
{
    /// Create a client with a fresh, empty cache.
    #[must_use]
    pub fn new(transport: Arc<T>) -> Self {
        Self::with_cache(transport, Arc::new(DirectoryCache::new()))
    }

    /// Create a client over an existing cache, sharing it with other
    /// consumers.
    #[must_use]
    pub const fn with_cache(transport: Arc<T>, cache: Arc<DirectoryCache>) -> Self {
        Self { transport, cache }
    }

    /// The cache backing this client, for reads and subscriptions.
    #[must_use]
    pub const fn cache(&self) -> &Arc<DirectoryCache> {
        &self.cache
    }

    /// Fetch a page of users and publish it under its list key.
    ///
    /// Issuing a new load for the same key supersedes the previous one;
    /// the superseded call resolves to [`FetchError::Cancelled`] and its
    /// response, if one arrives, never reaches the cache.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`FetchError`], or
    /// [`FetchError::Cancelled`] when superseded.
    pub async fn load_users(&self, key: &ListKey) -> Result<Page<User>, FetchError> {
        let fetch_key = FetchKey::List(key.clone());
        let token = self.cache.begin_fetch(fetch_key.clone());
        let result = self.transport.list(key, &token).await;
        self.cache.finish_fetch(&fetch_key, &token);

        let page = Self::settle(result, &token)?;
        self.cache.insert_list(key.clone(), page.clone());
        self.cache.clear_stale(key);
        Ok(page)
    }

    /// Fetch a single user and publish it under its detail key.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`FetchError`], or
    /// [`FetchError::Cancelled`] when superseded.
    pub async fn load_user(&self, id: &UserId) -> Result<User, FetchError> {
        let fetch_key = FetchKey::Detail(id.clone());
        let token = self.cache.begin_fetch(fetch_key.clone());
        let result = self.transport.detail(id, &token).await;
        self.cache.finish_fetch(&fetch_key, &token);

        let user = Self::settle(result, &token)?;
        self.cache.insert_detail(user.clone());
        Ok(user)
    }

    /// Toggle a user's active flag with optimistic cache updates.
    ///
    /// The expected flip lands in the cache before the request goes out.
    /// On success the transaction commits the server's row; on failure it
    /// restores the pre-toggle snapshots.
    ///
    /// # Errors
    ///
    /// Returns the transport's [`FetchError`]; the cache is already rolled
    /// back when this happens.
    pub async fn toggle_active(&self, key: &ListKey, id: &UserId) -> Result<User, FetchError> {
        let mut tx = ToggleTransaction::begin(Arc::clone(&self.cache), key.clone(), id.clone());
        let token = CancellationToken::new();
        match self.transport.toggle_active(id, &token).await {
            Ok(server_row) => {
                tx.commit(server_row.clone());
                Ok(server_row)
            }
            Err(error) => {
                tracing::warn!(user_id = %id, error = %error, "toggle failed, rolling back");
                tx.rollback();
                Err(error)
            }
        }
    }

    /// Cancel the in-flight list fetch for a key, if any.
    pub fn cancel_list(&self, key: &ListKey) {
        self.cache.cancel_fetch(&FetchKey::List(key.clone()));
    }

    /// Cancel the in-flight detail fetch for a user, if any.
    pub fn cancel_detail(&self, id: &UserId) {
        self.cache.cancel_fetch(&FetchKey::Detail(id.clone()));
    }

    /// Reject superseded responses so stale data never lands in the cache.
    fn settle<V>(
        result: Result<V, FetchError>,
        token: &CancellationToken,
    ) -> Result<V, FetchError> {
        let value = result?;
        if token.is_cancelled() {
            return Err(FetchError::Cancelled);
        }
        Ok(value)
    }
}
