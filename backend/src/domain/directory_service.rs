//! Directory service implementing the [`UserDirectory`] driving port.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use directory_model::{User, UserId};
use pagination::Page;

use super::ports::{ListUsersRequest, UserDirectory, UserStore, UserStoreError};
use super::Error;

/// Directory service connecting inbound adapters to the data store port.
#[derive(Clone)]
pub struct UserDirectoryService<S> {
    store: Arc<S>,
}

impl<S> UserDirectoryService<S> {
    /// Create a new service backed by the given store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: UserStoreError) -> Error {
    match error {
        UserStoreError::Connection { message } => {
            Error::service_unavailable(format!("user store unavailable: {message}"))
        }
        UserStoreError::Query { message } => {
            Error::internal(format!("user store error: {message}"))
        }
    }
}

fn user_not_found() -> Error {
    Error::not_found("User not found")
}

impl<S> UserDirectoryService<S>
where
    S: UserStore,
{
    async fn find_existing(&self, id: &UserId) -> Result<User, Error> {
        self.store
            .find_by_id(id)
            .await
            .map_err(map_store_error)?
            .ok_or_else(user_not_found)
    }
}

#[async_trait]
impl<S> UserDirectory for UserDirectoryService<S>
where
    S: UserStore,
{
    async fn list(&self, request: ListUsersRequest) -> Result<Page<User>, Error> {
        let ListUsersRequest { filter, page } = request;
        // Window and count are independent reads over the same predicate;
        // no shared snapshot is required, so issue them together.
        let (window, total) = tokio::join!(
            self.store.find_page(&filter, page.skip(), page.limit()),
            self.store.count(&filter),
        );
        let data = window.map_err(map_store_error)?;
        let total = total.map_err(map_store_error)?;
        debug!(
            total,
            returned = data.len(),
            page = page.page(),
            limit = page.limit(),
            "listed users"
        );
        Ok(Page::new(data, page, total))
    }

    async fn get(&self, id: &UserId) -> Result<User, Error> {
        self.find_existing(id).await
    }

    /// Read-then-write negation of `active`, with no concurrency token.
    /// Two concurrent toggles on the same id can observe the same value and
    /// lose one flip.
    async fn toggle_active(&self, id: &UserId) -> Result<User, Error> {
        let current = self.find_existing(id).await?;
        let updated = self
            .store
            .set_active(id, !current.active())
            .await
            .map_err(map_store_error)?
            // Row disappeared between read and write.
            .ok_or_else(user_not_found)?;
        debug!(user = %id, active = updated.active(), "toggled user");
        Ok(updated)
    }
}
