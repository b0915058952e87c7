//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with adapters. The
//! driven [`UserStore`] port is the fixed interface of the data store
//! collaborator; the driving [`UserDirectory`] port is what inbound
//! adapters call. Each trait exposes strongly typed errors so adapters map
//! their failures into predictable variants.

use async_trait::async_trait;
use thiserror::Error as ThisError;

use directory_model::{Role, User, UserId};
use pagination::{Page, PageRequest};

use super::Error;

/// Filter predicate applied to directory listings.
///
/// Both conditions combine with AND semantics; an empty filter matches all
/// rows. `search` is held in trimmed form so equal filters compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserFilter {
    search: Option<String>,
    role: Option<Role>,
}

impl UserFilter {
    /// Build a filter, discarding a search term that is blank after
    /// trimming.
    pub fn new(search: Option<&str>, role: Option<Role>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|term| !term.is_empty())
            .map(str::to_owned);
        Self { search, role }
    }

    /// Trimmed search term, if any.
    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    /// Exact role condition, if any.
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    /// Evaluate the predicate against one row: case-insensitive substring
    /// match on `name`, exact match on `role`.
    pub fn matches(&self, user: &User) -> bool {
        if let Some(term) = self.search() {
            if !user
                .name()
                .to_lowercase()
                .contains(&term.to_lowercase())
            {
                return false;
            }
        }
        if let Some(role) = self.role {
            if user.role() != role {
                return false;
            }
        }
        true
    }
}

/// Parameters for one directory listing, already validated by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersRequest {
    /// Search and role predicate.
    pub filter: UserFilter,
    /// Page window to serve.
    pub page: PageRequest,
}

/// Errors surfaced by the data store adapter.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum UserStoreError {
    /// Store connectivity failures.
    #[error("user store connection failed: {message}")]
    Connection {
        /// Adapter-provided description of the failure.
        message: String,
    },
    /// Read or write failures that bubble up from the adapter.
    #[error("user store query failed: {message}")]
    Query {
        /// Adapter-provided description of the failure.
        message: String,
    },
}

impl UserStoreError {
    /// Construct a [`UserStoreError::Connection`].
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Construct a [`UserStoreError::Query`].
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Driven port: the data store's fixed query and update interface.
///
/// Window reads are ordered by `created_at` descending (newest first).
/// `count` ignores the window and reflects only the predicate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch one window of matching rows, newest first.
    async fn find_page(
        &self,
        filter: &UserFilter,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<User>, UserStoreError>;

    /// Count all rows matching the predicate, ignoring the window.
    async fn count(&self, filter: &UserFilter) -> Result<u64, UserStoreError>;

    /// Fetch a single row by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserStoreError>;

    /// Overwrite one row's `active` flag; `None` when no row matches.
    async fn set_active(
        &self,
        id: &UserId,
        active: bool,
    ) -> Result<Option<User>, UserStoreError>;
}

/// Driving port: the directory operations exposed to inbound adapters.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Serve one page of users matching the request's predicate.
    async fn list(&self, request: ListUsersRequest) -> Result<Page<User>, Error>;

    /// Fetch a single user; `NotFound` when the id matches no row.
    async fn get(&self, id: &UserId) -> Result<User, Error>;

    /// Flip a user's `active` flag and return the updated row.
    async fn toggle_active(&self, id: &UserId) -> Result<User, Error>;
}
