//! HTTP transport for the user-directory API.
//!
//! [`UserTransport`] is the port the client layers depend on;
//! [`DirectoryApi`] is its reqwest implementation. Every operation takes a
//! [`CancellationToken`] and resolves to [`FetchError::Cancelled`] the
//! moment the token fires, without waiting for the response.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use tokio_util::sync::CancellationToken;
use url::Url;

use directory_model::{User, UserId};
use pagination::Page;

use crate::cache::ListKey;

/// Default per-request timeout applied by [`DirectoryApi::new`].
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Failures surfaced by a [`UserTransport`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("server responded with status {status}")]
    Status {
        /// HTTP status code of the response.
        status: u16,
    },
    /// The request never produced a response.
    #[error("transport failure: {message}")]
    Transport {
        /// Human-readable description of the failure.
        message: String,
    },
    /// The response body was not the expected JSON shape.
    #[error("failed to decode response: {message}")]
    Decode {
        /// Human-readable description of the failure.
        message: String,
    },
    /// The operation was cancelled before completing.
    #[error("request cancelled")]
    Cancelled,
}

impl FetchError {
    /// Whether the user with this id is known to be absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404 })
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode {
                message: error.to_string(),
            }
        } else {
            Self::Transport {
                message: error.to_string(),
            }
        }
    }
}

/// Port over the directory's REST operations.
///
/// Implementations must honour the cancellation token at the I/O boundary:
/// once it fires, the call returns [`FetchError::Cancelled`] and any
/// response that later arrives is discarded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserTransport: Send + Sync {
    /// Fetch one page of users for the given query key.
    async fn list(
        &self,
        query: &ListKey,
        cancel: &CancellationToken,
    ) -> Result<Page<User>, FetchError>;

    /// Fetch a single user by id.
    async fn detail(&self, id: &UserId, cancel: &CancellationToken) -> Result<User, FetchError>;

    /// Flip a user's active flag, returning the updated row.
    async fn toggle_active(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<User, FetchError>;
}

/// reqwest-backed [`UserTransport`] for a directory server.
#[derive(Debug, Clone)]
pub struct DirectoryApi {
    client: reqwest::Client,
    base_url: Url,
}

impl DirectoryApi {
    /// Create a transport for `base_url` with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: Url) -> Result<Self, FetchError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a transport with an explicit per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] when the underlying HTTP client
    /// cannot be constructed.
    pub fn with_timeout(base_url: Url, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport {
                message: e.to_string(),
            })?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| FetchError::Transport {
                    message: format!("base URL {} cannot carry a path", self.base_url),
                })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn list_url(&self, query: &ListKey) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&["users"])?;
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(search) = query.search() {
                pairs.append_pair("search", search);
            }
            if let Some(role) = query.role() {
                pairs.append_pair("role", role.as_str());
            }
            pairs.append_pair("page", &query.page().to_string());
            pairs.append_pair("limit", &query.limit().to_string());
        }
        Ok(url)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, FetchError> {
        if let Some(error) = status_error(response.status()) {
            return Err(error);
        }
        Ok(response.json::<T>().await?)
    }
}

/// Race `request` against the cancellation token.
///
/// Dropping the request future aborts the connection, so a cancelled call
/// stops at the I/O boundary rather than running to completion.
async fn cancellable<T, F>(cancel: &CancellationToken, request: F) -> Result<T, FetchError>
where
    F: Future<Output = Result<T, FetchError>>,
{
    if cancel.is_cancelled() {
        return Err(FetchError::Cancelled);
    }
    tokio::select! {
        () = cancel.cancelled() => Err(FetchError::Cancelled),
        result = request => result,
    }
}

#[async_trait]
impl UserTransport for DirectoryApi {
    async fn list(
        &self,
        query: &ListKey,
        cancel: &CancellationToken,
    ) -> Result<Page<User>, FetchError> {
        let url = self.list_url(query)?;
        tracing::debug!(%url, "fetching user list");
        cancellable(cancel, async {
            let response = self.client.get(url).send().await?;
            Self::decode(response).await
        })
        .await
    }

    async fn detail(&self, id: &UserId, cancel: &CancellationToken) -> Result<User, FetchError> {
        let url = self.endpoint(&["users", &id.to_string()])?;
        tracing::debug!(%url, "fetching user detail");
        cancellable(cancel, async {
            let response = self.client.get(url).send().await?;
            Self::decode(response).await
        })
        .await
    }

    async fn toggle_active(
        &self,
        id: &UserId,
        cancel: &CancellationToken,
    ) -> Result<User, FetchError> {
        let url = self.endpoint(&["users", &id.to_string(), "toggle-active"])?;
        tracing::debug!(%url, "toggling user active flag");
        cancellable(cancel, async {
            let response = self.client.patch(url).send().await?;
            Self::decode(response).await
        })
        .await
    }
}

/// Map a status code into the transport error space; success codes pass.
#[must_use]
pub fn status_error(status: StatusCode) -> Option<FetchError> {
    if status.is_success() {
        None
    } else {
        Some(FetchError::Status {
            status: status.as_u16(),
        })
    }
}
