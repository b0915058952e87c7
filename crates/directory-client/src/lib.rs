//! Cancellable data layer and optimistic cache for the user-directory API.
//!
//! Three layers, leaf-first:
//! - [`api`] — the [`UserTransport`](api::UserTransport) port and its
//!   reqwest implementation; every operation takes a cancellation token
//!   honoured at the I/O boundary.
//! - [`cache`] — a value-keyed store of list envelopes and user details
//!   with change notification and an in-flight fetch registry.
//! - [`optimistic`] / [`client`] — the toggle-active protocol: cancel
//!   affected fetches, apply the flip locally, mutate over the network,
//!   then reconcile or roll back.

pub mod api;
pub mod cache;
pub mod client;
pub mod optimistic;

pub use api::{DirectoryApi, FetchError, UserTransport};
pub use cache::{CacheEvent, DirectoryCache, FetchKey, ListKey};
pub use client::DirectoryClient;
pub use optimistic::{TogglePhase, ToggleTransaction};
