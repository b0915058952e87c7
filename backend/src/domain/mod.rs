//! Domain services, ports, and error payloads.
//!
//! Purpose: hold the transport-agnostic core of the directory — the
//! [`UserDirectory`] driving port, the [`UserStore`] driven port, and the
//! service that connects them. Inbound adapters translate these types into
//! HTTP responses; outbound adapters implement the store.
//!
//! Public surface:
//! - `Error` / `ErrorCode` — error payload shared by every endpoint.
//! - `UserDirectory`, `UserStore`, `UserFilter` — the ports.
//! - `UserDirectoryService` — the service implementing `UserDirectory`.

pub mod directory_service;
pub mod error;
pub mod ports;

pub use self::directory_service::UserDirectoryService;
pub use self::error::{Error, ErrorCode};
pub use self::ports::{ListUsersRequest, UserDirectory, UserFilter, UserStore, UserStoreError};
