//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::UserDirectory;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Directory operations behind the driving port.
    pub directory: Arc<dyn UserDirectory>,
}

impl HttpState {
    /// Bundle the directory port for handler injection.
    pub fn new(directory: Arc<dyn UserDirectory>) -> Self {
        Self { directory }
    }
}
